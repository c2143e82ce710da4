use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// 抽奖核心的两类终止错误（不在内部重试，直接上抛给调用方）
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawError {
    /// 过滤后没有任何可抽取的奖品（全部停用或已发完）
    #[error("no eligible prizes left to award")]
    NoEligiblePrizes,

    /// 可抽取奖品的权重之和 <= 0，属上游配置问题
    #[error("eligible prizes have non-positive total weight")]
    DegenerateWeights,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("External API error: {0}")]
    ExternalApiError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("Draw error: {0}")]
    Draw(#[from] DrawError),

    #[error("HTTP request error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code, message) = match self {
            AppError::ValidationError(msg) => {
                log::warn!("Validation error: {msg}");
                (
                    actix_web::http::StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    msg.clone(),
                )
            }
            AppError::NotFound(msg) => (
                actix_web::http::StatusCode::NOT_FOUND,
                "NOT_FOUND",
                msg.clone(),
            ),
            // 用户可见的「奖品已抽完」，返回 409 由前端提示
            AppError::Draw(e @ DrawError::NoEligiblePrizes) => {
                log::warn!("Draw rejected: {e}");
                (
                    actix_web::http::StatusCode::CONFLICT,
                    "NO_ELIGIBLE_PRIZES",
                    e.to_string(),
                )
            }
            // 权重和 <= 0 说明上游奖品配置有问题
            AppError::Draw(e @ DrawError::DegenerateWeights) => {
                log::error!("Draw misconfigured: {e}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "DEGENERATE_WEIGHTS",
                    e.to_string(),
                )
            }
            AppError::ExternalApiError(msg) => {
                log::error!("External API error: {msg}");
                (
                    actix_web::http::StatusCode::BAD_GATEWAY,
                    "EXTERNAL_API_ERROR",
                    msg.clone(),
                )
            }
            AppError::ReqwestError(err) => {
                log::error!("Upstream request error: {err}");
                (
                    actix_web::http::StatusCode::BAD_GATEWAY,
                    "EXTERNAL_API_ERROR",
                    "Upstream request failed".to_string(),
                )
            }
            _ => {
                log::error!("Internal error: {self}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        HttpResponse::build(status_code).json(json!({
            "success": false,
            "error": {
                "code": error_code,
                "message": message
            }
        }))
    }
}

use actix_web::{HttpResponse, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/healthz",
    tag = "health",
    responses(
        (status = 200, description = "服务存活")
    )
)]
/// 存活探针
pub async fn healthz() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": { "status": "ok" } })))
}

/// 路由配置（挂在根路径，供探针直接访问）
pub fn health_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/healthz", web::get().to(healthz));
}

use crate::models::*;
use crate::services::DrawService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/contests/{id}",
    tag = "contest",
    params(
        ("id" = i64, Path, description = "比赛ID")
    ),
    responses(
        (status = 200, description = "获取比赛详情成功", body = ContestResponse),
        (status = 404, description = "比赛不存在")
    )
)]
/// 获取比赛详情（含奖品配置与投放窗口）
pub async fn get_contest(
    service: web::Data<DrawService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let contest_id = path.into_inner();
    match service.get_contest(contest_id).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/contests/{id}/prizes",
    tag = "contest",
    params(
        ("id" = i64, Path, description = "比赛ID")
    ),
    responses(
        (status = 200, description = "获取奖品列表成功", body = [PrizeResponse]),
        (status = 404, description = "比赛不存在")
    )
)]
/// 获取当前启用的奖品配置（不返回预置券码）
pub async fn get_prizes(
    service: web::Data<DrawService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let contest_id = path.into_inner();
    match service.list_prizes(contest_id).await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/contests/{id}/rewards",
    tag = "contest",
    params(
        ("id" = i64, Path, description = "比赛ID"),
        ("page" = Option<u32>, Query, description = "页码 (默认1)"),
        ("per_page" = Option<u32>, Query, description = "每页数量 (默认20)")
    ),
    responses(
        (status = 200, description = "获取奖励记录成功", body = RewardRecordPageResponse),
        (status = 404, description = "比赛不存在")
    )
)]
/// 分页获取比赛的奖励记录（倒序）
pub async fn get_rewards(
    service: web::Data<DrawService>,
    path: web::Path<i64>,
    query: web::Query<RewardRecordQuery>,
) -> Result<HttpResponse> {
    let contest_id = path.into_inner();
    match service.list_rewards(contest_id, &query.into_inner()).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": page }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/contests/{id}/play",
    tag = "contest",
    params(
        ("id" = i64, Path, description = "比赛ID")
    ),
    responses(
        (status = 200, description = "抽奖成功", body = PlayResponse),
        (status = 400, description = "比赛不在投放窗口内"),
        (status = 404, description = "比赛不存在"),
        (status = 409, description = "没有可抽取的奖品")
    )
)]
/// 进行一次抽奖:
/// 1. 拉取比赛快照并校验投放窗口
/// 2. 按权重在进程内抽取
/// 3. 奖励记录提交上游台账后返回
pub async fn play(service: web::Data<DrawService>, path: web::Path<i64>) -> Result<HttpResponse> {
    let contest_id = path.into_inner();
    match service.play(contest_id).await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": result }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn contest_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/contests")
            .route("/{id}", web::get().to(get_contest))
            .route("/{id}/prizes", web::get().to(get_prizes))
            .route("/{id}/rewards", web::get().to(get_rewards))
            .route("/{id}/play", web::post().to(play)),
    );
}

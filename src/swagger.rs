use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::contest::get_contest,
        handlers::contest::get_prizes,
        handlers::contest::get_rewards,
        handlers::contest::play,
        handlers::health::healthz,
    ),
    components(
        schemas(
            ContestKind,
            RewardType,
            RewardStatus,
            ContestResponse,
            PrizeResponse,
            WonPrize,
            RewardRecordResponse,
            RewardRecordQuery,
            RewardRecordPageResponse,
            PlayResponse,
            ApiError,
        )
    ),
    tags(
        (name = "contest", description = "Contest draw API"),
        (name = "health", description = "Liveness probe"),
    ),
    info(
        title = "Contest Draw Backend API",
        version = "1.0.0",
        description = "Weighted contest prize draw REST API documentation",
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}

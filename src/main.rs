use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use std::sync::Arc;

use contest_draw_backend::{
    config::Config,
    external::ContestApi,
    handlers,
    middlewares::create_cors,
    services::{
        ContestProvider, DrawService, FixtureContestProvider, HttpContestProvider,
        HttpRewardLedger, MemoryRewardLedger, RewardLedger,
    },
    swagger::swagger_config,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config = Config::from_toml().expect("Failed to load configuration file");

    // 选择比赛数据来源与台账实现（fixture 模式完全离线）
    let (provider, ledger): (Arc<dyn ContestProvider>, Arc<dyn RewardLedger>) =
        if config.upstream.use_fixtures {
            log::warn!("Fixture mode enabled: serving in-memory demo contest, no upstream calls");
            (
                Arc::new(FixtureContestProvider::demo()),
                Arc::new(MemoryRewardLedger::new()),
            )
        } else {
            let api = Arc::new(
                ContestApi::new(config.upstream.clone())
                    .expect("Failed to build upstream HTTP client"),
            );
            log::info!(
                "Using upstream contest service at {}",
                config.upstream.base_url
            );
            (
                Arc::new(HttpContestProvider::new(api.clone())),
                Arc::new(HttpRewardLedger::new(api)),
            )
        };

    let draw_service = DrawService::new(provider, ledger);

    // 启动HTTP服务器
    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .app_data(web::Data::new(draw_service.clone()))
            .configure(swagger_config)
            .configure(handlers::health_config)
            .service(web::scope("/api/v1").configure(handlers::contest_config))
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}

use actix_web::{App, HttpServer, middleware, web};

use quizdeck::config::AppConfig;
use quizdeck::{db, handlers};

/// Largest slide image accepted in one upload.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    std::fs::create_dir_all(&config.media_root)?;

    let pool = db::init_pool(&config.database_url, config.db_max_connections)
        .await
        .map_err(std::io::Error::other)?;
    db::run_migrations(&pool)
        .await
        .map_err(std::io::Error::other)?;

    let bind_addr = config.bind_addr.clone();
    log::info!("Media root: {}", config.media_root.display());
    log::info!("Starting server at http://{bind_addr}");

    let config = web::Data::new(config);
    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(config.clone())
            .app_data(web::PayloadConfig::new(MAX_UPLOAD_BYTES))
            .configure(handlers::configure)
            .default_service(web::to(|| async {
                actix_web::HttpResponse::NotFound()
                    .json(serde_json::json!({ "error": "Not Found" }))
            }))
    })
    .bind(bind_addr)?
    .run()
    .await
}

use std::sync::Arc;

use actix_web::middleware::{Logger, NormalizePath};
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use anyhow::Context;
use tracing::{info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

use hrm_portal::clock::SystemClock;
use hrm_portal::config::Config;
use hrm_portal::db::init_db;
use hrm_portal::docs::ApiDoc;
use hrm_portal::routes;
use hrm_portal::service::AppState;
use hrm_portal::store::Stores;
use hrm_portal::utils::seed;

#[get("/")]
async fn index() -> impl Responder {
    "HRM portal is running"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("loading configuration")?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(addr = %config.server_addr, prefix = %config.api_prefix, "Server starting...");

    let stores = match (&config.database_url, &config.seed_dir) {
        (Some(url), seed_dir) => {
            if seed_dir.is_some() {
                warn!("SEED_DIR is ignored when DATABASE_URL is set");
            }
            let pool = init_db(url).await.context("connecting to MySQL")?;
            Stores::mysql(pool)
        }
        (None, Some(dir)) => {
            info!(dir = %dir.display(), "Using in-memory store with seed data");
            seed::load_stores(dir).context("loading seed data")?
        }
        (None, None) => {
            info!("DATABASE_URL not set, using empty in-memory store");
            Stores::in_memory()
        }
    };

    let state = Data::new(AppState::new(stores, Arc::new(SystemClock)));
    let server_addr = config.server_addr.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(state.clone())
            .service(index)
            // API routes behind the per-IP rate limiter
            .configure(|cfg| routes::configure(cfg, &config))
    })
    .bind(&server_addr)
    .with_context(|| format!("binding {}", server_addr))?
    .run()
    .await?;

    Ok(())
}

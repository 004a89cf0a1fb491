use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use anyhow::Result;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod error;
mod state;

use api::create_api_router;
use state::AppState;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:5000";

async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // 初始化日志
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "numscan_web=debug,numscan_core=debug,actix_web=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 初始化状态
    let state = AppState::from_env()?;
    tracing::info!(scanners = ?state.manager.identifiers(), "Scanners registered");

    let bind_address =
        std::env::var("NUMSCAN_BIND").unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string());
    tracing::info!("numscan server listening on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Cors::permissive())
            .wrap(TracingLogger::default())
            .service(create_api_router())
            .route("/health", web::get().to(health_check))
    })
    .bind(bind_address)?
    .run()
    .await?;

    Ok(())
}

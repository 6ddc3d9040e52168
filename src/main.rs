use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

use recaudacion_rs::{
    config::Config,
    db,
    health::health,
    routes::{cedulas, recibos},
    AppState,
};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file (if present)
    dotenvy::dotenv().ok();

    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    tracing::info!("Starting recaudacion service...");

    // Load configuration from environment
    let config = Config::from_env()
        .expect("Failed to load configuration from environment");

    tracing::info!(
        "Configuration loaded: host={}, port={}, max_list_rows={:?}",
        config.host,
        config.port,
        config.max_list_rows
    );

    // Database connection
    tracing::info!("Connecting to database...");
    let pool = db::init_pool(&config.database_url)
        .await
        .expect("Failed to connect to database");

    let state = Arc::new(AppState { pool, config });

    // Build the application router
    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/recibos", get(recibos::list_recibos))
        .route("/api/recibos/hoy", get(recibos::list_recibos_hoy))
        .route("/api/recibos/totales", get(recibos::get_totales))
        .route("/api/recibos/por-cuenta", get(recibos::get_totales_por_cuenta))
        .route("/api/recibos/reporte.pdf", get(recibos::reporte_pdf))
        .route("/api/recibos/reporte.xlsx", get(recibos::reporte_xlsx))
        .route("/api/recibos/export.csv", get(recibos::export_csv))
        .route("/api/cedulas", get(cedulas::list_cedulas))
        .route("/api/cedulas/reporte.pdf", get(cedulas::reporte_pdf))
        .with_state(state.clone())
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        );

    // Bind to the configured address
    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.port));
    tracing::info!("Recaudacion service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    // Start the server
    axum::serve(listener, app)
        .await
        .expect("Server failed to start");
}

use actix_web::HttpServer;
use bot_dashboard::{AppState, ServerConfig, TelemetryConfig, create_app, init_tracing};
use std::io;
use tracing::info;

#[actix_web::main]
async fn main() -> io::Result<()> {
    init_tracing(&TelemetryConfig::from_env()).map_err(io::Error::other)?;

    let server = ServerConfig::from_env();
    let state = AppState::from_env().map_err(io::Error::other)?;

    info!(
        address = %server.bind_address(),
        discord_api = %state.client.base_url(),
        metrics_enabled = state.config.metrics.enabled,
        "Starting bot dashboard"
    );

    HttpServer::new(move || create_app(state.clone()))
        .bind(server.bind_address())?
        .run()
        .await
}

use anyhow::Result;
use forecast_gateway::{api, config, state, telemetry};
use config::Config;
use state::AppState;
use telemetry::init_tracing;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;
    init_tracing();

    let addr = cfg.server.socket_addr()?;

    if cfg.server.host == "0.0.0.0" {
        warn!("server binding to 0.0.0.0 - service will be accessible from the network");
    }

    let app_state = AppState::new(cfg.clone())?;
    let app = api::router(app_state);

    info!(
        %addr,
        api_version = %cfg.app.api_version,
        environment = %cfg.app.environment,
        "starting Forecast Gateway"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    warn!("shutdown complete");
    Ok(())
}

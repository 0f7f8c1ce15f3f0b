pub mod energy;
pub mod error;
pub mod health;
pub mod weather;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let server = state.cfg.server.clone();

    let mut router = Router::new()
        .route("/", get(energy::home))
        .route("/forecast", post(energy::forecast_energy))
        .route("/health", get(health::health_check))
        .route("/api/weather/forecast", post(weather::post_forecast))
        .route(
            "/api/weather/forecast/:location_id",
            get(weather::location_forecast),
        )
        .with_state(state);

    if server.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        router = router.layer(cors);
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(axum::extract::DefaultBodyLimit::max(1024 * 1024))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(server.request_timeout_secs),
                )),
        )
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(TraceLayer::new_for_http())
}

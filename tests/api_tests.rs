//! End-to-end tests for the HTTP surface.
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`; the
//! remote weather prediction service is stubbed with `wiremock`.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};
use tower::ServiceExt;
use wiremock::{
    matchers::{body_partial_json, method, path},
    Mock, MockServer, ResponseTemplate,
};

use forecast_gateway::{
    api,
    config::Config,
    energy::{Dataset, DateMatch, EnergyForecaster},
    ml::{LinearRegressionModel, Scaler, SupplyModel},
    state::AppState,
    weather::{JsonLocationStore, Location},
};

const DATASET: &str = "\
datetime,hour_sin,hour_cos,dayofyear_sin,dayofyear_cos,DE_ALLSKY_SFC_SW_DNI,DE_T2M,DE_RH2M,DE_PRECTOTCORR,DE_PS,DE_load_actual_entsoe_transparency,DE_solar_generation_actual
2021-05-31 23:00:00,-0.26,0.97,0.4,-0.9,0,12.1,85,0,1001,40000,0
2021-06-01 00:00:00,0,1,0.4,-0.9,123.456,11.8,86,0,1001,41250.5,0
2021-06-01 12:00:00,0,-1,0.4,-0.9,123.454,24.0,50,0,1003,50000,12500
2021-06-01 23:00:00,-0.26,0.97,0.4,-0.9,10.004,14.0,70,0.2,1002,0,3
2021-06-02 00:00:00,0,1,0.4,-0.9,0,13.2,80,0,1002,39000,0
";

fn location(name: &str) -> Location {
    serde_json::from_value(json!({
        "name": name,
        "current_temperature": 28.5,
        "current_humidity": 55.0,
        "current_pressure": 1008.0,
        "current_wind_speed": 4.1,
        "current_wind_direction": 225.0
    }))
    .unwrap()
}

/// Supply model that predicts the raw irradiance column.
fn app(model_url: &str, timeout: Duration) -> Router {
    let dataset = Dataset::from_reader(DATASET.as_bytes()).unwrap();
    let scaler = Scaler::Standard {
        mean: vec![0.0; 9],
        scale: vec![1.0; 9],
    };
    let mut coefficients = vec![0.0; 9];
    coefficients[4] = 1.0;
    let model = SupplyModel::Linear(LinearRegressionModel::new(coefficients, 0.0));
    let energy = EnergyForecaster::new(
        Arc::new(dataset),
        Arc::new(scaler),
        Arc::new(model),
        DateMatch::Substring,
    );

    let mut cfg = Config::default();
    cfg.weather.model_url = model_url.to_string();
    let weather =
        forecast_gateway::weather::WeatherService::new(model_url, timeout).unwrap();

    let mut stored = HashMap::new();
    stored.insert("ward-4".to_string(), location("Ward 4"));
    let mut broken = location("Ward 9");
    broken.remove("current_humidity");
    stored.insert("ward-9".to_string(), broken);

    api::router(AppState::from_parts(
        cfg,
        energy,
        weather,
        Arc::new(JsonLocationStore::from_map(stored)),
    ))
}

fn energy_app() -> Router {
    app("http://127.0.0.1:9", Duration::from_secs(1))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn weather_input() -> Value {
    json!({
        "temperature": 21.0,
        "humidity": 60.0,
        "pressure": 1012.0,
        "wind_speed": 3.0,
        "wind_direction": 90.0,
        "timestamp": "2024-06-01T12:00:00Z",
        "location": {"city": "Pune", "ward": 4}
    })
}

fn upstream_payload(current_temp: f64, condition: &str, hourly_rain: &[f64]) -> Value {
    let hourly: Vec<Value> = hourly_rain
        .iter()
        .enumerate()
        .map(|(i, p)| {
            json!({
                "temperature": 20.0,
                "humidity": 60.0,
                "precipitation_prob": p,
                "condition": "cloudy",
                "time": format!("2024-06-01T{:02}:00:00", 13 + i)
            })
        })
        .collect();
    json!({
        "current": {
            "temperature": current_temp,
            "humidity": 40.0,
            "precipitation_prob": 0.1,
            "condition": condition
        },
        "hourly": hourly,
        "daily": [
            {"temperature": 25.0, "humidity": 50.0, "precipitation_prob": 0.3, "condition": "sunny", "time": "2024-06-02T00:00:00"},
            {"temperature": 26.0, "humidity": 45.0, "precipitation_prob": 0.2, "condition": "sunny", "time": "2024-06-03T00:00:00"}
        ]
    })
}

// ---------------------------------------------------------------------------
// energy
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_home_message() {
    let response = energy_app().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"message": "Welcome to the Energy Forecast API! Use /forecast with a date parameter."})
    );
}

#[tokio::test]
async fn test_energy_forecast_for_day() {
    let response = energy_app()
        .oneshot(post_json("/forecast", json!({"date": "2021-06-01"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let items = body.as_array().expect("array of forecast items");
    assert_eq!(items.len(), 3);

    for item in items {
        for key in [
            "timestamp",
            "forecasted_supply_kw",
            "forecasted_demand_kw",
            "renewable_energy_%",
        ] {
            assert!(item.get(key).is_some(), "missing {key} in {item}");
        }
    }

    assert_eq!(items[0]["timestamp"], "2021-06-01 00:00:00");
    assert_eq!(items[0]["forecasted_supply_kw"], 123.46);
    assert_eq!(items[0]["forecasted_demand_kw"], 41250.5);
    assert_eq!(items[0]["renewable_energy_%"], 0.0);

    assert_eq!(items[1]["timestamp"], "2021-06-01 12:00:00");
    assert_eq!(items[1]["forecasted_supply_kw"], 123.45);
    assert_eq!(items[1]["forecasted_demand_kw"], 50000.0);
    assert_eq!(items[1]["renewable_energy_%"], 25.0);

    // zero demand clamps the share
    assert_eq!(items[2]["forecasted_supply_kw"], 10.0);
    assert_eq!(items[2]["forecasted_demand_kw"], 0.0);
    assert_eq!(items[2]["renewable_energy_%"], 0.0);
}

#[tokio::test]
async fn test_energy_forecast_without_data() {
    let response = energy_app()
        .oneshot(post_json("/forecast", json!({"date": "2030-01-01"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"error": "No data available for the given date."})
    );
}

#[tokio::test]
async fn test_energy_forecast_partial_date_matches_substring() {
    let response = energy_app()
        .oneshot(post_json("/forecast", json!({"date": "2021-06-0"})))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_energy_forecast_missing_date_is_422() {
    let response = energy_app()
        .oneshot(post_json("/forecast", json!({"day": "2021-06-01"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert!(body["detail"].as_str().unwrap().contains("date"));
}

#[tokio::test]
async fn test_health() {
    let response = energy_app().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"status": "healthy"}));
}

// ---------------------------------------------------------------------------
// weather
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_weather_forecast_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_partial_json(json!({
            "temperature": 21.0,
            "location": {"city": "Pune", "ward": 4}
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(upstream_payload(20.0, "Storm", &[0.1; 8])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let response = app(&server.uri(), Duration::from_secs(5))
        .oneshot(post_json("/api/weather/forecast", weather_input()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["location"], json!({"city": "Pune", "ward": 4}));
    assert_eq!(body["current_weather"]["weather_condition"], "Storm");
    assert_eq!(body["hourly_forecast"].as_array().unwrap().len(), 8);
    assert_eq!(
        body["hourly_forecast"][0]["forecast_time"],
        "2024-06-01T13:00:00+00:00"
    );
    assert_eq!(body["daily_forecast"].as_array().unwrap().len(), 2);
    assert_eq!(body["alerts"], json!(["Extreme weather alert: Storm"]));
}

#[tokio::test]
async fn test_weather_forecast_precipitation_window() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(upstream_payload(
            20.0,
            "cloudy",
            &[0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.9, 0.1],
        )))
        .mount(&server)
        .await;

    let response = app(&server.uri(), Duration::from_secs(5))
        .oneshot(post_json("/api/weather/forecast", weather_input()))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert!(body.get("alerts").is_none());
}

#[tokio::test]
async fn test_weather_upstream_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let response = app(&server.uri(), Duration::from_secs(5))
        .oneshot(post_json("/api/weather/forecast", weather_input()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let detail = body_json(response).await["detail"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(detail.starts_with("Error fetching forecast from model"), "{detail}");
    assert!(detail.contains("503"), "{detail}");
}

#[tokio::test]
async fn test_weather_upstream_timeout_is_bounded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(upstream_payload(20.0, "clear", &[]))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let started = Instant::now();
    let response = app(&server.uri(), Duration::from_millis(300))
        .oneshot(post_json("/api/weather/forecast", weather_input()))
        .await
        .unwrap();
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .starts_with("Error fetching forecast from model"));
}

#[tokio::test]
async fn test_weather_upstream_unreachable() {
    // nothing listens on the discard port
    let response = app("http://127.0.0.1:9", Duration::from_secs(2))
        .oneshot(post_json("/api/weather/forecast", weather_input()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_json(response).await["detail"].is_string());
}

#[tokio::test]
async fn test_weather_malformed_upstream_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "current": {"temperature": 20.0, "humidity": 40.0, "condition": "clear"},
            "hourly": [],
            "daily": []
        })))
        .mount(&server)
        .await;

    let response = app(&server.uri(), Duration::from_secs(5))
        .oneshot(post_json("/api/weather/forecast", weather_input()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let detail = body_json(response).await["detail"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(detail.contains("precipitation_prob"), "{detail}");
}

#[tokio::test]
async fn test_weather_forecast_accepts_short_iso_times() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_partial_json(json!({"timestamp": "2024-06-01T12:00:00+00:00"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "current": {"temperature": 20.0, "humidity": 40.0, "precipitation_prob": 0.1, "condition": "clear"},
            "hourly": [
                {"temperature": 20.0, "humidity": 60.0, "precipitation_prob": 0.1, "condition": "cloudy", "time": "2024-06-01T13:00"}
            ],
            "daily": [
                {"temperature": 25.0, "humidity": 50.0, "precipitation_prob": 0.3, "condition": "sunny", "time": "2024-06-02"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut input = weather_input();
    input["timestamp"] = json!("2024-06-01T12:00");
    let response = app(&server.uri(), Duration::from_secs(5))
        .oneshot(post_json("/api/weather/forecast", input))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(
        body["hourly_forecast"][0]["forecast_time"],
        "2024-06-01T13:00:00+00:00"
    );
    assert_eq!(
        body["daily_forecast"][0]["forecast_time"],
        "2024-06-02T00:00:00+00:00"
    );
}

#[tokio::test]
async fn test_weather_forecast_invalid_body_is_422() {
    let mut input = weather_input();
    input.as_object_mut().unwrap().remove("pressure");
    let response = app("http://127.0.0.1:9", Duration::from_secs(1))
        .oneshot(post_json("/api/weather/forecast", input))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert!(body["detail"].as_str().unwrap().contains("pressure"));
}

#[tokio::test]
async fn test_location_forecast() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_partial_json(json!({
            "temperature": 28.5,
            "wind_direction": 225.0,
            "location": {"name": "Ward 4"}
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(upstream_payload(38.0, "sunny", &[0.1])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let response = app(&server.uri(), Duration::from_secs(5))
        .oneshot(get("/api/weather/forecast/ward-4"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["location"]["name"], "Ward 4");
    assert_eq!(
        body["alerts"],
        json!(["High temperature alert: Stay hydrated and avoid prolonged sun exposure"])
    );
}

#[tokio::test]
async fn test_location_forecast_unknown_id() {
    let response = energy_app()
        .oneshot(get("/api/weather/forecast/ward-77"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({"detail": "Location not found: ward-77"})
    );
}

#[tokio::test]
async fn test_location_forecast_incomplete_location() {
    let response = energy_app()
        .oneshot(get("/api/weather/forecast/ward-9"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let detail = body_json(response).await["detail"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(detail.contains("current_humidity"), "{detail}");
}

#[tokio::test]
async fn test_slow_upstream_does_not_block_other_requests() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(upstream_payload(20.0, "clear", &[]))
                .set_delay(Duration::from_millis(1500)),
        )
        .mount(&server)
        .await;

    let router = app(&server.uri(), Duration::from_secs(5));
    let slow = tokio::spawn(
        router
            .clone()
            .oneshot(post_json("/api/weather/forecast", weather_input())),
    );

    let quick = tokio::time::timeout(
        Duration::from_millis(500),
        router.oneshot(get("/health")),
    )
    .await
    .expect("health answered while upstream is slow")
    .unwrap();
    assert_eq!(quick.status(), StatusCode::OK);

    let slow = slow.await.unwrap().unwrap();
    assert_eq!(slow.status(), StatusCode::OK);
}

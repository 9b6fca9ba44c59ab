//! API router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::common::MessageResponse;
use super::modules::batteries::{self, BatteryState};
use super::modules::charging::{self, ChargingState};
use super::modules::health::{self, HealthState};
use super::modules::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use super::modules::request_id::request_id_middleware;
use super::modules::stations::{self, StationState};
use crate::application::ChargeController;
use crate::domain::RepositoryProvider;

/// Unified router state. Each handler extracts its own slice via `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub controller: Arc<ChargeController>,
    pub db: DatabaseConnection,
    pub started_at: Arc<Instant>,
    pub metrics: PrometheusHandle,
}

impl FromRef<AppState> for BatteryState {
    fn from_ref(s: &AppState) -> Self {
        BatteryState {
            repos: Arc::clone(&s.repos),
            bounds: s.controller.settings().bounds,
        }
    }
}

impl FromRef<AppState> for ChargingState {
    fn from_ref(s: &AppState) -> Self {
        ChargingState {
            controller: Arc::clone(&s.controller),
        }
    }
}

impl FromRef<AppState> for StationState {
    fn from_ref(s: &AppState) -> Self {
        StationState {
            repos: Arc::clone(&s.repos),
        }
    }
}

impl FromRef<AppState> for HealthState {
    fn from_ref(s: &AppState) -> Self {
        HealthState {
            db: s.db.clone(),
            controller: Arc::clone(&s.controller),
            started_at: Arc::clone(&s.started_at),
        }
    }
}

impl FromRef<AppState> for MetricsState {
    fn from_ref(s: &AppState) -> Self {
        MetricsState {
            handle: s.metrics.clone(),
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        batteries::list_batteries,
        batteries::get_battery,
        batteries::create_battery,
        batteries::update_battery,
        batteries::delete_battery,
        charging::start_charging,
        charging::stop_charging,
        stations::list_stations,
        stations::get_station,
    ),
    components(
        schemas(
            MessageResponse,
            batteries::BatteryResponse,
            batteries::CreateBatteryRequest,
            batteries::UpdateBatteryRequest,
            stations::StationResponse,
            health::HealthResponse,
            health::ComponentHealth,
        )
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Batteries", description = "Bike battery records"),
        (name = "Charging", description = "Start and stop charging a battery"),
        (name = "Charging Stations", description = "Read-only charging station catalog"),
    ),
    info(
        title = "Bike Charging Service API",
        version = "1.0.0",
        description = "Bike battery records and background charging control",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger_routes)
        .route("/health", get(health::health_check))
        .route("/metrics", get(prometheus_metrics))
        // Batteries
        .route("/batteries", get(batteries::list_batteries))
        .route("/battery", post(batteries::create_battery))
        .route(
            "/battery/{id}",
            get(batteries::get_battery)
                .put(batteries::update_battery)
                .delete(batteries::delete_battery),
        )
        // Charging
        .route(
            "/charge/{id}",
            post(charging::start_charging).delete(charging::stop_charging),
        )
        // Stations
        .route("/charging-stations", get(stations::list_stations))
        .route("/charging-stations/{id}", get(stations::get_station))
        // Middleware
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::application::ChargingSettings;
    use crate::infrastructure::database::testing::{
        battery_row, memory_db, repos, seed_battery, seed_station,
    };
    use crate::shared::shutdown::ShutdownSignal;

    fn app(db: &DatabaseConnection, tick: Duration) -> Router {
        let repos = repos(db);
        let controller = ChargeController::new(
            repos.clone(),
            ChargingSettings::default().with_tick_interval(tick),
            ShutdownSignal::new(),
        );
        create_api_router(AppState {
            repos,
            controller: Arc::new(controller),
            db: db.clone(),
            started_at: Arc::new(Instant::now()),
            metrics: PrometheusBuilder::new().build_recorder().handle(),
        })
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn battery_crud_round() {
        let db = memory_db().await;
        let app = app(&db, Duration::from_secs(60));

        let (status, _) = send(&app, "GET", "/batteries", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            &app,
            "POST",
            "/battery",
            Some(json!({"id": "B1", "level": 40.0, "charging_speed": 1.5})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["is_charging"], false);

        let (status, body) = send(&app, "GET", "/battery/B1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["level"], 40.0);

        let (status, body) =
            send(&app, "PUT", "/battery/B1", Some(json!({"level": 55.0}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["level"], 55.0);
        assert_eq!(body["charging_speed"], 1.5);

        let (_, body) = send(&app, "GET", "/batteries", None).await;
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, body) = send(&app, "DELETE", "/battery/B1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "B1");

        let (status, body) = send(&app, "GET", "/battery/B1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "battery not found");
    }

    #[tokio::test]
    async fn create_rejects_bad_input() {
        let db = memory_db().await;
        seed_battery(&db, "B1", 10.0, false, 1.0).await;
        let app = app(&db, Duration::from_secs(60));

        let (status, _) = send(
            &app,
            "POST",
            "/battery",
            Some(json!({"id": "B2", "level": 150.0, "charging_speed": 1.0})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = send(
            &app,
            "POST",
            "/battery",
            Some(json!({"id": "B2", "level": 10.0, "charging_speed": 0.0})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = send(
            &app,
            "POST",
            "/battery",
            Some(json!({"id": "", "level": 10.0, "charging_speed": 1.0})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = send(
            &app,
            "POST",
            "/battery",
            Some(json!({"id": "B1", "level": 10.0, "charging_speed": 1.0})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = send(&app, "PUT", "/battery/ghost", Some(json!({"level": 1.0}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn start_unknown_battery_is_404() {
        let db = memory_db().await;
        let app = app(&db, Duration::from_secs(60));

        let (status, body) = send(&app, "POST", "/charge/does_not_exist", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "battery not found");

        let (status, _) = send(&app, "DELETE", "/charge/does_not_exist", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn second_start_reports_in_progress() {
        let db = memory_db().await;
        seed_battery(&db, "B4", 10.0, false, 1.0).await;
        let app = app(&db, Duration::from_secs(60));

        let (status, body) = send(&app, "POST", "/charge/B4", None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Charging started.");

        let (status, body) = send(&app, "POST", "/charge/B4", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Charging already in progress.");
    }

    #[tokio::test]
    async fn stop_is_idempotent() {
        let db = memory_db().await;
        seed_battery(&db, "B3", 10.0, false, 1.0).await;
        let app = app(&db, Duration::from_millis(20));

        send(&app, "POST", "/charge/B3", None).await;
        let (status, body) = send(&app, "DELETE", "/charge/B3", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Charging stopped.");

        let (status, body) = send(&app, "DELETE", "/charge/B3", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Bike is not currently charging.");
        assert!(!battery_row(&db, "B3").await.unwrap().is_charging);
    }

    #[tokio::test]
    async fn charging_runs_to_full_and_stops_itself() {
        let db = memory_db().await;
        seed_battery(&db, "B2", 99.0, false, 1.0).await;
        let app = app(&db, Duration::from_millis(10));

        let (status, _) = send(&app, "POST", "/charge/B2", None).await;
        assert_eq!(status, StatusCode::CREATED);

        let body = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                let (_, body) = send(&app, "GET", "/battery/B2", None).await;
                if body["is_charging"] == false {
                    break body;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("charging should complete");

        assert_eq!(body["level"], 100.0);
    }

    #[tokio::test]
    async fn station_lookup() {
        let db = memory_db().await;
        let id = seed_station(&db, "Central", 80).await;
        let app = app(&db, Duration::from_secs(60));

        let (status, body) = send(&app, "GET", "/charging-stations", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, body) = send(&app, "GET", &format!("/charging-stations/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Central");

        let (status, body) = send(&app, "GET", "/charging-stations/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid ID");

        let (status, body) = send(&app, "GET", "/charging-stations/9999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Charging station not found");
    }

    #[tokio::test]
    async fn health_reports_live_activities() {
        let db = memory_db().await;
        seed_battery(&db, "B1", 10.0, false, 1.0).await;
        let app = app(&db, Duration::from_secs(60));

        send(&app, "POST", "/charge/B1", None).await;
        let (status, body) = send(&app, "GET", "/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["active_charging"], 1);
    }

    #[tokio::test]
    async fn request_id_is_echoed() {
        let db = memory_db().await;
        let app = app(&db, Duration::from_secs(60));

        let req = Request::builder()
            .uri("/health")
            .header("x-request-id", "abc-123")
            .body(Body::empty())
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.headers()["x-request-id"], "abc-123");

        let req = Request::builder().uri("/batteries").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert!(resp.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn metrics_endpoint_serves_text() {
        let db = memory_db().await;
        let app = app(&db, Duration::from_secs(60));

        let req = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));
    }
}

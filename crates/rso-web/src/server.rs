//! Web服务器

use axum::{
    routing::{get, post},
    Router,
};
use rso_core::Result;
use std::future::Future;
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::handlers::*;
use crate::state::AppState;

pub struct WebServer {
    addr: SocketAddr,
    app: Router,
}

impl WebServer {
    pub fn new(addr: SocketAddr, state: AppState) -> Self {
        Self {
            addr,
            app: create_app(state),
        }
    }

    pub async fn run(self) -> Result<()> {
        self.run_until(std::future::pending::<()>()).await
    }

    /// 运行直到 `shutdown` 完成，处理中的请求会先完成
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("Starting web server on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Web server stopped");
        Ok(())
    }
}

/// 构建完整路由
pub fn create_app(state: AppState) -> Router {
    Router::new()
        // 根路径
        .route("/", get(api_root))
        // 健康检查
        .route("/health", get(health))
        // API路由
        .nest("/api", api_routes())
        .with_state(state)
        // 全局中间件
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/init-db", post(init_db))
        .route("/seed-compliance", post(seed_compliance))
        .route("/reseed", post(reseed_patients))
        .route("/patients", get(list_patients).post(create_patient))
        .route("/patients/confirmed", get(confirmed_patients))
        .route("/classify", get(classify_reading))
        .nest("/compliance", compliance_routes())
        .nest("/reference", reference_routes())
}

/// 七类合规记录，均为列表 + 新增
fn compliance_routes() -> Router<AppState> {
    Router::new()
        .route("/daily-surveys", get(list_daily_surveys).post(create_daily_survey))
        .route("/weekly-surveys", get(list_weekly_surveys).post(create_weekly_survey))
        .route("/sealed-source", get(list_sealed_sources).post(create_sealed_source))
        .route("/tracer-checkout", get(list_tracer_checkouts).post(create_tracer_checkout))
        .route("/dose-patient-info", get(list_dose_patient_info).post(create_dose_patient_info))
        .route("/qc-calibrator", get(list_qc_records).post(create_qc_record))
        .route("/dosimeter-tracker", get(list_dosimeter_records).post(create_dosimeter_record))
}

fn reference_routes() -> Router<AppState> {
    Router::new()
        .route("/dose-recommendations", get(dose_recommendations))
        .route("/dose-recommendations/lookup", get(lookup_dose))
        .route("/vendors", get(vendors))
        .route("/insurance", get(insurance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use rso_core::ReferenceTables;
    use rso_database::MemoryStore;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_app() -> Router {
        let state = AppState::new(Arc::new(MemoryStore::new()), ReferenceTables::builtin());
        create_app(state)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health_and_root() {
        let app = test_app();
        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (status, body) = send(&app, Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "running");
    }

    #[tokio::test]
    async fn test_daily_survey_round_trip() {
        let app = test_app();
        let (status, created) = send(
            &app,
            Method::POST,
            "/api/compliance/daily-surveys",
            Some(json!({
                "survey_date": "2025-10-15",
                "technologist": "J. Smith",
                "area": "Hot Lab",
                "radiation_reading": 0.3,
                "status": "Pass"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["radiation_reading"], 0.3);

        let (status, list) = send(&app, Method::GET, "/api/compliance/daily-surveys", None).await;
        assert_eq!(status, StatusCode::OK);
        let list = list.as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["id"], created["id"]);
        assert_eq!(list[0]["radiation_reading"], 0.3);
        assert_eq!(list[0]["band"], "Normal");
    }

    #[tokio::test]
    async fn test_invalid_survey_is_rejected() {
        let app = test_app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/compliance/daily-surveys",
            Some(json!({
                "survey_date": "15/10/2025",
                "technologist": "  ",
                "area": "Hot Lab",
                "radiation_reading": -1.0
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "validation");
        let fields: Vec<&str> = body["fields"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["field"].as_str().unwrap())
            .collect();
        assert!(fields.contains(&"survey_date"));
        assert!(fields.contains(&"technologist"));
        assert!(fields.contains(&"radiation_reading"));

        let (_, list) = send(&app, Method::GET, "/api/compliance/daily-surveys", None).await;
        assert!(list.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_json_is_rejected() {
        let app = test_app();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/compliance/qc-calibrator")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"qc_date\": "))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["kind"], "malformed_input");
    }

    #[tokio::test]
    async fn test_seed_endpoints() {
        let app = test_app();
        let (status, body) = send(&app, Method::POST, "/api/init-db", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["counts"]["patients"], 30);

        for _ in 0..2 {
            let (status, body) = send(&app, Method::POST, "/api/seed-compliance", None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["counts"]["daily_surveys"], 10);
            assert_eq!(body["counts"]["dosimeter_records"], 7);
        }
        let (_, list) = send(&app, Method::GET, "/api/compliance/tracer-checkout", None).await;
        assert_eq!(list.as_array().unwrap().len(), 7);

        let (status, body) = send(&app, Method::POST, "/api/reseed", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["counts"]["patients"], 30);
        let (_, patients) = send(&app, Method::GET, "/api/patients", None).await;
        assert_eq!(patients.as_array().unwrap().len(), 30);
    }

    #[tokio::test]
    async fn test_daily_survey_bands_after_seed() {
        let app = test_app();
        send(&app, Method::POST, "/api/seed-compliance", None).await;
        let (_, list) = send(&app, Method::GET, "/api/compliance/daily-surveys", None).await;
        let list = list.as_array().unwrap();

        // 最新日期在前
        assert_eq!(list[0]["survey_date"], "2025-10-15");
        assert_eq!(list[list.len() - 1]["survey_date"], "2025-10-13");

        let hot_lab = list
            .iter()
            .find(|s| s["survey_date"] == "2025-10-14" && s["area"] == "Hot Lab")
            .unwrap();
        assert_eq!(hot_lab["radiation_reading"], 2.5);
        assert_eq!(hot_lab["band"], "Alert");
    }

    #[tokio::test]
    async fn test_duplicate_patient_conflicts() {
        let app = test_app();
        send(&app, Method::POST, "/api/init-db", None).await;
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/patients",
            Some(json!({
                "patient_name": "Another Smith",
                "patient_id": "PT001",
                "scan_type": "PET/CT",
                "duration": 60,
                "insurance": "Aetna",
                "appointment_status": "Pending",
                "appointment_date": "2025-10-20T09:30"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["kind"], "conflict");
        assert_eq!(body["error"], "patient_id already exists");
    }

    #[tokio::test]
    async fn test_confirmed_view() {
        let app = test_app();
        send(&app, Method::POST, "/api/init-db", None).await;

        let (status, view) = send(&app, Method::GET, "/api/patients/confirmed?sort=name", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["total_confirmed"], 25);
        assert_eq!(view["orders"][0]["patient"]["patient_name"], "Ashley Ramirez");
        assert_eq!(view["orders"][0]["recommendation"]["primary"]["vendor"], "Lantheus");
        assert_eq!(view["vendor_estimates"][0]["estimated_orders"], 10);

        let (status, body) = send(&app, Method::GET, "/api/patients/confirmed?sort=age", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["fields"][0]["field"], "sort");
    }

    #[tokio::test]
    async fn test_classify_endpoint() {
        let app = test_app();
        let (status, body) = send(&app, Method::GET, "/api/classify?domain=area-survey&value=0.5", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["band"], "Caution");

        let (status, body) =
            send(&app, Method::GET, "/api/classify?domain=dosimeter-yearly&value=4500", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["band"], "Alert");

        let (status, body) = send(&app, Method::GET, "/api/classify?domain=soil&value=abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["fields"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_dose_lookup() {
        let app = test_app();
        let (status, body) = send(
            &app,
            Method::GET,
            "/api/reference/dose-recommendations/lookup?scan_type=PET%2FCT",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["primary"]["dose"], "10-15 mCi F-18 FDG");
        assert_eq!(body["primary"]["vendor"], "Cardinal Health");
        assert_eq!(body["secondary"]["vendor"], "Triad Isotopes");

        let (_, body) = send(
            &app,
            Method::GET,
            "/api/reference/dose-recommendations/lookup?scan_type=MRI",
            None,
        )
        .await;
        assert_eq!(body["primary"]["dose"], "N/A");
        assert_eq!(body["secondary"]["reason"], "No secondary option available");

        let (_, vendors) = send(&app, Method::GET, "/api/reference/vendors", None).await;
        assert_eq!(vendors.as_array().unwrap().len(), 5);
        let (_, table) = send(&app, Method::GET, "/api/reference/dose-recommendations", None).await;
        assert_eq!(table.as_array().unwrap().len(), 9);
    }
}

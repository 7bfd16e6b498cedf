//! HTTP处理器

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
};
use rso_core::validation::*;
use rso_core::{
    classify, classify_area, classify_dosimeter, ConfirmedPatientView, ExposureStatus, FieldError,
    RsoError, SeedCounts, SortKey, ThresholdDomain, Validate,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::error::{failed, ApiError};
use crate::state::AppState;

type ApiResult<T> = std::result::Result<T, ApiError>;

/// 带分级结果的记录
#[derive(Debug, Serialize)]
pub struct Classified<T> {
    #[serde(flatten)]
    pub record: T,
    pub band: ExposureStatus,
}

impl<T> Classified<T> {
    fn new(record: T, band: ExposureStatus) -> Self {
        Self { record, band }
    }
}

/// 解析 JSON 请求体并校验
fn validated<R: Validate>(payload: Result<Json<R>, JsonRejection>) -> ApiResult<R::Output> {
    let Json(request) = payload?;
    Ok(request.validate()?)
}

fn seed_response(message: &str, counts: SeedCounts) -> Json<serde_json::Value> {
    Json(json!({
        "success": true,
        "message": message,
        "counts": counts,
    }))
}

/// API根路径处理器
pub async fn api_root() -> impl IntoResponse {
    Json(json!({
        "service": "RSO Compliance API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "endpoints": {
            "health": "/health",
            "patients": "/api/patients",
            "compliance": "/api/compliance",
            "reference": "/api/reference"
        }
    }))
}

/// 健康检查处理器
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "version": env!("CARGO_PKG_VERSION")
            })),
        ),
        Err(e) => {
            warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "timestamp": chrono::Utc::now().to_rfc3339(),
                    "version": env!("CARGO_PKG_VERSION")
                })),
            )
        }
    }
}

// ========== 数据初始化 ==========

pub async fn init_db(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let counts = state
        .store
        .initialize()
        .await
        .map_err(failed("Failed to initialize database"))?;
    info!("Database initialized ({} sample patients inserted)", counts.patients);
    Ok(seed_response("Database initialized successfully", counts))
}

pub async fn seed_compliance(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let counts = state
        .store
        .reseed_compliance()
        .await
        .map_err(failed("Failed to seed compliance data"))?;
    Ok(seed_response("Compliance data seeded successfully", counts))
}

pub async fn reseed_patients(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let counts = state
        .store
        .reseed_patients()
        .await
        .map_err(failed("Failed to reseed patients"))?;
    Ok(seed_response("Patients reseeded successfully", counts))
}

// ========== 患者 ==========

pub async fn list_patients(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let patients = state
        .store
        .list_patients()
        .await
        .map_err(failed("Failed to fetch patients"))?;
    Ok(Json(patients))
}

pub async fn create_patient(
    State(state): State<AppState>,
    payload: Result<Json<PatientRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let patient = validated(payload)?;
    let created = state
        .store
        .create_patient(&patient)
        .await
        .map_err(failed("Failed to create patient"))?;
    info!("Created patient {}", created.patient_id);
    Ok(Json(created))
}

#[derive(Debug, Deserialize)]
pub struct ConfirmedQueryParams {
    pub sort: Option<String>,
}

/// 已确认患者及当日剂量订单
pub async fn confirmed_patients(
    State(state): State<AppState>,
    params: Result<Query<ConfirmedQueryParams>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(params) = params?;
    let sort = match params.sort.as_deref() {
        None | Some("") => SortKey::default(),
        Some(value) => SortKey::parse(value)
            .ok_or_else(|| RsoError::validation("sort", "must be one of: date, name"))?,
    };

    let patients = state
        .store
        .list_patients()
        .await
        .map_err(failed("Failed to fetch patients"))?;
    Ok(Json(ConfirmedPatientView::build(&patients, sort, &state.reference)))
}

// ========== 合规记录 ==========

pub async fn list_daily_surveys(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let surveys = state
        .store
        .list_daily_surveys()
        .await
        .map_err(failed("Failed to fetch surveys"))?;
    let surveys: Vec<_> = surveys
        .into_iter()
        .map(|s| {
            let band = classify_area(s.radiation_reading);
            Classified::new(s, band)
        })
        .collect();
    Ok(Json(surveys))
}

pub async fn create_daily_survey(
    State(state): State<AppState>,
    payload: Result<Json<DailyAreaSurveyRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let survey = validated(payload)?;
    let created = state
        .store
        .create_daily_survey(&survey)
        .await
        .map_err(failed("Failed to create survey"))?;
    Ok(Json(created))
}

pub async fn list_weekly_surveys(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let surveys = state
        .store
        .list_weekly_surveys()
        .await
        .map_err(failed("Failed to fetch surveys"))?;
    let surveys: Vec<_> = surveys
        .into_iter()
        .map(|s| {
            let band = classify_area(s.max_reading);
            Classified::new(s, band)
        })
        .collect();
    Ok(Json(surveys))
}

pub async fn create_weekly_survey(
    State(state): State<AppState>,
    payload: Result<Json<WeeklyAreaSurveyRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let survey = validated(payload)?;
    let created = state
        .store
        .create_weekly_survey(&survey)
        .await
        .map_err(failed("Failed to create survey"))?;
    Ok(Json(created))
}

pub async fn list_sealed_sources(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let sources = state
        .store
        .list_sealed_sources()
        .await
        .map_err(failed("Failed to fetch inventory"))?;
    Ok(Json(sources))
}

pub async fn create_sealed_source(
    State(state): State<AppState>,
    payload: Result<Json<SealedSourceRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let source = validated(payload)?;
    let created = state
        .store
        .create_sealed_source(&source)
        .await
        .map_err(failed("Failed to create inventory"))?;
    Ok(Json(created))
}

pub async fn list_tracer_checkouts(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let checkouts = state
        .store
        .list_tracer_checkouts()
        .await
        .map_err(failed("Failed to fetch tracers"))?;
    Ok(Json(checkouts))
}

pub async fn create_tracer_checkout(
    State(state): State<AppState>,
    payload: Result<Json<TracerCheckoutRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let checkout = validated(payload)?;
    let created = state
        .store
        .create_tracer_checkout(&checkout)
        .await
        .map_err(failed("Failed to create tracer checkout"))?;
    Ok(Json(created))
}

pub async fn list_dose_patient_info(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let records = state
        .store
        .list_dose_patient_info()
        .await
        .map_err(failed("Failed to fetch dose records"))?;
    Ok(Json(records))
}

pub async fn create_dose_patient_info(
    State(state): State<AppState>,
    payload: Result<Json<DosePatientInfoRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let record = validated(payload)?;
    let created = state
        .store
        .create_dose_patient_info(&record)
        .await
        .map_err(failed("Failed to create dose record"))?;
    Ok(Json(created))
}

pub async fn list_qc_records(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let records = state
        .store
        .list_qc_records()
        .await
        .map_err(failed("Failed to fetch QC records"))?;
    Ok(Json(records))
}

pub async fn create_qc_record(
    State(state): State<AppState>,
    payload: Result<Json<QcCalibratorRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let record = validated(payload)?;
    let created = state
        .store
        .create_qc_record(&record)
        .await
        .map_err(failed("Failed to create QC record"))?;
    Ok(Json(created))
}

pub async fn list_dosimeter_records(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let records = state
        .store
        .list_dosimeter_records()
        .await
        .map_err(failed("Failed to fetch dosimeter records"))?;
    let records: Vec<_> = records
        .into_iter()
        .map(|r| {
            let band = classify_dosimeter(r.yearly_total.unwrap_or(0.0));
            Classified::new(r, band)
        })
        .collect();
    Ok(Json(records))
}

pub async fn create_dosimeter_record(
    State(state): State<AppState>,
    payload: Result<Json<DosimeterRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let record = validated(payload)?;
    let created = state
        .store
        .create_dosimeter_record(&record)
        .await
        .map_err(failed("Failed to create dosimeter record"))?;
    Ok(Json(created))
}

// ========== 分级与参考表 ==========

#[derive(Debug, Deserialize)]
pub struct ClassifyQueryParams {
    pub domain: Option<String>,
    pub value: Option<String>,
}

pub async fn classify_reading(
    params: Result<Query<ClassifyQueryParams>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(params) = params?;
    let mut errors = Vec::new();

    let domain = match params.domain.as_deref().map(str::trim) {
        None | Some("") => {
            errors.push(FieldError::new("domain", "is required"));
            None
        }
        Some(d) => {
            let parsed = ThresholdDomain::parse(d);
            if parsed.is_none() {
                errors.push(FieldError::new(
                    "domain",
                    "must be one of: area-survey, dosimeter-yearly",
                ));
            }
            parsed
        }
    };

    let value = match params.value.as_deref().map(str::trim) {
        None | Some("") => {
            errors.push(FieldError::new("value", "is required"));
            None
        }
        Some(v) => match v.parse::<f64>() {
            Ok(n) if n.is_finite() => Some(n),
            _ => {
                errors.push(FieldError::new("value", "must be a finite number"));
                None
            }
        },
    };

    match (domain, value) {
        (Some(domain), Some(value)) if errors.is_empty() => Ok(Json(json!({
            "domain": domain,
            "value": value,
            "band": classify(domain, value),
        }))),
        _ => Err(RsoError::Validation(errors).into()),
    }
}

pub async fn dose_recommendations(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.reference.dose_recommendations.clone())
}

#[derive(Debug, Deserialize)]
pub struct DoseLookupParams {
    pub scan_type: Option<String>,
}

/// 未知扫描类型返回 N/A 推荐而不是错误
pub async fn lookup_dose(
    State(state): State<AppState>,
    params: Result<Query<DoseLookupParams>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(params) = params?;
    let scan_type = params
        .scan_type
        .ok_or_else(|| RsoError::validation("scan_type", "is required"))?;

    let recommendation = state.reference.lookup(&scan_type);
    Ok(Json(json!({
        "scan_type": scan_type,
        "primary": recommendation.primary,
        "secondary": recommendation.secondary,
    })))
}

pub async fn vendors(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.reference.vendors.clone())
}

pub async fn insurance(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.reference.insurance.clone())
}

use crate::infra::{deserialize_optional_date, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{Local, NaiveDate};
use retail_compliance::error::AppError;
use retail_compliance::workflows::forecast::{
    compute_forecast, ComplianceForecastResult, SiteComplianceRecord, SiteId,
};
use retail_compliance::workflows::obligations::{obligation_status, LifecycleState};
use retail_compliance::workflows::register::{SiteRegister, SiteRegisterImporter};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::io::Cursor;
use tracing::info;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ForecastRequest {
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) sites: Vec<SiteComplianceRecord>,
    #[serde(default)]
    pub(crate) sites_csv: Option<String>,
    #[serde(default)]
    pub(crate) open_incidents: HashMap<SiteId, u32>,
    #[serde(default)]
    pub(crate) overdue_actions: HashMap<SiteId, u32>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LifecycleRequest {
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) completed_on: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LifecycleResponse {
    pub(crate) state: LifecycleState,
    pub(crate) state_label: &'static str,
    pub(crate) next_due: Option<NaiveDate>,
    pub(crate) days_until_due: Option<i64>,
    pub(crate) today: NaiveDate,
}

pub(crate) fn compliance_routes() -> axum::Router {
    axum::Router::new()
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/compliance/forecast",
            axum::routing::post(forecast_endpoint),
        )
        .route(
            "/api/v1/compliance/lifecycle",
            axum::routing::post(lifecycle_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn forecast_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<ForecastRequest>,
) -> Result<Json<ComplianceForecastResult>, AppError> {
    let ForecastRequest {
        today,
        sites,
        sites_csv,
        open_incidents,
        overdue_actions,
    } = payload;

    let mut register = match sites_csv {
        Some(csv) => SiteRegisterImporter::from_reader(Cursor::new(csv.into_bytes()))?,
        None => SiteRegister::default(),
    };
    register.merge_sites(sites);
    register.open_incidents.extend(open_incidents);
    register.overdue_actions.extend(overdue_actions);

    let result = compute_forecast(
        &register.sites,
        &register.open_incidents,
        &register.overdue_actions,
        today.or(state.forecast.reference_date),
    );

    info!(
        sites = result.stores.len(),
        reference_date = %result.reference_date,
        high_risk = result.high_risk_count,
        avg_risk_score = result.avg_risk_score,
        "compliance forecast served"
    );

    Ok(Json(result))
}

pub(crate) async fn lifecycle_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<LifecycleRequest>,
) -> Json<LifecycleResponse> {
    let today = payload
        .today
        .or(state.forecast.reference_date)
        .unwrap_or_else(|| Local::now().date_naive());
    let status = obligation_status(payload.completed_on, today);

    Json(LifecycleResponse {
        state: status.state,
        state_label: status.state.label(),
        next_due: status.next_due,
        days_until_due: status.days_until_due,
        today,
    })
}

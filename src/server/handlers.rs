use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::error::{method_not_allowed, ApiError};
use super::router::AppState;
use crate::error::Result as StoreResult;
use crate::models::{ProductInput, WasteInput};
use crate::report::DateRange;
use crate::store::Store;

/// Runs a store operation off the async runtime.
async fn with_store<T, F>(state: &AppState, op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&Store) -> StoreResult<T> + Send + 'static,
{
    let store = state.store.clone();
    tokio::task::spawn_blocking(move || op(&store))
        .await
        .map_err(|e| ApiError::internal(format!("store task failed: {}", e)))?
        .map_err(ApiError::from)
}

fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

/// Present and non-empty.
fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

pub(crate) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: crate::version(),
    })
}

// ============================================================================
// Products
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct ProductKey {
    category: Option<String>,
    name: Option<String>,
}

pub(crate) async fn list_products(State(state): State<AppState>) -> Result<Response, ApiError> {
    let catalog = with_store(&state, |store| store.list_categorized()).await?;
    Ok(Json(catalog).into_response())
}

pub(crate) async fn upsert_product(
    State(state): State<AppState>,
    body: Result<Json<ProductInput>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(input) =
        body.map_err(|e| ApiError::bad_request(format!("Invalid product data: {}", e)))?;
    let saved = with_store(&state, move |store| store.upsert_product(&input)).await?;
    Ok(if saved.is_created() {
        message(StatusCode::CREATED, "Product added")
    } else {
        message(StatusCode::OK, "Product updated")
    })
}

pub(crate) async fn delete_product(
    State(state): State<AppState>,
    Query(key): Query<ProductKey>,
) -> Result<Response, ApiError> {
    let (Some(category), Some(name)) = (required(key.category), required(key.name)) else {
        return Err(ApiError::bad_request("Missing category or name"));
    };
    with_store(&state, move |store| store.delete_product(&category, &name)).await?;
    Ok(message(StatusCode::OK, "Product deleted"))
}

pub(crate) async fn products_not_allowed() -> Response {
    method_not_allowed("GET, POST, DELETE")
}

// ============================================================================
// Waste
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct DateQuery {
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IdQuery {
    id: Option<String>,
}

pub(crate) async fn list_waste(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Response, ApiError> {
    let date =
        required(query.date).ok_or_else(|| ApiError::bad_request("Missing date parameter"))?;
    let rows = with_store(&state, move |store| store.list_waste_by_date(&date)).await?;
    Ok(Json(rows).into_response())
}

pub(crate) async fn upsert_waste(
    State(state): State<AppState>,
    body: Result<Json<WasteInput>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(input) =
        body.map_err(|e| ApiError::bad_request(format!("Missing fields: {}", e)))?;
    let saved = with_store(&state, move |store| store.upsert_waste(&input)).await?;
    Ok(if saved.is_created() {
        message(StatusCode::CREATED, "Entry saved")
    } else {
        message(StatusCode::OK, "Entry updated")
    })
}

pub(crate) async fn delete_waste(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Response, ApiError> {
    let id = required(query.id).ok_or_else(|| ApiError::bad_request("Missing id parameter"))?;
    with_store(&state, move |store| store.delete_waste_by_key(&id)).await?;
    Ok(message(StatusCode::OK, "Entry deleted"))
}

pub(crate) async fn waste_not_allowed() -> Response {
    method_not_allowed("GET, POST, DELETE")
}

// ============================================================================
// Report
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct ReportQuery {
    start: Option<String>,
    end: Option<String>,
    format: Option<String>,
}

pub(crate) async fn report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, ApiError> {
    let range = DateRange::new(query.start, query.end);
    let summary = with_store(&state, move |store| store.summarize(&range)).await?;

    if query.format.as_deref() == Some("csv") {
        return Ok((
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"waste_report.csv\"",
                ),
            ],
            summary.to_csv(),
        )
            .into_response());
    }
    Ok(Json(summary).into_response())
}

pub(crate) async fn report_not_allowed() -> Response {
    method_not_allowed("GET")
}

use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    PaginatedResponse, PaginationParams,
};
use crate::{
    commands::procurements::{RecordProcurementCommand, UpdateProcurementCommand},
    entities::milk_procurement::{MilkSession, ProcurementPaymentStatus},
    errors::ApiError,
    handlers::AppState,
};
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RecordProcurementRequest {
    pub vendor_id: Uuid,
    pub date: NaiveDate,
    pub session: MilkSession,
    pub quantity: Decimal,
    pub fat_pct: Decimal,
    pub snf_pct: Decimal,
    pub rate_per_litre: Option<Decimal>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProcurementRequest {
    pub date: Option<NaiveDate>,
    pub session: Option<MilkSession>,
    pub quantity: Option<Decimal>,
    pub fat_pct: Option<Decimal>,
    pub snf_pct: Option<Decimal>,
    pub rate_per_litre: Option<Decimal>,
    pub payment_status: Option<ProcurementPaymentStatus>,
}

#[derive(Debug, Deserialize)]
pub struct ProcurementFilterQuery {
    pub vendor_id: Option<Uuid>,
}

/// Record a milk procurement entry
async fn record_procurement(
    State(state): State<AppState>,
    Json(payload): Json<RecordProcurementRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let command = RecordProcurementCommand {
        vendor_id: payload.vendor_id,
        procurement_date: payload.date,
        session: payload.session,
        quantity: payload.quantity,
        fat_pct: payload.fat_pct,
        snf_pct: payload.snf_pct,
        rate_per_litre: payload.rate_per_litre,
    };

    let entry = state
        .services
        .procurement
        .record_procurement(command)
        .await
        .map_err(map_service_error)?;

    info!("Procurement recorded: {}", entry.id);

    Ok(created_response(entry))
}

/// List procurement entries
async fn list_procurements(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filter): Query<ProcurementFilterQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (entries, total) = state
        .services
        .procurement
        .list_procurements(filter.vendor_id, pagination.page, pagination.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        entries,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

/// Get a procurement entry by ID
async fn get_procurement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = state
        .services
        .procurement
        .get_procurement(&id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Procurement entry {} not found", id)))?;

    Ok(success_response(entry))
}

/// Update a procurement entry, reconciling the vendor balance
async fn update_procurement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProcurementRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let command = UpdateProcurementCommand {
        id,
        procurement_date: payload.date,
        session: payload.session,
        quantity: payload.quantity,
        fat_pct: payload.fat_pct,
        snf_pct: payload.snf_pct,
        rate_per_litre: payload.rate_per_litre,
        payment_status: payload.payment_status,
    };

    let entry = state
        .services
        .procurement
        .update_procurement(command)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(entry))
}

/// Delete a procurement entry, reversing its balance delta
async fn delete_procurement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .procurement
        .delete_procurement(id)
        .await
        .map_err(map_service_error)?;

    info!("Procurement deleted: {}", id);

    Ok(no_content_response())
}

pub fn procurement_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_procurements).post(record_procurement))
        .route(
            "/:id",
            get(get_procurement)
                .put(update_procurement)
                .delete(delete_procurement),
        )
}

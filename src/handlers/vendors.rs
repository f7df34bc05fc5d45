use super::common::{
    created_response, map_service_error, success_response, validate_input, PaginatedResponse,
    PaginationParams,
};
use crate::{
    commands::vendors::{CreateVendorCommand, UpdateVendorCommand},
    errors::ApiError,
    handlers::AppState,
};
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateVendorRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub bank_account: Option<String>,
    pub bank_ifsc: Option<String>,
    pub default_rate: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateVendorRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub bank_account: Option<String>,
    pub bank_ifsc: Option<String>,
    pub default_rate: Option<Decimal>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct VendorFilterQuery {
    #[serde(default)]
    pub active_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct OutstandingQuery {
    pub threshold: Option<Decimal>,
}

/// Create a new vendor
async fn create_vendor(
    State(state): State<AppState>,
    Json(payload): Json<CreateVendorRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let command = CreateVendorCommand {
        name: payload.name,
        contact_name: payload.contact_name,
        phone: payload.phone,
        bank_account: payload.bank_account,
        bank_ifsc: payload.bank_ifsc,
        default_rate: payload.default_rate,
    };

    let vendor = state
        .services
        .vendors
        .create_vendor(command)
        .await
        .map_err(map_service_error)?;

    info!("Vendor created: {}", vendor.id);

    Ok(created_response(vendor))
}

/// List vendors with pagination
async fn list_vendors(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filter): Query<VendorFilterQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (vendors, total) = state
        .services
        .vendors
        .list_vendors(pagination.page, pagination.per_page, filter.active_only)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        vendors,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

/// Get a vendor by ID
async fn get_vendor(
    State(state): State<AppState>,
    Path(vendor_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let vendor = state
        .services
        .vendors
        .get_vendor(&vendor_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Vendor {} not found", vendor_id)))?;

    Ok(success_response(vendor))
}

/// Update vendor master data
async fn update_vendor(
    State(state): State<AppState>,
    Path(vendor_id): Path<Uuid>,
    Json(payload): Json<UpdateVendorRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let command = UpdateVendorCommand {
        id: vendor_id,
        name: payload.name,
        contact_name: payload.contact_name,
        phone: payload.phone,
        bank_account: payload.bank_account,
        bank_ifsc: payload.bank_ifsc,
        default_rate: payload.default_rate,
        is_active: payload.is_active,
    };

    let vendor = state
        .services
        .vendors
        .update_vendor(command)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(vendor))
}

/// Get the materialized ledger summary for a vendor
async fn get_vendor_summary(
    State(state): State<AppState>,
    Path(vendor_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = state
        .services
        .vendors
        .get_vendor_summary(&vendor_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(summary))
}

/// List vendors with an outstanding balance above the threshold (default 0)
async fn list_outstanding(
    State(state): State<AppState>,
    Query(query): Query<OutstandingQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let threshold = query.threshold.unwrap_or(Decimal::ZERO);
    let vendors = state
        .services
        .vendors
        .list_outstanding(threshold)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(vendors))
}

pub fn vendor_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vendors).post(create_vendor))
        .route("/outstanding", get(list_outstanding))
        .route("/:id", get(get_vendor).put(update_vendor))
        .route("/:id/summary", get(get_vendor_summary))
}

use super::common::{
    created_response, map_service_error, success_response, validate_input, PaginatedResponse,
    PaginationParams,
};
use crate::{
    commands::payments::{BulkPaymentRequest, RecordBulkPaymentsCommand, RecordPaymentCommand},
    entities::vendor_payment::PaymentMode,
    errors::ApiError,
    handlers::AppState,
};
use axum::{
    extract::{Json, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RecordPaymentRequest {
    pub vendor_id: Uuid,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub mode: PaymentMode,
    #[validate(length(max = 64))]
    pub reference_number: Option<String>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BulkPaymentsRequest {
    #[validate(length(min = 1, message = "At least one payment is required"))]
    pub payments: Vec<BulkPaymentItemRequest>,
}

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct BulkPaymentItemRequest {
    pub vendor_id: Uuid,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub mode: PaymentMode,
    #[validate(length(max = 64))]
    pub reference_number: Option<String>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PaymentFilterQuery {
    pub vendor_id: Option<Uuid>,
}

/// Record a single vendor payment
async fn record_payment(
    State(state): State<AppState>,
    Json(payload): Json<RecordPaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let command = RecordPaymentCommand {
        vendor_id: payload.vendor_id,
        payment_date: payload.date,
        amount: payload.amount,
        mode: payload.mode,
        reference_number: payload.reference_number,
        notes: payload.notes,
    };

    let payment = state
        .services
        .payments
        .record_payment(command)
        .await
        .map_err(map_service_error)?;

    info!("Payment recorded: {}", payment.id);

    Ok(created_response(payment))
}

/// Record a batch of payments with per-item outcome reporting
async fn record_bulk_payments(
    State(state): State<AppState>,
    Json(payload): Json<BulkPaymentsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let command = RecordBulkPaymentsCommand {
        payments: payload
            .payments
            .into_iter()
            .map(|item| BulkPaymentRequest {
                vendor_id: item.vendor_id,
                payment_date: item.date,
                amount: item.amount,
                mode: item.mode,
                reference_number: item.reference_number,
                notes: item.notes,
            })
            .collect(),
    };

    let outcome = state
        .services
        .payments
        .record_bulk_payments(command)
        .await
        .map_err(map_service_error)?;

    info!(
        "Bulk payments processed: {} succeeded, {} failed",
        outcome.succeeded, outcome.failed
    );

    Ok(success_response(outcome))
}

/// List payments
async fn list_payments(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filter): Query<PaymentFilterQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (payments, total) = state
        .services
        .payments
        .list_payments(filter.vendor_id, pagination.page, pagination.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        payments,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_payments).post(record_payment))
        .route("/bulk", post(record_bulk_payments))
}

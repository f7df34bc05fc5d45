use crate::{
    commands::payments::{BulkPaymentOutcome, RecordBulkPaymentsCommand, RecordPaymentCommand},
    commands::Command,
    db::DbPool,
    entities::vendor_payment::{self, Entity as VendorPayment},
    errors::ServiceError,
    events::EventSender,
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Service for vendor payments, single and bulk
#[derive(Clone)]
pub struct PaymentService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl PaymentService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self))]
    pub async fn record_payment(
        &self,
        command: RecordPaymentCommand,
    ) -> Result<vendor_payment::Model, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self))]
    pub async fn record_bulk_payments(
        &self,
        command: RecordBulkPaymentsCommand,
    ) -> Result<BulkPaymentOutcome, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    /// Lists payments, newest first, optionally scoped to one vendor.
    #[instrument(skip(self))]
    pub async fn list_payments(
        &self,
        vendor_id: Option<Uuid>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<vendor_payment::Model>, u64), ServiceError> {
        let mut query = VendorPayment::find().order_by_desc(vendor_payment::Column::PaymentDate);
        if let Some(vendor_id) = vendor_id {
            query = query.filter(vendor_payment::Column::VendorId.eq(vendor_id));
        }

        let paginator = query.paginate(self.db_pool.as_ref(), per_page);
        let total = paginator.num_items().await?;
        let payments = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((payments, total))
    }
}

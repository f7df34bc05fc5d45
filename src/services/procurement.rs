use crate::{
    commands::procurements::{
        DeleteProcurementCommand, RecordProcurementCommand, UpdateProcurementCommand,
    },
    commands::Command,
    db::DbPool,
    entities::milk_procurement::{self, Entity as MilkProcurement},
    errors::ServiceError,
    events::EventSender,
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Service for the procurement side of the vendor ledger
#[derive(Clone)]
pub struct ProcurementService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl ProcurementService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self))]
    pub async fn record_procurement(
        &self,
        command: RecordProcurementCommand,
    ) -> Result<milk_procurement::Model, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self))]
    pub async fn update_procurement(
        &self,
        command: UpdateProcurementCommand,
    ) -> Result<milk_procurement::Model, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete_procurement(&self, id: Uuid) -> Result<(), ServiceError> {
        DeleteProcurementCommand { id }
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get_procurement(
        &self,
        id: &Uuid,
    ) -> Result<Option<milk_procurement::Model>, ServiceError> {
        let entry = MilkProcurement::find_by_id(*id)
            .one(self.db_pool.as_ref())
            .await?;
        Ok(entry)
    }

    /// Lists procurement entries, most recent date first, optionally scoped
    /// to one vendor.
    #[instrument(skip(self))]
    pub async fn list_procurements(
        &self,
        vendor_id: Option<Uuid>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<milk_procurement::Model>, u64), ServiceError> {
        let mut query =
            MilkProcurement::find().order_by_desc(milk_procurement::Column::ProcurementDate);
        if let Some(vendor_id) = vendor_id {
            query = query.filter(milk_procurement::Column::VendorId.eq(vendor_id));
        }

        let paginator = query.paginate(self.db_pool.as_ref(), per_page);
        let total = paginator.num_items().await?;
        let entries = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((entries, total))
    }
}

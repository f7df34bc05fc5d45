use crate::{
    commands::vendors::{CreateVendorCommand, UpdateVendorCommand},
    commands::Command,
    db::DbPool,
    entities::milk_vendor::{self, Entity as MilkVendor},
    errors::ServiceError,
    events::EventSender,
};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

/// Vendor summary figures for reporting views. Returns the materialized
/// projection columns as stored; no recomputation from entry history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VendorSummary {
    pub vendor_id: Uuid,
    pub name: String,
    pub current_balance: Decimal,
    pub total_procurement: Decimal,
    pub total_paid: Decimal,
}

/// Service for vendor onboarding, master data and read projections
#[derive(Clone)]
pub struct VendorService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl VendorService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self))]
    pub async fn create_vendor(
        &self,
        command: CreateVendorCommand,
    ) -> Result<milk_vendor::Model, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self))]
    pub async fn update_vendor(
        &self,
        command: UpdateVendorCommand,
    ) -> Result<milk_vendor::Model, ServiceError> {
        command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_vendor(
        &self,
        vendor_id: &Uuid,
    ) -> Result<Option<milk_vendor::Model>, ServiceError> {
        let vendor = MilkVendor::find_by_id(*vendor_id)
            .one(self.db_pool.as_ref())
            .await?;
        Ok(vendor)
    }

    /// Lists vendors with pagination, newest first.
    #[instrument(skip(self))]
    pub async fn list_vendors(
        &self,
        page: u64,
        per_page: u64,
        active_only: bool,
    ) -> Result<(Vec<milk_vendor::Model>, u64), ServiceError> {
        let mut query = MilkVendor::find().order_by_desc(milk_vendor::Column::CreatedAt);
        if active_only {
            query = query.filter(milk_vendor::Column::IsActive.eq(true));
        }

        let paginator = query.paginate(self.db_pool.as_ref(), per_page);
        let total = paginator.num_items().await?;
        let vendors = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((vendors, total))
    }

    #[instrument(skip(self))]
    pub async fn get_vendor_summary(
        &self,
        vendor_id: &Uuid,
    ) -> Result<VendorSummary, ServiceError> {
        let vendor = MilkVendor::find_by_id(*vendor_id)
            .one(self.db_pool.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Vendor {} not found", vendor_id)))?;

        Ok(VendorSummary {
            vendor_id: vendor.id,
            name: vendor.name,
            current_balance: vendor.current_balance,
            total_procurement: vendor.total_procurement,
            total_paid: vendor.total_paid,
        })
    }

    /// Vendors owed more than `threshold`, highest balance first. Drives the
    /// bulk-payment workflow.
    #[instrument(skip(self))]
    pub async fn list_outstanding(
        &self,
        threshold: Decimal,
    ) -> Result<Vec<milk_vendor::Model>, ServiceError> {
        let vendors = MilkVendor::find()
            .filter(milk_vendor::Column::CurrentBalance.gt(threshold))
            .order_by_desc(milk_vendor::Column::CurrentBalance)
            .all(self.db_pool.as_ref())
            .await?;
        Ok(vendors)
    }
}

use crate::{
    commands::Command,
    db::DbPool,
    entities::milk_vendor,
    errors::ServiceError,
    events::{Event, EventSender},
    ledger::require_non_negative,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

/// Updates vendor master data. The balance projections are owned by the
/// balance projector and are never written here.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateVendorCommand {
    pub id: Uuid,
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    #[validate(length(max = 120))]
    pub contact_name: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(length(max = 34))]
    pub bank_account: Option<String>,
    #[validate(length(max = 11))]
    pub bank_ifsc: Option<String>,
    pub default_rate: Option<Decimal>,
    pub is_active: Option<bool>,
}

#[async_trait::async_trait]
impl Command for UpdateVendorCommand {
    type Result = milk_vendor::Model;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate().map_err(|e| {
            let msg = format!("Invalid input: {}", e);
            error!("{}", msg);
            ServiceError::ValidationError(msg)
        })?;
        if let Some(rate) = self.default_rate {
            require_non_negative("default_rate", rate)?;
        }

        let db = db_pool.as_ref();
        let vendor = milk_vendor::Entity::find_by_id(self.id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Vendor {} not found", self.id)))?;

        let mut active: milk_vendor::ActiveModel = vendor.into();
        if let Some(name) = &self.name {
            active.name = Set(name.clone());
        }
        if let Some(contact_name) = &self.contact_name {
            active.contact_name = Set(Some(contact_name.clone()));
        }
        if let Some(phone) = &self.phone {
            active.phone = Set(Some(phone.clone()));
        }
        if let Some(bank_account) = &self.bank_account {
            active.bank_account = Set(Some(bank_account.clone()));
        }
        if let Some(bank_ifsc) = &self.bank_ifsc {
            active.bank_ifsc = Set(Some(bank_ifsc.clone()));
        }
        if let Some(rate) = self.default_rate {
            active.default_rate = Set(rate);
        }
        if let Some(is_active) = self.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(db).await?;

        info!(vendor_id = %updated.id, "Vendor updated");
        event_sender
            .send(Event::VendorUpdated(updated.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(updated)
    }
}

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
use sea_orm::{ActiveModelTrait, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateVendorCommand {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(max = 120))]
    pub contact_name: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(length(max = 34))]
    pub bank_account: Option<String>,
    #[validate(length(max = 11))]
    pub bank_ifsc: Option<String>,
    pub default_rate: Decimal,
}

#[async_trait::async_trait]
impl Command for CreateVendorCommand {
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
        require_non_negative("default_rate", self.default_rate)?;

        let vendor = milk_vendor::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(self.name.clone()),
            contact_name: Set(self.contact_name.clone()),
            phone: Set(self.phone.clone()),
            bank_account: Set(self.bank_account.clone()),
            bank_ifsc: Set(self.bank_ifsc.clone()),
            default_rate: Set(self.default_rate),
            is_active: Set(true),
            current_balance: Set(Decimal::ZERO),
            total_procurement: Set(Decimal::ZERO),
            total_paid: Set(Decimal::ZERO),
            version: Set(1),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };

        let saved = vendor.insert(db_pool.as_ref()).await?;

        info!(vendor_id = %saved.id, name = %saved.name, "Vendor created");
        event_sender
            .send(Event::VendorCreated(saved.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn base_command() -> CreateVendorCommand {
        CreateVendorCommand {
            name: "Gokul Dairy Co-op".to_string(),
            contact_name: Some("R. Patil".to_string()),
            phone: Some("9822000000".to_string()),
            bank_account: None,
            bank_ifsc: None,
            default_rate: dec!(45.00),
        }
    }

    #[test]
    fn empty_name_fails_validation() {
        let mut cmd = base_command();
        cmd.name = String::new();
        assert!(cmd.validate().is_err());
    }

    #[test]
    fn valid_command_passes_validation() {
        assert!(base_command().validate().is_ok());
    }
}

use crate::{
    commands::Command,
    db::DbPool,
    entities::milk_procurement::{self, MilkSession, ProcurementPaymentStatus},
    errors::ServiceError,
    events::{Event, EventSender},
    ledger::{line_total, require_non_negative, require_positive, BalanceProjector, LedgerDelta},
};
use chrono::{NaiveDate, Utc};
use lazy_static::lazy_static;
use prometheus::IntCounter;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionError, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;

lazy_static! {
    static ref PROCUREMENTS_UPDATED: IntCounter = IntCounter::new(
        "milk_procurements_updated_total",
        "Total number of procurement entries updated"
    )
    .expect("metric can be created");
}

/// Partial update of a procurement entry.
///
/// A changed quantity or rate recomputes `total_amount` and reconciles the
/// vendor projections with the difference, in the same transaction as the
/// row update. The entry and the vendor row can never disagree.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateProcurementCommand {
    pub id: Uuid,
    pub procurement_date: Option<NaiveDate>,
    pub session: Option<MilkSession>,
    pub quantity: Option<Decimal>,
    pub fat_pct: Option<Decimal>,
    pub snf_pct: Option<Decimal>,
    pub rate_per_litre: Option<Decimal>,
    pub payment_status: Option<ProcurementPaymentStatus>,
}

pub struct UpdateProcurementResult {
    pub procurement: milk_procurement::Model,
    pub old_total: Decimal,
}

#[async_trait::async_trait]
impl Command for UpdateProcurementCommand {
    type Result = milk_procurement::Model;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.check_input().map_err(|e| {
            error!("{}", e);
            e
        })?;

        let result = self.update_in_db(db_pool.as_ref()).await?;

        info!(
            procurement_id = %result.procurement.id,
            vendor_id = %result.procurement.vendor_id,
            old_total = %result.old_total,
            new_total = %result.procurement.total_amount,
            "Procurement updated"
        );
        event_sender
            .send(Event::ProcurementUpdated {
                procurement_id: result.procurement.id,
                vendor_id: result.procurement.vendor_id,
                old_total: result.old_total,
                new_total: result.procurement.total_amount,
            })
            .await
            .map_err(ServiceError::EventError)?;
        PROCUREMENTS_UPDATED.inc();

        Ok(result.procurement)
    }
}

impl UpdateProcurementCommand {
    fn check_input(&self) -> Result<(), ServiceError> {
        if let Some(quantity) = self.quantity {
            require_positive("quantity", quantity)?;
        }
        if let Some(rate) = self.rate_per_litre {
            require_positive("rate_per_litre", rate)?;
        }
        if let Some(fat_pct) = self.fat_pct {
            require_non_negative("fat_pct", fat_pct)?;
        }
        if let Some(snf_pct) = self.snf_pct {
            require_non_negative("snf_pct", snf_pct)?;
        }
        Ok(())
    }

    async fn update_in_db(
        &self,
        db: &DatabaseConnection,
    ) -> Result<UpdateProcurementResult, ServiceError> {
        let id = self.id;
        let procurement_date = self.procurement_date;
        let session = self.session;
        let quantity = self.quantity;
        let fat_pct = self.fat_pct;
        let snf_pct = self.snf_pct;
        let rate_per_litre = self.rate_per_litre;
        let payment_status = self.payment_status;

        db.transaction::<_, UpdateProcurementResult, ServiceError>(|txn| {
            Box::pin(async move {
                let existing = milk_procurement::Entity::find_by_id(id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!("Procurement entry {} not found", id))
                    })?;

                let vendor_id = existing.vendor_id;
                let old_total = existing.total_amount;
                let new_quantity = quantity.unwrap_or(existing.quantity);
                let new_rate = rate_per_litre.unwrap_or(existing.rate_per_litre);
                let new_total = line_total(new_quantity, new_rate);

                let mut active: milk_procurement::ActiveModel = existing.into();
                if let Some(date) = procurement_date {
                    active.procurement_date = Set(date);
                }
                if let Some(session) = session {
                    active.session = Set(session);
                }
                if let Some(fat_pct) = fat_pct {
                    active.fat_pct = Set(fat_pct);
                }
                if let Some(snf_pct) = snf_pct {
                    active.snf_pct = Set(snf_pct);
                }
                if let Some(status) = payment_status {
                    active.payment_status = Set(status);
                }
                active.quantity = Set(new_quantity);
                active.rate_per_litre = Set(new_rate);
                active.total_amount = Set(new_total);
                active.updated_at = Set(Some(Utc::now()));

                let updated = active.update(txn).await?;

                BalanceProjector::apply(
                    txn,
                    vendor_id,
                    &LedgerDelta::procurement_adjusted(old_total, new_total),
                )
                .await?;

                Ok(UpdateProcurementResult {
                    procurement: updated,
                    old_total,
                })
            })
        })
        .await
        .map_err(|e| match e {
            TransactionError::Connection(db_err) => ServiceError::DatabaseError(db_err),
            TransactionError::Transaction(service_err) => service_err,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    #[test]
    fn non_positive_quantity_is_rejected() {
        let cmd = UpdateProcurementCommand {
            id: Uuid::new_v4(),
            procurement_date: None,
            session: None,
            quantity: Some(dec!(0)),
            fat_pct: None,
            snf_pct: None,
            rate_per_litre: None,
            payment_status: None,
        };
        assert_matches!(cmd.check_input(), Err(ServiceError::ValidationError(_)));
    }

    #[test]
    fn empty_update_passes_validation() {
        let cmd = UpdateProcurementCommand {
            id: Uuid::new_v4(),
            procurement_date: None,
            session: None,
            quantity: None,
            fat_pct: None,
            snf_pct: None,
            rate_per_litre: None,
            payment_status: None,
        };
        assert!(cmd.check_input().is_ok());
    }
}

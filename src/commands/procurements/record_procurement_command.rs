use crate::{
    commands::Command,
    db::DbPool,
    entities::milk_procurement::{self, MilkSession, ProcurementPaymentStatus},
    entities::milk_vendor,
    errors::ServiceError,
    events::{Event, EventSender},
    ledger::{line_total, require_non_negative, require_positive, BalanceProjector, LedgerDelta},
};
use chrono::{NaiveDate, Utc};
use lazy_static::lazy_static;
use prometheus::{IntCounter, IntCounterVec, Opts};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionError, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

lazy_static! {
    static ref PROCUREMENTS_RECORDED: IntCounter = IntCounter::new(
        "milk_procurements_recorded_total",
        "Total number of procurement entries recorded"
    )
    .expect("metric can be created");
    static ref PROCUREMENT_FAILURES: IntCounterVec = IntCounterVec::new(
        Opts::new(
            "milk_procurement_failures_total",
            "Total number of failed procurement recordings"
        ),
        &["error_type"]
    )
    .expect("metric can be created");
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RecordProcurementCommand {
    pub vendor_id: Uuid,
    pub procurement_date: NaiveDate,
    pub session: MilkSession,
    pub quantity: Decimal,
    pub fat_pct: Decimal,
    pub snf_pct: Decimal,
    /// Falls back to the vendor's default rate when absent.
    pub rate_per_litre: Option<Decimal>,
}

#[async_trait::async_trait]
impl Command for RecordProcurementCommand {
    type Result = milk_procurement::Model;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.check_input().map_err(|e| {
            PROCUREMENT_FAILURES
                .with_label_values(&["validation_error"])
                .inc();
            error!("{}", e);
            e
        })?;

        let saved = self.record_in_db(db_pool.as_ref()).await.map_err(|e| {
            PROCUREMENT_FAILURES
                .with_label_values(&["ledger_error"])
                .inc();
            e
        })?;

        self.log_and_trigger_event(&event_sender, &saved).await?;
        PROCUREMENTS_RECORDED.inc();

        Ok(saved)
    }
}

impl RecordProcurementCommand {
    fn check_input(&self) -> Result<(), ServiceError> {
        self.validate()
            .map_err(|e| ServiceError::ValidationError(format!("Invalid input: {}", e)))?;
        require_positive("quantity", self.quantity)?;
        require_non_negative("fat_pct", self.fat_pct)?;
        require_non_negative("snf_pct", self.snf_pct)?;
        if let Some(rate) = self.rate_per_litre {
            require_positive("rate_per_litre", rate)?;
        }
        Ok(())
    }

    /// Inserts the entry and applies the balance delta in one transaction.
    async fn record_in_db(
        &self,
        db: &DatabaseConnection,
    ) -> Result<milk_procurement::Model, ServiceError> {
        let vendor_id = self.vendor_id;
        let procurement_date = self.procurement_date;
        let session = self.session;
        let quantity = self.quantity;
        let fat_pct = self.fat_pct;
        let snf_pct = self.snf_pct;
        let requested_rate = self.rate_per_litre;

        db.transaction::<_, milk_procurement::Model, ServiceError>(|txn| {
            Box::pin(async move {
                let vendor = milk_vendor::Entity::find_by_id(vendor_id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!("Vendor {} not found", vendor_id))
                    })?;
                if !vendor.is_active {
                    return Err(ServiceError::ValidationError(format!(
                        "Vendor {} is inactive",
                        vendor_id
                    )));
                }

                let rate = requested_rate.unwrap_or(vendor.default_rate);
                require_positive("rate_per_litre", rate)?;
                let total_amount = line_total(quantity, rate);

                let entry = milk_procurement::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    vendor_id: Set(vendor_id),
                    procurement_date: Set(procurement_date),
                    session: Set(session),
                    quantity: Set(quantity),
                    fat_pct: Set(fat_pct),
                    snf_pct: Set(snf_pct),
                    rate_per_litre: Set(rate),
                    total_amount: Set(total_amount),
                    payment_status: Set(ProcurementPaymentStatus::Pending),
                    created_at: Set(Utc::now()),
                    updated_at: Set(None),
                };
                let saved = entry.insert(txn).await?;

                BalanceProjector::apply(
                    txn,
                    vendor_id,
                    &LedgerDelta::procurement_recorded(total_amount),
                )
                .await?;

                Ok(saved)
            })
        })
        .await
        .map_err(|e| match e {
            TransactionError::Connection(db_err) => ServiceError::DatabaseError(db_err),
            TransactionError::Transaction(service_err) => service_err,
        })
    }

    async fn log_and_trigger_event(
        &self,
        event_sender: &EventSender,
        saved: &milk_procurement::Model,
    ) -> Result<(), ServiceError> {
        info!(
            procurement_id = %saved.id,
            vendor_id = %saved.vendor_id,
            quantity = %saved.quantity,
            total_amount = %saved.total_amount,
            "Procurement recorded"
        );
        event_sender
            .send(Event::ProcurementRecorded {
                procurement_id: saved.id,
                vendor_id: saved.vendor_id,
                total_amount: saved.total_amount,
            })
            .await
            .map_err(|e| {
                PROCUREMENT_FAILURES
                    .with_label_values(&["event_error"])
                    .inc();
                ServiceError::EventError(e)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    fn base_command() -> RecordProcurementCommand {
        RecordProcurementCommand {
            vendor_id: Uuid::new_v4(),
            procurement_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            session: MilkSession::Morning,
            quantity: dec!(50.00),
            fat_pct: dec!(4.2),
            snf_pct: dec!(8.5),
            rate_per_litre: Some(dec!(45.00)),
        }
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let mut cmd = base_command();
        cmd.quantity = Decimal::ZERO;
        assert_matches!(cmd.check_input(), Err(ServiceError::ValidationError(_)));
    }

    #[test]
    fn negative_rate_is_rejected() {
        let mut cmd = base_command();
        cmd.rate_per_litre = Some(dec!(-1));
        assert_matches!(cmd.check_input(), Err(ServiceError::ValidationError(_)));
    }

    #[test]
    fn valid_input_passes() {
        assert!(base_command().check_input().is_ok());
    }
}

use crate::{
    commands::Command,
    db::DbPool,
    entities::milk_vendor,
    entities::vendor_payment::{self, PaymentMode},
    errors::ServiceError,
    events::{Event, EventSender},
    ledger::{require_positive, BalanceProjector, LedgerDelta},
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
    static ref PAYMENTS_RECORDED: IntCounter = IntCounter::new(
        "vendor_payments_recorded_total",
        "Total number of vendor payments recorded"
    )
    .expect("metric can be created");
    static ref PAYMENT_FAILURES: IntCounterVec = IntCounterVec::new(
        Opts::new(
            "vendor_payment_failures_total",
            "Total number of failed vendor payment recordings"
        ),
        &["error_type"]
    )
    .expect("metric can be created");
}

/// Records one payment to a vendor.
///
/// Inactive vendors can still be paid: deactivation stops procurement, not
/// the settling of dues. Overpayment is allowed and drives the balance
/// negative (vendor credit).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordPaymentCommand {
    pub vendor_id: Uuid,
    pub payment_date: NaiveDate,
    pub amount: Decimal,
    pub mode: PaymentMode,
    #[validate(length(max = 64))]
    pub reference_number: Option<String>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

#[async_trait::async_trait]
impl Command for RecordPaymentCommand {
    type Result = vendor_payment::Model;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.check_input().map_err(|e| {
            PAYMENT_FAILURES
                .with_label_values(&["validation_error"])
                .inc();
            error!("{}", e);
            e
        })?;

        let saved = self.record_in_db(db_pool.as_ref()).await.map_err(|e| {
            PAYMENT_FAILURES.with_label_values(&["ledger_error"]).inc();
            e
        })?;

        info!(
            payment_id = %saved.id,
            vendor_id = %saved.vendor_id,
            amount = %saved.amount,
            "Payment recorded"
        );
        event_sender
            .send(Event::PaymentRecorded {
                payment_id: saved.id,
                vendor_id: saved.vendor_id,
                amount: saved.amount,
            })
            .await
            .map_err(|e| {
                PAYMENT_FAILURES.with_label_values(&["event_error"]).inc();
                ServiceError::EventError(e)
            })?;
        PAYMENTS_RECORDED.inc();

        Ok(saved)
    }
}

impl RecordPaymentCommand {
    fn check_input(&self) -> Result<(), ServiceError> {
        self.validate()
            .map_err(|e| ServiceError::ValidationError(format!("Invalid input: {}", e)))?;
        require_positive("amount", self.amount)
    }

    /// Inserts the payment row and applies the balance delta in one transaction.
    async fn record_in_db(
        &self,
        db: &DatabaseConnection,
    ) -> Result<vendor_payment::Model, ServiceError> {
        let vendor_id = self.vendor_id;
        let payment_date = self.payment_date;
        let amount = self.amount;
        let mode = self.mode;
        let reference_number = self.reference_number.clone();
        let notes = self.notes.clone();

        db.transaction::<_, vendor_payment::Model, ServiceError>(|txn| {
            Box::pin(async move {
                let exists = milk_vendor::Entity::find_by_id(vendor_id).one(txn).await?;
                if exists.is_none() {
                    return Err(ServiceError::NotFound(format!(
                        "Vendor {} not found",
                        vendor_id
                    )));
                }

                let payment = vendor_payment::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    vendor_id: Set(vendor_id),
                    payment_date: Set(payment_date),
                    amount: Set(amount),
                    mode: Set(mode),
                    reference_number: Set(reference_number),
                    notes: Set(notes),
                    created_at: Set(Utc::now()),
                };
                let saved = payment.insert(txn).await?;

                BalanceProjector::apply(txn, vendor_id, &LedgerDelta::payment_recorded(amount))
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
}

use crate::{
    commands::payments::RecordPaymentCommand,
    commands::Command,
    db::DbPool,
    entities::vendor_payment::PaymentMode,
    errors::ServiceError,
    events::EventSender,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// One requested payment inside a bulk submission.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct BulkPaymentRequest {
    pub vendor_id: Uuid,
    pub payment_date: NaiveDate,
    pub amount: Decimal,
    pub mode: PaymentMode,
    #[validate(length(max = 64))]
    pub reference_number: Option<String>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// Per-item result of a bulk submission, in input order.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BulkPaymentItemOutcome {
    pub index: usize,
    pub vendor_id: Uuid,
    pub amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BulkPaymentItemOutcome {
    pub fn succeeded(&self) -> bool {
        self.payment_id.is_some()
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BulkPaymentOutcome {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub items: Vec<BulkPaymentItemOutcome>,
}

/// Applies a batch of payments sequentially through the single-payment path.
///
/// Best effort, no rollback: a failed item leaves earlier items committed
/// and later items are still attempted. Every input item appears exactly
/// once in the outcome, so the caller can render a per-row progress list.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RecordBulkPaymentsCommand {
    #[validate(length(min = 1, message = "At least one payment is required"))]
    pub payments: Vec<BulkPaymentRequest>,
}

#[async_trait::async_trait]
impl Command for RecordBulkPaymentsCommand {
    type Result = BulkPaymentOutcome;

    #[instrument(skip(self, db_pool, event_sender), fields(batch_size = self.payments.len()))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate()
            .map_err(|e| ServiceError::ValidationError(format!("Invalid input: {}", e)))?;

        let mut items = Vec::with_capacity(self.payments.len());
        for (index, request) in self.payments.iter().enumerate() {
            let command = RecordPaymentCommand {
                vendor_id: request.vendor_id,
                payment_date: request.payment_date,
                amount: request.amount,
                mode: request.mode,
                reference_number: request.reference_number.clone(),
                notes: request.notes.clone(),
            };

            match command.execute(db_pool.clone(), event_sender.clone()).await {
                Ok(payment) => items.push(BulkPaymentItemOutcome {
                    index,
                    vendor_id: request.vendor_id,
                    amount: request.amount,
                    payment_id: Some(payment.id),
                    error: None,
                }),
                Err(e) => {
                    warn!(
                        index,
                        vendor_id = %request.vendor_id,
                        error = %e,
                        "Bulk payment item failed; continuing with remaining items"
                    );
                    items.push(BulkPaymentItemOutcome {
                        index,
                        vendor_id: request.vendor_id,
                        amount: request.amount,
                        payment_id: None,
                        error: Some(e.response_message()),
                    });
                }
            }
        }

        let succeeded = items.iter().filter(|item| item.succeeded()).count();
        let outcome = BulkPaymentOutcome {
            total: items.len(),
            succeeded,
            failed: items.len() - succeeded,
            items,
        };

        info!(
            total = outcome.total,
            succeeded = outcome.succeeded,
            failed = outcome.failed,
            "Bulk payment batch processed"
        );

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn empty_batch_fails_validation() {
        let cmd = RecordBulkPaymentsCommand { payments: vec![] };
        assert!(cmd.validate().is_err());
    }

    #[test]
    fn outcome_counts_are_consistent() {
        let items = vec![
            BulkPaymentItemOutcome {
                index: 0,
                vendor_id: Uuid::new_v4(),
                amount: dec!(100),
                payment_id: Some(Uuid::new_v4()),
                error: None,
            },
            BulkPaymentItemOutcome {
                index: 1,
                vendor_id: Uuid::new_v4(),
                amount: dec!(200),
                payment_id: None,
                error: Some("Not found: Vendor missing".to_string()),
            },
        ];
        let succeeded = items.iter().filter(|i| i.succeeded()).count();
        assert_eq!(succeeded, 1);
        assert_eq!(items.len() - succeeded, 1);
    }
}

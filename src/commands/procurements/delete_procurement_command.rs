use crate::{
    commands::Command,
    db::DbPool,
    entities::milk_procurement,
    errors::ServiceError,
    events::{Event, EventSender},
    ledger::{BalanceProjector, LedgerDelta},
};
use lazy_static::lazy_static;
use prometheus::IntCounter;
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, EntityTrait, TransactionError, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

lazy_static! {
    static ref PROCUREMENTS_DELETED: IntCounter = IntCounter::new(
        "milk_procurements_deleted_total",
        "Total number of procurement entries deleted"
    )
    .expect("metric can be created");
}

/// Deletes a procurement entry and reverses its balance delta atomically.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteProcurementCommand {
    pub id: Uuid,
}

pub struct DeleteProcurementResult {
    pub vendor_id: Uuid,
    pub total_amount: Decimal,
}

#[async_trait::async_trait]
impl Command for DeleteProcurementCommand {
    type Result = DeleteProcurementResult;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        let result = self.delete_in_db(db_pool.as_ref()).await?;

        info!(
            procurement_id = %self.id,
            vendor_id = %result.vendor_id,
            total_amount = %result.total_amount,
            "Procurement deleted, balance reversed"
        );
        event_sender
            .send(Event::ProcurementDeleted {
                procurement_id: self.id,
                vendor_id: result.vendor_id,
                total_amount: result.total_amount,
            })
            .await
            .map_err(ServiceError::EventError)?;
        PROCUREMENTS_DELETED.inc();

        Ok(result)
    }
}

impl DeleteProcurementCommand {
    async fn delete_in_db(
        &self,
        db: &DatabaseConnection,
    ) -> Result<DeleteProcurementResult, ServiceError> {
        let id = self.id;

        db.transaction::<_, DeleteProcurementResult, ServiceError>(|txn| {
            Box::pin(async move {
                let existing = milk_procurement::Entity::find_by_id(id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!("Procurement entry {} not found", id))
                    })?;

                let delete_result = milk_procurement::Entity::delete_by_id(id).exec(txn).await?;
                if delete_result.rows_affected == 0 {
                    return Err(ServiceError::ConcurrencyConflict(format!(
                        "Procurement entry {} was removed concurrently",
                        id
                    )));
                }

                BalanceProjector::apply(
                    txn,
                    existing.vendor_id,
                    &LedgerDelta::procurement_deleted(existing.total_amount),
                )
                .await?;

                Ok(DeleteProcurementResult {
                    vendor_id: existing.vendor_id,
                    total_amount: existing.total_amount,
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

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// Domain events emitted after a ledger mutation commits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    VendorCreated(Uuid),
    VendorUpdated(Uuid),
    ProcurementRecorded {
        procurement_id: Uuid,
        vendor_id: Uuid,
        total_amount: Decimal,
    },
    ProcurementUpdated {
        procurement_id: Uuid,
        vendor_id: Uuid,
        old_total: Decimal,
        new_total: Decimal,
    },
    ProcurementDeleted {
        procurement_id: Uuid,
        vendor_id: Uuid,
        total_amount: Decimal,
    },
    PaymentRecorded {
        payment_id: Uuid,
        vendor_id: Uuid,
        amount: Decimal,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Consumes the event channel and dispatches events to interested handlers.
/// Currently the handlers log; notification fan-out hangs off this loop.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match event {
            Event::VendorCreated(vendor_id) => {
                info!(%vendor_id, "vendor created");
            }
            Event::VendorUpdated(vendor_id) => {
                info!(%vendor_id, "vendor updated");
            }
            Event::ProcurementRecorded {
                procurement_id,
                vendor_id,
                total_amount,
            } => {
                info!(%procurement_id, %vendor_id, %total_amount, "procurement recorded");
            }
            Event::ProcurementUpdated {
                procurement_id,
                vendor_id,
                old_total,
                new_total,
            } => {
                info!(%procurement_id, %vendor_id, %old_total, %new_total, "procurement updated");
            }
            Event::ProcurementDeleted {
                procurement_id,
                vendor_id,
                total_amount,
            } => {
                info!(%procurement_id, %vendor_id, %total_amount, "procurement deleted");
            }
            Event::PaymentRecorded {
                payment_id,
                vendor_id,
                amount,
            } => {
                info!(%payment_id, %vendor_id, %amount, "payment recorded");
            }
        }
    }

    warn!("Event channel closed; event processing loop exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn send_delivers_to_receiver() {
        let (tx, mut rx) = mpsc::channel(4);
        let sender = EventSender::new(tx);

        let vendor_id = Uuid::new_v4();
        sender
            .send(Event::PaymentRecorded {
                payment_id: Uuid::new_v4(),
                vendor_id,
                amount: dec!(100.00),
            })
            .await
            .expect("send");

        match rx.recv().await {
            Some(Event::PaymentRecorded { vendor_id: v, .. }) => assert_eq!(v, vendor_id),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn send_fails_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);
        let result = sender.send(Event::VendorCreated(Uuid::new_v4())).await;
        assert!(result.is_err());
    }
}

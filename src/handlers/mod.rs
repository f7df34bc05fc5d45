pub mod common;
pub mod payments;
pub mod procurements;
pub mod vendors;

use crate::db::DbPool;
use crate::events::EventSender;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub vendors: Arc<crate::services::vendors::VendorService>,
    pub procurement: Arc<crate::services::procurement::ProcurementService>,
    pub payments: Arc<crate::services::payments::PaymentService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        let vendors = Arc::new(crate::services::vendors::VendorService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let procurement = Arc::new(crate::services::procurement::ProcurementService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let payments = Arc::new(crate::services::payments::PaymentService::new(
            db_pool,
            event_sender,
        ));

        Self {
            vendors,
            procurement,
            payments,
        }
    }
}

use dairyledger_api::{
    commands::vendors::CreateVendorCommand,
    entities::milk_vendor,
    events::{process_events, EventSender},
    handlers::AppServices,
    migrator::Migrator,
};
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;
use tokio::sync::mpsc;

pub struct TestApp {
    pub db: Arc<DatabaseConnection>,
    pub services: AppServices,
    pub event_sender: EventSender,
}

/// Boots the full service stack against an in-memory SQLite database with
/// the embedded migrations applied. The single-connection pool keeps every
/// statement on the one shared in-memory database.
pub async fn spawn_app() -> TestApp {
    let mut opts = ConnectOptions::new("sqlite::memory:".to_owned());
    opts.max_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await.expect("sqlite connect");
    Migrator::up(&db, None).await.expect("migrations");

    let db = Arc::new(db);
    let (tx, rx) = mpsc::channel(256);
    let event_sender = EventSender::new(tx);
    tokio::spawn(process_events(rx));

    let services = AppServices::new(db.clone(), Arc::new(event_sender.clone()));

    TestApp {
        db,
        services,
        event_sender,
    }
}

impl TestApp {
    /// Creates an active vendor with the given default rate.
    pub async fn seed_vendor(&self, name: &str, default_rate: Decimal) -> milk_vendor::Model {
        self.services
            .vendors
            .create_vendor(CreateVendorCommand {
                name: name.to_string(),
                contact_name: None,
                phone: None,
                bank_account: None,
                bank_ifsc: None,
                default_rate,
            })
            .await
            .expect("seed vendor")
    }

    pub async fn vendor(&self, id: uuid::Uuid) -> milk_vendor::Model {
        self.services
            .vendors
            .get_vendor(&id)
            .await
            .expect("get vendor")
            .expect("vendor exists")
    }
}

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A milk vendor with materialized ledger projections.
///
/// `current_balance`, `total_procurement` and `total_paid` are maintained
/// exclusively by the balance projector; `current_balance` always equals
/// `total_procurement - total_paid`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "milk_vendors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub id: Uuid,
    pub name: String,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub bank_account: Option<String>,
    pub bank_ifsc: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub default_rate: Decimal,
    pub is_active: bool,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub current_balance: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub total_procurement: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub total_paid: Decimal,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::milk_procurement::Entity")]
    Procurements,
    #[sea_orm(has_many = "super::vendor_payment::Entity")]
    Payments,
}

impl Related<super::milk_procurement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Procurements.def()
    }
}

impl Related<super::vendor_payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! Vendor balance projection.
//!
//! The three materialized columns on `milk_vendors` (`current_balance`,
//! `total_procurement`, `total_paid`) are written only through
//! [`BalanceProjector::apply`], which issues a single atomic
//! `SET col = col + delta` statement. Callers run it inside the same
//! transaction as the ledger entry write, so concurrent events for one
//! vendor serialize on the row and no delta can be lost.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::entities::milk_vendor;
use crate::errors::ServiceError;

/// Signed change to the vendor projections produced by one ledger event.
///
/// Invariant: `balance == procurement - paid` for every constructor, so
/// applying any sequence of deltas preserves
/// `current_balance == total_procurement - total_paid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerDelta {
    pub balance: Decimal,
    pub procurement: Decimal,
    pub paid: Decimal,
}

impl LedgerDelta {
    /// A procurement entry was created for `total_amount`.
    pub fn procurement_recorded(total_amount: Decimal) -> Self {
        Self {
            balance: total_amount,
            procurement: total_amount,
            paid: Decimal::ZERO,
        }
    }

    /// A procurement entry of `total_amount` was deleted; exact reversal.
    pub fn procurement_deleted(total_amount: Decimal) -> Self {
        Self {
            balance: -total_amount,
            procurement: -total_amount,
            paid: Decimal::ZERO,
        }
    }

    /// A procurement entry changed value from `old_total` to `new_total`.
    pub fn procurement_adjusted(old_total: Decimal, new_total: Decimal) -> Self {
        Self {
            balance: new_total - old_total,
            procurement: new_total - old_total,
            paid: Decimal::ZERO,
        }
    }

    /// A payment of `amount` was recorded against the vendor.
    pub fn payment_recorded(amount: Decimal) -> Self {
        Self {
            balance: -amount,
            procurement: Decimal::ZERO,
            paid: amount,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.balance.is_zero() && self.procurement.is_zero() && self.paid.is_zero()
    }
}

/// Sole writer of the vendor balance projections.
pub struct BalanceProjector;

impl BalanceProjector {
    /// Applies `delta` to the vendor row with storage-side arithmetic.
    ///
    /// Returns `NotFound` when the vendor row does not exist (or was removed
    /// between the caller's lookup and this write).
    pub async fn apply<C: ConnectionTrait>(
        conn: &C,
        vendor_id: Uuid,
        delta: &LedgerDelta,
    ) -> Result<(), ServiceError> {
        if delta.is_noop() {
            return Ok(());
        }

        let result = milk_vendor::Entity::update_many()
            .col_expr(
                milk_vendor::Column::CurrentBalance,
                Expr::col(milk_vendor::Column::CurrentBalance).add(Expr::val(delta.balance)),
            )
            .col_expr(
                milk_vendor::Column::TotalProcurement,
                Expr::col(milk_vendor::Column::TotalProcurement).add(Expr::val(delta.procurement)),
            )
            .col_expr(
                milk_vendor::Column::TotalPaid,
                Expr::col(milk_vendor::Column::TotalPaid).add(Expr::val(delta.paid)),
            )
            .col_expr(
                milk_vendor::Column::Version,
                Expr::col(milk_vendor::Column::Version).add(Expr::val(1)),
            )
            .col_expr(milk_vendor::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(milk_vendor::Column::Id.eq(vendor_id))
            .exec(conn)
            .await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Vendor {} not found",
                vendor_id
            )));
        }

        Ok(())
    }
}

/// Rejects non-positive money/quantity inputs with a `ValidationError`.
pub fn require_positive(field: &str, value: Decimal) -> Result<(), ServiceError> {
    if value <= Decimal::ZERO {
        return Err(ServiceError::ValidationError(format!(
            "{} must be positive, got {}",
            field, value
        )));
    }
    Ok(())
}

/// Rejects negative inputs (zero allowed) with a `ValidationError`.
pub fn require_non_negative(field: &str, value: Decimal) -> Result<(), ServiceError> {
    if value < Decimal::ZERO {
        return Err(ServiceError::ValidationError(format!(
            "{} must not be negative, got {}",
            field, value
        )));
    }
    Ok(())
}

/// Line total for a procurement entry, rounded to currency precision.
pub fn line_total(quantity: Decimal, rate_per_litre: Decimal) -> Decimal {
    (quantity * rate_per_litre).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn every_delta_keeps_the_ledger_invariant() {
        let deltas = [
            LedgerDelta::procurement_recorded(dec!(2250.00)),
            LedgerDelta::procurement_deleted(dec!(2250.00)),
            LedgerDelta::procurement_adjusted(dec!(500.00), dec!(600.00)),
            LedgerDelta::payment_recorded(dec!(2000.00)),
        ];
        for delta in deltas {
            assert_eq!(delta.balance, delta.procurement - delta.paid);
        }
    }

    #[test]
    fn delete_reverses_create_exactly() {
        let created = LedgerDelta::procurement_recorded(dec!(123.45));
        let deleted = LedgerDelta::procurement_deleted(dec!(123.45));
        assert_eq!(created.balance + deleted.balance, Decimal::ZERO);
        assert_eq!(created.procurement + deleted.procurement, Decimal::ZERO);
    }

    #[test]
    fn unchanged_total_is_a_noop_adjustment() {
        assert!(LedgerDelta::procurement_adjusted(dec!(500.00), dec!(500.00)).is_noop());
        assert!(!LedgerDelta::procurement_adjusted(dec!(500.00), dec!(600.00)).is_noop());
    }

    #[test]
    fn line_total_rounds_to_currency_precision() {
        assert_eq!(line_total(dec!(50), dec!(45)), dec!(2250));
        assert_eq!(line_total(dec!(3.33), dec!(33.33)), dec!(110.99));
        assert_eq!(line_total(dec!(1.555), dec!(10)), dec!(15.55));
    }

    #[test]
    fn positive_and_non_negative_guards() {
        assert!(require_positive("amount", dec!(0.01)).is_ok());
        assert!(require_positive("amount", Decimal::ZERO).is_err());
        assert!(require_positive("amount", dec!(-5)).is_err());
        assert!(require_non_negative("fat_pct", Decimal::ZERO).is_ok());
        assert!(require_non_negative("fat_pct", dec!(-0.1)).is_err());
    }
}

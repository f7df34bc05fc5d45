mod common;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use dairyledger_api::{
    commands::payments::RecordPaymentCommand,
    commands::procurements::{RecordProcurementCommand, UpdateProcurementCommand},
    commands::vendors::UpdateVendorCommand,
    entities::milk_procurement::MilkSession,
    entities::vendor_payment::PaymentMode,
    errors::ServiceError,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

fn procurement(
    vendor_id: Uuid,
    quantity: Decimal,
    rate: Option<Decimal>,
) -> RecordProcurementCommand {
    RecordProcurementCommand {
        vendor_id,
        procurement_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        session: MilkSession::Morning,
        quantity,
        fat_pct: dec!(4.0),
        snf_pct: dec!(8.5),
        rate_per_litre: rate,
    }
}

fn payment(vendor_id: Uuid, amount: Decimal) -> RecordPaymentCommand {
    RecordPaymentCommand {
        vendor_id,
        payment_date: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
        amount,
        mode: PaymentMode::Bank,
        reference_number: None,
        notes: None,
    }
}

// Procure 50 L at 45/L, pay 2000, then delete the procurement: the balance
// must land at -2000 with total_procurement back to zero.
#[tokio::test]
async fn procurement_payment_delete_scenario() {
    let app = common::spawn_app().await;
    let vendor = app.seed_vendor("Gokul Co-op", dec!(45.00)).await;
    assert_eq!(vendor.current_balance, Decimal::ZERO);

    let entry = app
        .services
        .procurement
        .record_procurement(procurement(vendor.id, dec!(50), Some(dec!(45.00))))
        .await
        .expect("record procurement");
    assert_eq!(entry.total_amount, dec!(2250.00));

    let after_procurement = app.vendor(vendor.id).await;
    assert_eq!(after_procurement.current_balance, dec!(2250.00));
    assert_eq!(after_procurement.total_procurement, dec!(2250.00));
    assert_eq!(after_procurement.total_paid, Decimal::ZERO);

    app.services
        .payments
        .record_payment(payment(vendor.id, dec!(2000.00)))
        .await
        .expect("record payment");

    let after_payment = app.vendor(vendor.id).await;
    assert_eq!(after_payment.current_balance, dec!(250.00));
    assert_eq!(after_payment.total_paid, dec!(2000.00));

    app.services
        .procurement
        .delete_procurement(entry.id)
        .await
        .expect("delete procurement");

    let after_delete = app.vendor(vendor.id).await;
    assert_eq!(after_delete.current_balance, dec!(-2000.00));
    assert_eq!(after_delete.total_procurement, Decimal::ZERO);
    assert_eq!(after_delete.total_paid, dec!(2000.00));
}

#[tokio::test]
async fn delete_restores_the_exact_pre_creation_balance() {
    let app = common::spawn_app().await;
    let vendor = app.seed_vendor("Shetkari Dairy", dec!(42.50)).await;

    // Establish a non-trivial starting balance first
    app.services
        .procurement
        .record_procurement(procurement(vendor.id, dec!(12.25), Some(dec!(42))))
        .await
        .expect("first procurement");
    let before = app.vendor(vendor.id).await;

    let entry = app
        .services
        .procurement
        .record_procurement(procurement(vendor.id, dec!(33.75), Some(dec!(44))))
        .await
        .expect("second procurement");
    let after_create = app.vendor(vendor.id).await;
    assert_eq!(
        after_create.current_balance,
        before.current_balance + entry.total_amount
    );

    app.services
        .procurement
        .delete_procurement(entry.id)
        .await
        .expect("delete");

    let after_delete = app.vendor(vendor.id).await;
    assert_eq!(after_delete.current_balance, before.current_balance);
    assert_eq!(after_delete.total_procurement, before.total_procurement);
}

#[tokio::test]
async fn summary_reads_are_idempotent_between_writes() {
    let app = common::spawn_app().await;
    let vendor = app.seed_vendor("Nandini Milk", dec!(40.00)).await;

    app.services
        .procurement
        .record_procurement(procurement(vendor.id, dec!(20), None))
        .await
        .expect("procurement");

    let first = app
        .services
        .vendors
        .get_vendor_summary(&vendor.id)
        .await
        .expect("summary");
    let second = app
        .services
        .vendors
        .get_vendor_summary(&vendor.id)
        .await
        .expect("summary again");

    assert_eq!(first, second);
}

// Invariant: after an arbitrary mix of creates, deletes and payments,
// the materialized balance equals the sum of surviving entries minus the
// sum of payments.
#[tokio::test]
async fn balance_matches_entry_history_after_mixed_operations() {
    let app = common::spawn_app().await;
    let vendor = app.seed_vendor("Warana Sangh", dec!(45.00)).await;

    let mut surviving_totals = Vec::new();
    let mut deleted = Vec::new();

    for (i, quantity) in [dec!(10), dec!(25.5), dec!(7.75), dec!(60), dec!(18.25)]
        .into_iter()
        .enumerate()
    {
        let entry = app
            .services
            .procurement
            .record_procurement(procurement(vendor.id, quantity, Some(dec!(43))))
            .await
            .expect("procurement");
        if i % 2 == 0 {
            surviving_totals.push(entry.total_amount);
        } else {
            deleted.push(entry.id);
        }
    }
    for id in deleted {
        app.services
            .procurement
            .delete_procurement(id)
            .await
            .expect("delete");
    }

    let mut paid_total = Decimal::ZERO;
    for amount in [dec!(500), dec!(123.25), dec!(9.75)] {
        app.services
            .payments
            .record_payment(payment(vendor.id, amount))
            .await
            .expect("payment");
        paid_total += amount;
    }

    let expected_procurement: Decimal = surviving_totals.iter().copied().sum();
    let summary = app
        .services
        .vendors
        .get_vendor_summary(&vendor.id)
        .await
        .expect("summary");

    assert_eq!(summary.total_procurement, expected_procurement);
    assert_eq!(summary.total_paid, paid_total);
    assert_eq!(
        summary.current_balance,
        expected_procurement - paid_total
    );
}

// The update path must reconcile the vendor projections with the
// recomputed total, not leave the old delta behind.
#[tokio::test]
async fn updating_quantity_reconciles_the_vendor_balance() {
    let app = common::spawn_app().await;
    let vendor = app.seed_vendor("Amrut Dairy", dec!(50.00)).await;

    let entry = app
        .services
        .procurement
        .record_procurement(procurement(vendor.id, dec!(10), Some(dec!(50.00))))
        .await
        .expect("procurement");
    assert_eq!(entry.total_amount, dec!(500.00));

    let updated = app
        .services
        .procurement
        .update_procurement(UpdateProcurementCommand {
            id: entry.id,
            procurement_date: None,
            session: None,
            quantity: Some(dec!(12)),
            fat_pct: None,
            snf_pct: None,
            rate_per_litre: None,
            payment_status: None,
        })
        .await
        .expect("update");
    assert_eq!(updated.total_amount, dec!(600.00));

    let after = app.vendor(vendor.id).await;
    assert_eq!(after.current_balance, dec!(600.00));
    assert_eq!(after.total_procurement, dec!(600.00));
}

#[tokio::test]
async fn procurement_against_unknown_or_inactive_vendor_is_rejected() {
    let app = common::spawn_app().await;

    let missing = app
        .services
        .procurement
        .record_procurement(procurement(Uuid::new_v4(), dec!(10), Some(dec!(45))))
        .await;
    assert_matches!(missing, Err(ServiceError::NotFound(_)));

    let vendor = app.seed_vendor("Closed Dairy", dec!(45.00)).await;
    app.services
        .vendors
        .update_vendor(UpdateVendorCommand {
            id: vendor.id,
            name: None,
            contact_name: None,
            phone: None,
            bank_account: None,
            bank_ifsc: None,
            default_rate: None,
            is_active: Some(false),
        })
        .await
        .expect("deactivate");

    let inactive = app
        .services
        .procurement
        .record_procurement(procurement(vendor.id, dec!(10), Some(dec!(45))))
        .await;
    assert_matches!(inactive, Err(ServiceError::ValidationError(_)));

    // Payments remain possible so outstanding dues can still be settled
    app.services
        .payments
        .record_payment(payment(vendor.id, dec!(10)))
        .await
        .expect("payment to inactive vendor");
}

#[tokio::test]
async fn deleting_a_missing_procurement_is_not_found() {
    let app = common::spawn_app().await;
    let result = app.services.procurement.delete_procurement(Uuid::new_v4()).await;
    assert_matches!(result, Err(ServiceError::NotFound(_)));
}

#[tokio::test]
async fn payment_to_unknown_vendor_is_not_found() {
    let app = common::spawn_app().await;
    let result = app
        .services
        .payments
        .record_payment(payment(Uuid::new_v4(), dec!(100)))
        .await;
    assert_matches!(result, Err(ServiceError::NotFound(_)));
}

#[tokio::test]
async fn default_rate_is_used_when_no_rate_is_given() {
    let app = common::spawn_app().await;
    let vendor = app.seed_vendor("Default Rate Dairy", dec!(38.50)).await;

    let entry = app
        .services
        .procurement
        .record_procurement(procurement(vendor.id, dec!(2), None))
        .await
        .expect("procurement");

    assert_eq!(entry.rate_per_litre, dec!(38.50));
    assert_eq!(entry.total_amount, dec!(77.00));
}

#[tokio::test]
async fn outstanding_listing_filters_on_threshold() {
    let app = common::spawn_app().await;
    let owed = app.seed_vendor("Owed Dairy", dec!(45.00)).await;
    let settled = app.seed_vendor("Settled Dairy", dec!(45.00)).await;

    app.services
        .procurement
        .record_procurement(procurement(owed.id, dec!(10), Some(dec!(45))))
        .await
        .expect("procurement");

    app.services
        .procurement
        .record_procurement(procurement(settled.id, dec!(10), Some(dec!(45))))
        .await
        .expect("procurement");
    app.services
        .payments
        .record_payment(payment(settled.id, dec!(450)))
        .await
        .expect("payment");

    let outstanding = app
        .services
        .vendors
        .list_outstanding(Decimal::ZERO)
        .await
        .expect("outstanding");

    let ids: Vec<Uuid> = outstanding.iter().map(|v| v.id).collect();
    assert!(ids.contains(&owed.id));
    assert!(!ids.contains(&settled.id));
}

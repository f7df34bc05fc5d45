pub mod record_bulk_payments_command;
pub mod record_payment_command;

pub use record_bulk_payments_command::{
    BulkPaymentItemOutcome, BulkPaymentOutcome, BulkPaymentRequest, RecordBulkPaymentsCommand,
};
pub use record_payment_command::RecordPaymentCommand;

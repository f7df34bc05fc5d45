pub mod milk_procurement;
pub mod milk_vendor;
pub mod vendor_payment;

pub use milk_procurement::{MilkSession, ProcurementPaymentStatus};
pub use vendor_payment::PaymentMode;

pub mod delete_procurement_command;
pub mod record_procurement_command;
pub mod update_procurement_command;

pub use delete_procurement_command::DeleteProcurementCommand;
pub use record_procurement_command::RecordProcurementCommand;
pub use update_procurement_command::UpdateProcurementCommand;

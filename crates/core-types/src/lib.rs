pub mod enums;
pub mod error;
pub mod prefix;

// Re-export the core types to provide a clean public API.
pub use enums::{
    AsRole, OverallReportType, ReportItemFamily, ReportItemType, is_valid_overall_report_type,
    is_valid_report_item_type,
};
pub use error::CoreError;
pub use prefix::NetworkPrefix;

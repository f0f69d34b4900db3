pub mod consent;
pub mod dynamic;
pub mod fixtures;
pub mod inspection;

pub use consent::{ConsentApplication, ConsentStatus, WorkType, CONSENT_FIELDS, STATUTORY_WORKING_DAYS};
pub use dynamic::{infer_columns, load_records, parse_records, DynamicRecord};
pub use inspection::{Inspection, InspectionOutcome, InspectionType, INSPECTION_FIELDS};

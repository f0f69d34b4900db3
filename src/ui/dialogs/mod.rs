pub mod record_details;

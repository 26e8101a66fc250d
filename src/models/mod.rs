pub mod analytics;
pub mod captured_record;

pub mod application_request;
pub mod capture;

pub mod capture;
pub mod user_data;

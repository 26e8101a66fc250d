pub mod capture_handlers;
pub mod dashboard_handlers;
pub mod health_handlers;
pub mod site_handlers;
pub mod submit_handlers;

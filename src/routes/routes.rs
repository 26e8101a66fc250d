use actix_web::web;

use crate::handlers::capture_handlers::{capture_data, decode_data};
use crate::handlers::dashboard_handlers::{clear_dashboard, get_dashboard};
use crate::handlers::health_handlers::health_check;
use crate::handlers::site_handlers::home;
use crate::handlers::submit_handlers::{submit_application, submit_status};
use crate::middlewares::no_store::NoStore;

/// Configure the routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home));
    // Session-bound routes: they read or write the capture cookies
    cfg.service(
        web::resource("/capture-data")
            .wrap(NoStore)
            .route(web::get().to(capture_data)),
    );
    cfg.service(
        web::resource("/dashboard")
            .wrap(NoStore)
            .route(web::get().to(get_dashboard))
            .route(web::delete().to(clear_dashboard)),
    );
    cfg.service(
        web::scope("/api")
            .route("/submit", web::post().to(submit_application))
            .route("/submit", web::get().to(submit_status))
            .route("/capture/decode", web::post().to(decode_data))
            .route("/health/check", web::get().to(health_check)),
    );
}

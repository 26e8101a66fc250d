use actix_web::{HttpRequest, HttpResponse, web};

use crate::services::capture::{CaptureController, decode_and_process};
use crate::services::user_data::UserDataContext;
use crate::session::CookieSessionStore;
use crate::state::app_state::AppState;
use crate::structs::capture::{CaptureParams, CaptureResponse, DecodeRequest};
use crate::utils::hash_ip::hash_ip;

/// Capture entry point: decode `?data=`, store the record and send the
/// browser on via a `Refresh` header.
pub async fn capture_data(
    app_state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<CaptureParams>,
) -> HttpResponse {
    let config = &app_state.config;
    let token = query.data.as_deref().filter(|token| !token.trim().is_empty());

    // Decode once up front; the controller only decodes again if this failed.
    let precomputed = token.map(decode_and_process);

    let store = CookieSessionStore::from_request(&req, config.is_production());
    let mut context = UserDataContext::new(store);
    let outcome = CaptureController::new(&config.redirects).run(token, precomputed, &mut context);

    if let Some(record) = &outcome.record {
        let ip_hash = record
            .ip()
            .map(|ip| hash_ip(ip, &config.ip_hash_salt))
            .unwrap_or_default();
        log::info!(
            "Captured record for {} (ip hash {})",
            record.display_name(),
            ip_hash.get(..12).unwrap_or("-")
        );
    }

    let mut builder = HttpResponse::Ok();
    builder.insert_header(("Refresh", outcome.redirect.refresh_header()));
    context.into_store().write_to(&mut builder);
    builder.json(CaptureResponse::from(&outcome))
}

/// Expose the up-front decode on its own.
pub async fn decode_data(web::Json(req): web::Json<DecodeRequest>) -> HttpResponse {
    HttpResponse::Ok().json(decode_and_process(&req.data))
}

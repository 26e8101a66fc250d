use actix_web::{HttpResponse, web};
use validator::Validate;

use crate::errors::ApiError;
use crate::state::app_state::AppState;
use crate::structs::application_request::{
    ApplicationForm, SubmissionResponse, log_text, missing_fields,
};
use crate::utils::application_id::generate_application_id;

/// Accept an application. Nothing is stored; the request is logged and acknowledged.
pub async fn submit_application(
    app_state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let form: ApplicationForm = serde_json::from_slice(&body).map_err(|e| {
        log::error!("API Error: {}", e);
        ApiError::Internal {
            detail: app_state.config.expose_detail(&e),
        }
    })?;

    if let Err(errors) = form.validate() {
        return Err(ApiError::Validation(missing_fields(&errors)));
    }

    log::info!(
        "New application received: name={} email={} handle={} followers={} niche={}",
        form.full_name.as_deref().unwrap_or_default(),
        form.email.as_deref().unwrap_or_default(),
        form.instagram_handle.as_deref().unwrap_or_default(),
        log_text(form.followers.as_ref()),
        log_text(form.niche.as_ref()),
    );

    Ok(HttpResponse::Ok().json(SubmissionResponse::accepted(generate_application_id())))
}

pub async fn submit_status() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "API is running",
        "endpoints": {
            "POST": "/api/submit - Submit new application",
            "GET": "/api/submit - API status"
        }
    }))
}

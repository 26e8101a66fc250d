use actix_web::{HttpResponse, web};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct HomeParams {
    pub capture: Option<String>,
}

/// Landing payload. Failed captures land here with `?capture=failed`.
pub async fn home(query: web::Query<HomeParams>) -> HttpResponse {
    let notice = match query.capture.as_deref() {
        Some("failed") => Some("We couldn't process your data. Please try again."),
        _ => None,
    };

    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Grow and monetize your audience",
        "notice": notice,
        "links": {
            "apply": "/api/submit",
            "dashboard": "/dashboard"
        }
    }))
}

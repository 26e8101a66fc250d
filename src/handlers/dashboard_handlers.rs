use actix_web::{HttpRequest, HttpResponse, web};

use crate::services::user_data::UserDataContext;
use crate::session::CookieSessionStore;
use crate::state::app_state::AppState;
use crate::structs::capture::DashboardResponse;

/// Show the captured record. Every load counts as a login for the analytics record.
pub async fn get_dashboard(app_state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    let store = CookieSessionStore::from_request(&req, app_state.config.is_production());
    let mut context = UserDataContext::new(store);

    let response = match context.refresh() {
        Ok(Some(snapshot)) => DashboardResponse {
            user_data: Some(snapshot.user_data),
            analytics: Some(snapshot.analytics),
            error: None,
        },
        Ok(None) => DashboardResponse::default(),
        Err(e) => {
            log::error!("Error loading user data: {}", e);
            DashboardResponse {
                error: Some("Failed to load user data"),
                ..Default::default()
            }
        }
    };

    let mut builder = HttpResponse::Ok();
    context.into_store().write_to(&mut builder);
    builder.json(response)
}

pub async fn clear_dashboard(app_state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    let store = CookieSessionStore::from_request(&req, app_state.config.is_production());
    let mut context = UserDataContext::new(store);
    context.clear_user_data();

    let mut builder = HttpResponse::Ok();
    context.into_store().write_to(&mut builder);
    builder.json(serde_json::json!({ "success": true }))
}

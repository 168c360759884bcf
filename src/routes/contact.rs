use actix_web::{web, HttpResponse};

use crate::{
    error::AppResult,
    services::email::{EmailMessage, EmailService},
    AppState,
};

pub fn create_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::post().to(send_contact_message));
}

/// POST / - Contact form. Field validation happens inside the service before
/// any call to the email provider.
async fn send_contact_message(
    state: web::Data<AppState>,
    form: web::Json<EmailMessage>,
) -> AppResult<HttpResponse> {
    let service = EmailService::new(&state.config);
    service.send(&form).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": true })))
}

use actix_web::{web, HttpResponse};

use crate::{
    error::AppResult,
    models::ebook::{CheckoutForm, CheckoutResponse},
    services::payment::PaymentService,
    AppState,
};

pub fn create_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/session", web::post().to(create_session))
        .route("/verify/{session_id}", web::get().to(verify_session));
}

/// POST /session - Create a hosted checkout session for a published item
async fn create_session(
    state: web::Data<AppState>,
    form: web::Json<CheckoutForm>,
) -> AppResult<HttpResponse> {
    let service = PaymentService::new(&state.db, &state.config);
    let url = service.create_checkout_session(&form.item_id).await?;

    Ok(HttpResponse::Ok().json(CheckoutResponse { url }))
}

/// GET /verify/{session_id} - Payment status; file metadata only when paid
async fn verify_session(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let service = PaymentService::new(&state.db, &state.config);
    let result = service.verify_session(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(result))
}

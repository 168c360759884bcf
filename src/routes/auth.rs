use actix_web::{web, HttpResponse};

use crate::{
    error::{AppError, AppResult},
    middleware::{AuthMiddleware, AuthUser},
    models::user::{SessionUserResponse, SigninForm, SigninResponse},
    services::user::UserService,
    utils::auth::create_jwt,
    AppState,
};

pub fn create_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/signin", web::post().to(signin)).service(
        web::resource("/me")
            .wrap(AuthMiddleware)
            .route(web::get().to(get_session_user)),
    );
}

/// GET /me - The user behind the current session token. The admin frontend
/// calls this on load to decide whether a stored token is still usable.
async fn get_session_user(auth_user: AuthUser) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(SessionUserResponse::from(auth_user.user)))
}

/// POST /signin - Email + password, returns a session JWT for the admin
/// surface. There is no signup flow; users are seeded out of band.
async fn signin(state: web::Data<AppState>, form: web::Json<SigninForm>) -> AppResult<HttpResponse> {
    let user_service = UserService::new(&state.db);
    let user = user_service
        .get_user_by_email(&form.email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let valid = bcrypt::verify(&form.password, &user.password_hash)
        .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;
    if !valid {
        return Err(AppError::InvalidCredentials);
    }

    let token = create_jwt(
        &user.id,
        &state.config.jwt_secret,
        &state.config.jwt_expires_in,
    )?;

    Ok(HttpResponse::Ok().json(SigninResponse {
        token,
        id: user.id,
        email: user.email,
        name: user.name,
        role: user.role,
    }))
}

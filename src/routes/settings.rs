use actix_web::{web, HttpResponse};

use crate::{
    error::{AppError, AppResult},
    middleware::AdminMiddleware,
    models::setting::{SettingBatchUpdateForm, SettingUpdateForm},
    models::site::SiteConfig,
    services::setting::SettingService,
    AppState,
};

pub fn create_routes(cfg: &mut web::ServiceConfig) {
    // Public reads
    cfg.route("", web::get().to(list_settings))
        .route("/map", web::get().to(get_settings_map))
        .route("/site", web::get().to(get_site_config))
        .route("/category/{category}", web::get().to(list_by_category))
        // Admin writes; the batch route is registered before `/{key}` so it
        // is not swallowed by the path parameter
        .service(
            web::resource("/update")
                .wrap(AdminMiddleware)
                .route(web::post().to(update_settings_batch)),
        )
        .service(
            web::resource("/{key}/update")
                .wrap(AdminMiddleware)
                .route(web::post().to(update_setting)),
        )
        .route("/{key}", web::get().to(get_setting));
}

/// GET / - All settings ordered by category
async fn list_settings(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let service = SettingService::new(&state.db, &state.cache);
    let settings = service.list().await?;

    Ok(HttpResponse::Ok().json(settings))
}

/// GET /map - Derived key -> value projection
async fn get_settings_map(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let service = SettingService::new(&state.db, &state.cache);
    let map = service.get_all_as_map().await?;

    Ok(HttpResponse::Ok().json(map))
}

/// GET /site - Typed consumer config (ticker, floating CTA), parsed once
/// from the raw map
async fn get_site_config(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let service = SettingService::new(&state.db, &state.cache);
    let map = service.get_all_as_map().await?;

    Ok(HttpResponse::Ok().json(SiteConfig::from_map(&map)))
}

/// GET /category/{category} - Settings in one category
async fn list_by_category(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let service = SettingService::new(&state.db, &state.cache);
    let settings = service.list_by_category(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(settings))
}

/// GET /{key} - Single setting
async fn get_setting(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let key = path.into_inner();
    let service = SettingService::new(&state.db, &state.cache);
    let setting = service
        .get(&key)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Setting '{}' not found", key)))?;

    Ok(HttpResponse::Ok().json(setting))
}

/// POST /{key}/update - Overwrite one value (admin)
async fn update_setting(
    state: web::Data<AppState>,
    path: web::Path<String>,
    form: web::Json<SettingUpdateForm>,
) -> AppResult<HttpResponse> {
    let service = SettingService::new(&state.db, &state.cache);
    let setting = service
        .update_one(&path.into_inner(), form.value.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(setting))
}

/// POST /update - Batch update (admin). Not transactional: a failed entry
/// fails the response but already-applied writes stay applied.
async fn update_settings_batch(
    state: web::Data<AppState>,
    form: web::Json<SettingBatchUpdateForm>,
) -> AppResult<HttpResponse> {
    if form.updates.is_empty() {
        return Err(AppError::BadRequest("No updates provided".to_string()));
    }

    let service = SettingService::new(&state.db, &state.cache);
    service.update_many(&form.updates).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": true })))
}

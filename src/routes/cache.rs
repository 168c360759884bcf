use actix_web::{web, HttpResponse};

use crate::{
    error::{AppError, AppResult},
    middleware::AdminMiddleware,
    services::{page::PAGES_SCOPE, setting::SETTINGS_SCOPE},
    AppState,
};

pub fn create_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("")
            .wrap(AdminMiddleware)
            .route("/stats", web::get().to(get_cache_stats))
            .route("/invalidate/{scope}", web::post().to(invalidate_scope)),
    );
}

/// GET /stats - Cache hit/miss counters (admin)
async fn get_cache_stats(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let stats = state.cache.stats().await;
    let tracked_keys = state.cache.scope_index_len().await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "hits": stats.hits,
        "misses": stats.misses,
        "sets": stats.sets,
        "invalidations": stats.invalidations,
        "tracked_keys": tracked_keys,
    })))
}

/// POST /invalidate/{scope} - Drop every cached projection in a scope (admin)
async fn invalidate_scope(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let scope = path.into_inner();

    if scope != SETTINGS_SCOPE && scope != PAGES_SCOPE {
        return Err(AppError::BadRequest(format!(
            "Unknown cache scope: {}. Valid options: {}, {}",
            scope, SETTINGS_SCOPE, PAGES_SCOPE
        )));
    }

    state.cache.invalidate(&scope).await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "invalidated": scope
    })))
}

use actix_web::{web, HttpResponse};

use crate::{
    error::AppResult,
    middleware::AdminMiddleware,
    models::page::{PageContentResponse, PageContentUpdateForm},
    services::page::PageService,
    AppState,
};

pub fn create_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(list_pages))
        .route("/{slug}", web::get().to(get_page))
        .service(
            web::resource("/{slug}/update")
                .wrap(AdminMiddleware)
                .route(web::post().to(update_page)),
        );
}

/// GET / - All pages ordered by title
async fn list_pages(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let service = PageService::new(&state.db, &state.cache);
    let pages = service.list_all().await?;

    Ok(HttpResponse::Ok().json(pages))
}

/// GET /{slug} - Page content, or an explicit null when the page has no
/// content yet (not a 404; only a fetch failure is an error here)
async fn get_page(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let service = PageService::new(&state.db, &state.cache);
    let content = service.get(&slug).await?;

    Ok(HttpResponse::Ok().json(PageContentResponse {
        page_slug: slug,
        content,
    }))
}

/// POST /{slug}/update - Replace the whole content document (admin)
async fn update_page(
    state: web::Data<AppState>,
    path: web::Path<String>,
    form: web::Json<PageContentUpdateForm>,
) -> AppResult<HttpResponse> {
    let service = PageService::new(&state.db, &state.cache);
    let page = service.update(&path.into_inner(), &form.content).await?;

    Ok(HttpResponse::Ok().json(page))
}

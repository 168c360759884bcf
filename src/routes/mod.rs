pub mod auth;
pub mod cache;
pub mod checkout;
pub mod contact;
pub mod pages;
pub mod settings;
pub mod uploads;

use actix_web::web;

pub fn create_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/auths").configure(auth::create_routes))
        .service(web::scope("/cache").configure(cache::create_routes))
        .service(web::scope("/settings").configure(settings::create_routes))
        .service(web::scope("/pages").configure(pages::create_routes))
        .service(web::scope("/uploads").configure(uploads::create_routes))
        .service(web::scope("/checkout").configure(checkout::create_routes))
        .service(web::scope("/contact").configure(contact::create_routes));
}

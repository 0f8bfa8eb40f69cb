use actix_web::web;

use crate::handlers::{create_handler, get_all_handler, get_by_token_handler, redirect_handler};

// Authenticated JSON API
pub fn configure_api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/urls")
            .route("", web::post().to(create_handler))
            .route("", web::get().to(get_all_handler))
            .route("/{token}", web::get().to(get_by_token_handler)),
    );
}

// Public redirect; registered last so it never shadows a fixed path
pub fn configure_redirect_route(cfg: &mut web::ServiceConfig) {
    cfg.route("/{token}", web::get().to(redirect_handler));
}

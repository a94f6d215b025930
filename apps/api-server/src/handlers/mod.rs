//! HTTP handlers and route configuration.

mod form;
mod health;
mod posts;

use actix_web::{Scope, web};

/// Configure all application routes.
///
/// Post routes are served both at the root and under `/api`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(posts_scope())
        .service(web::scope("/api").service(posts_scope()));
}

fn posts_scope() -> Scope {
    web::scope("/posts")
        .route("", web::get().to(posts::index))
        .route("", web::post().to(posts::store))
        .route("/{id}", web::get().to(posts::show))
        .route("/{id}", web::patch().to(posts::update))
        // Requires a bearer token (see `Identity`)
        .route("/{id}", web::delete().to(posts::destroy))
}

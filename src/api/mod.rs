use actix_web::web;

pub mod admin;
pub mod context;
pub mod helpers;
pub mod middleware;
pub mod mobile;
pub mod owner;
pub mod seed;
pub mod validation;

/// Registers every `/api` route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(admin::init_routes)
            .configure(owner::init_routes)
            .configure(mobile::init_routes)
            .configure(seed::init_routes),
    );
}

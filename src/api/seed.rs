use actix_web::{HttpResponse, get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    app_state::AppState,
    errors::{AppError, ErrorResponse},
    services::seed::{SeedOutcome, ensure_admin},
};

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeedResponse {
    pub message: String,
    pub created: bool,
    pub admin_id: i32,
}

/// Bootstrap endpoint: creates the configured admin account when it is missing.
#[utoipa::path(
    get,
    path = "/api/seed",
    tag = "Seed",
    responses(
        (status = 200, description = "Admin account exists (created now or earlier)", body = SeedResponse),
        (status = 400, description = "Seed e-mail belongs to a non-admin account", body = ErrorResponse),
    )
)]
#[get("/seed")]
pub async fn seed_admin(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let seed = app_state.config.seed_admin();
    let outcome = ensure_admin(&app_state.db, &app_state.auth, &seed).await?;

    let body = match outcome {
        SeedOutcome::Created(admin_id) => SeedResponse {
            message: format!("Admin {} created", seed.email),
            created: true,
            admin_id,
        },
        SeedOutcome::AlreadyExists(admin_id) => SeedResponse {
            message: format!("Admin {} already exists", seed.email),
            created: false,
            admin_id,
        },
    };

    Ok(HttpResponse::Ok().json(body))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(seed_admin);
}

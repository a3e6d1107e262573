use actix_web::{HttpResponse, get, patch, post, web};

use crate::{
    api::{context::AdminPrincipal, helpers::UserView, validation},
    app_state::AppState,
    database::{models::broadcasts, types::LogLevel},
    errors::{AppError, ErrorResponse},
};

use super::{
    functions::{
        create_broadcast, list_broadcasts, list_owners, load_recent_logs, load_system_stats,
        update_owner_subscription,
    },
    structures::{
        CreateBroadcastRequest, LogsQuery, OwnerOverview, SystemLogView, SystemStats,
        UpdateSubscriptionRequest,
    },
};

#[utoipa::path(
    get,
    path = "/api/admin/system/stats",
    tag = "Admin",
    responses(
        (status = 200, description = "Platform-wide counters", body = SystemStats),
        (status = 401, description = "Missing session or not an admin", body = ErrorResponse),
    )
)]
#[get("/system/stats")]
pub async fn get_system_stats(
    _admin: AdminPrincipal,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let stats = load_system_stats(&app_state.db).await?;
    Ok(HttpResponse::Ok().json(stats))
}

#[utoipa::path(
    get,
    path = "/api/admin/system/logs",
    tag = "Admin",
    params(LogsQuery),
    responses(
        (status = 200, description = "Most recent system log rows, newest first", body = [SystemLogView]),
        (status = 400, description = "Unknown log level", body = ErrorResponse),
        (status = 401, description = "Missing session or not an admin", body = ErrorResponse),
    )
)]
#[get("/system/logs")]
pub async fn get_system_logs(
    _admin: AdminPrincipal,
    app_state: web::Data<AppState>,
    query: web::Query<LogsQuery>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let level = params
        .level
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
        .map(str::parse::<LogLevel>)
        .transpose()
        .map_err(AppError::InvalidInput)?;

    let logs = load_recent_logs(&app_state.db, params.effective_limit(), level).await?;
    Ok(HttpResponse::Ok().json(logs))
}

#[utoipa::path(
    get,
    path = "/api/admin/system/broadcasts",
    tag = "Admin",
    responses(
        (status = 200, description = "All broadcasts, newest first", body = [broadcasts::Model]),
        (status = 401, description = "Missing session or not an admin", body = ErrorResponse),
    )
)]
#[get("/system/broadcasts")]
pub async fn get_broadcasts(
    _admin: AdminPrincipal,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let broadcasts = list_broadcasts(&app_state.db, false).await?;
    Ok(HttpResponse::Ok().json(broadcasts))
}

#[utoipa::path(
    post,
    path = "/api/admin/system/broadcasts",
    tag = "Admin",
    request_body = CreateBroadcastRequest,
    responses(
        (status = 201, description = "Broadcast created and audited", body = broadcasts::Model),
        (status = 400, description = "Title or message missing", body = ErrorResponse),
        (status = 401, description = "Missing session or not an admin", body = ErrorResponse),
    )
)]
#[post("/system/broadcasts")]
pub async fn post_broadcast(
    admin: AdminPrincipal,
    app_state: web::Data<AppState>,
    body: web::Json<CreateBroadcastRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = body.into_inner();
    let title = validation::require_text("title", payload.title.as_deref(), validation::MAX_TITLE_LEN)?;
    let message = validation::require_text(
        "message",
        payload.message.as_deref(),
        validation::MAX_MESSAGE_LEN,
    )?;

    let broadcast =
        create_broadcast(&app_state.db, admin.user_id, &admin.name, title, message).await?;
    log::info!("Admin {} created broadcast {}", admin.user_id, broadcast.id);

    Ok(HttpResponse::Created().json(broadcast))
}

#[utoipa::path(
    get,
    path = "/api/admin/owners",
    tag = "Admin",
    responses(
        (status = 200, description = "Owners with their employee counts", body = [OwnerOverview]),
        (status = 401, description = "Missing session or not an admin", body = ErrorResponse),
    )
)]
#[get("/owners")]
pub async fn get_owners(
    _admin: AdminPrincipal,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let owners = list_owners(&app_state.db).await?;
    Ok(HttpResponse::Ok().json(owners))
}

#[utoipa::path(
    patch,
    path = "/api/admin/owners/{id}/subscription",
    tag = "Admin",
    params(
        ("id" = i32, Path, description = "Owner user id")
    ),
    request_body = UpdateSubscriptionRequest,
    responses(
        (status = 200, description = "Subscription updated", body = UserView),
        (status = 401, description = "Missing session or not an admin", body = ErrorResponse),
        (status = 404, description = "Owner not found", body = ErrorResponse),
    )
)]
#[patch("/owners/{id}/subscription")]
pub async fn patch_owner_subscription(
    admin: AdminPrincipal,
    app_state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<UpdateSubscriptionRequest>,
) -> Result<HttpResponse, AppError> {
    let owner_id = path.into_inner();
    let updated =
        update_owner_subscription(&app_state.db, admin.user_id, owner_id, body.status).await?;
    Ok(HttpResponse::Ok().json(UserView::from(updated)))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .service(get_system_stats)
            .service(get_system_logs)
            .service(get_broadcasts)
            .service(post_broadcast)
            .service(get_owners)
            .service(patch_owner_subscription),
    );
}

use actix_web::{HttpResponse, get, post, web};

use crate::{
    api::{
        context::OwnerPrincipal,
        helpers::{UserView, today_start},
        validation,
    },
    app_state::AppState,
    database::models::shops,
    errors::{AppError, ErrorResponse},
    services::dashboard::{LiveDashboard, load_live_dashboard},
};

use super::{
    functions::{create_employee, create_shop, list_employees, list_shops},
    structures::{CreateEmployeeRequest, CreateShopRequest},
};

#[utoipa::path(
    get,
    path = "/api/owner/dashboard/live",
    tag = "Owner",
    responses(
        (status = 200, description = "Employees, today's trails, today's collections and shops", body = LiveDashboard),
        (status = 401, description = "Missing session or not an owner", body = ErrorResponse),
    )
)]
#[get("/dashboard/live")]
pub async fn get_live_dashboard(
    owner: OwnerPrincipal,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let since = today_start(&app_state)?;
    let dashboard = load_live_dashboard(&app_state.db, owner.user_id, since).await?;
    log::debug!(
        "Live dashboard for owner {}: {} employees, {} paths, {} collections",
        owner.user_id,
        dashboard.employees.len(),
        dashboard.history_paths.len(),
        dashboard.collection_points.len()
    );
    Ok(HttpResponse::Ok().json(dashboard))
}

#[utoipa::path(
    get,
    path = "/api/owner/employees",
    tag = "Owner",
    responses(
        (status = 200, description = "Employees of the signed-in owner", body = [UserView]),
        (status = 401, description = "Missing session or not an owner", body = ErrorResponse),
    )
)]
#[get("/employees")]
pub async fn get_employees(
    owner: OwnerPrincipal,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let employees: Vec<UserView> = list_employees(&app_state.db, owner.user_id)
        .await?
        .into_iter()
        .map(UserView::from)
        .collect();
    Ok(HttpResponse::Ok().json(employees))
}

#[utoipa::path(
    post,
    path = "/api/owner/employees",
    tag = "Owner",
    request_body = CreateEmployeeRequest,
    responses(
        (status = 201, description = "Employee created", body = UserView),
        (status = 400, description = "Invalid input or e-mail already taken", body = ErrorResponse),
        (status = 401, description = "Missing session or not an owner", body = ErrorResponse),
    )
)]
#[post("/employees")]
pub async fn post_employee(
    owner: OwnerPrincipal,
    app_state: web::Data<AppState>,
    body: web::Json<CreateEmployeeRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = body.into_inner();
    let name = validation::require_text("name", payload.name.as_deref(), validation::MAX_NAME_LEN)?;
    let email = validation::require_email(payload.email.as_deref())?;
    let password = validation::require_password(payload.password.as_deref())?;

    let employee = create_employee(&app_state, owner.user_id, name, email, &password).await?;
    Ok(HttpResponse::Created().json(UserView::from(employee)))
}

#[utoipa::path(
    get,
    path = "/api/owner/shops",
    tag = "Owner",
    responses(
        (status = 200, description = "Shops of the signed-in owner", body = [shops::Model]),
        (status = 401, description = "Missing session or not an owner", body = ErrorResponse),
    )
)]
#[get("/shops")]
pub async fn get_shops(
    owner: OwnerPrincipal,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let shops = list_shops(&app_state.db, owner.user_id).await?;
    Ok(HttpResponse::Ok().json(shops))
}

#[utoipa::path(
    post,
    path = "/api/owner/shops",
    tag = "Owner",
    request_body = CreateShopRequest,
    responses(
        (status = 201, description = "Shop created", body = shops::Model),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing session or not an owner", body = ErrorResponse),
    )
)]
#[post("/shops")]
pub async fn post_shop(
    owner: OwnerPrincipal,
    app_state: web::Data<AppState>,
    body: web::Json<CreateShopRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = body.into_inner();
    let name = validation::require_text("name", payload.name.as_deref(), validation::MAX_NAME_LEN)?;
    validation::validate_coordinates(payload.latitude, payload.longitude)?;
    let address = payload
        .address
        .map(|address| address.trim().to_string())
        .filter(|address| !address.is_empty());

    let shop = create_shop(
        &app_state.db,
        owner.user_id,
        name,
        address,
        payload.latitude,
        payload.longitude,
    )
    .await?;
    Ok(HttpResponse::Created().json(shop))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/owner")
            .service(get_live_dashboard)
            .service(get_employees)
            .service(post_employee)
            .service(get_shops)
            .service(post_shop),
    );
}

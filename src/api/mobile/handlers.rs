use actix_web::{HttpResponse, get, post, web};

use crate::{
    api::{
        admin::functions::list_broadcasts,
        context::EmployeePrincipal,
        helpers::{UserView, load_current_user},
        validation,
    },
    app_state::AppState,
    database::models::broadcasts,
    errors::{AppError, ErrorResponse},
};

use super::{
    functions::{authenticate, record_collection, record_location, set_duty},
    structures::{
        AuthRequest, AuthResponse, CollectionReceipt, CollectionRequest, DutyRequest,
        DutyResponse, LocationAck, LocationPing,
    },
};

#[utoipa::path(
    post,
    path = "/api/mobile/auth",
    tag = "Mobile",
    request_body = AuthRequest,
    responses(
        (status = 200, description = "Signed session token and the user", body = AuthResponse),
        (status = 400, description = "Email or password missing", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
    )
)]
#[post("/auth")]
pub async fn mobile_auth(
    app_state: web::Data<AppState>,
    body: web::Json<AuthRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = body.into_inner();
    let email = payload
        .email
        .as_deref()
        .map(validation::normalize_email)
        .filter(|email| !email.is_empty());
    let password = payload.password.filter(|password| !password.is_empty());

    let (Some(email), Some(password)) = (email, password) else {
        return Err(AppError::InvalidInput(
            "Email and password are required".to_string(),
        ));
    };

    let (user, token) = authenticate(&app_state, &email, &password).await?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        user: UserView::from(user),
    }))
}

#[utoipa::path(
    get,
    path = "/api/mobile/me",
    tag = "Mobile",
    responses(
        (status = 200, description = "The signed-in employee", body = UserView),
        (status = 401, description = "Missing session or not an employee", body = ErrorResponse),
    )
)]
#[get("/me")]
pub async fn get_me(
    employee: EmployeePrincipal,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = load_current_user(employee.user_id, &app_state.db).await?;
    Ok(HttpResponse::Ok().json(UserView::from(user)))
}

#[utoipa::path(
    post,
    path = "/api/mobile/duty",
    tag = "Mobile",
    request_body = DutyRequest,
    responses(
        (status = 200, description = "Duty status updated", body = DutyResponse),
        (status = 401, description = "Missing session or not an employee", body = ErrorResponse),
    )
)]
#[post("/duty")]
pub async fn post_duty(
    employee: EmployeePrincipal,
    app_state: web::Data<AppState>,
    body: web::Json<DutyRequest>,
) -> Result<HttpResponse, AppError> {
    let user = load_current_user(employee.user_id, &app_state.db).await?;
    let updated = set_duty(&app_state.db, user, body.is_on_duty).await?;
    log::info!(
        "Employee {} is now {}",
        updated.id,
        if updated.is_on_duty { "on duty" } else { "off duty" }
    );

    Ok(HttpResponse::Ok().json(DutyResponse {
        is_on_duty: updated.is_on_duty,
    }))
}

#[utoipa::path(
    post,
    path = "/api/mobile/location",
    tag = "Mobile",
    request_body = LocationPing,
    responses(
        (status = 201, description = "Position stored", body = LocationAck),
        (status = 400, description = "Coordinates out of range", body = ErrorResponse),
        (status = 401, description = "Missing session or not an employee", body = ErrorResponse),
    )
)]
#[post("/location")]
pub async fn post_location(
    employee: EmployeePrincipal,
    app_state: web::Data<AppState>,
    body: web::Json<LocationPing>,
) -> Result<HttpResponse, AppError> {
    let ping = body.into_inner();
    validation::validate_coordinates(ping.latitude, ping.longitude)?;

    let user = load_current_user(employee.user_id, &app_state.db).await?;
    let row = record_location(&app_state.db, user, ping.latitude, ping.longitude).await?;
    log::debug!("Employee {} pinged {},{}", row.employee_id, row.latitude, row.longitude);

    Ok(HttpResponse::Created().json(LocationAck {
        latitude: row.latitude,
        longitude: row.longitude,
        recorded_at: row.timestamp,
    }))
}

#[utoipa::path(
    post,
    path = "/api/mobile/collections",
    tag = "Mobile",
    request_body = CollectionRequest,
    responses(
        (status = 201, description = "Collection recorded", body = CollectionReceipt),
        (status = 400, description = "Invalid amount", body = ErrorResponse),
        (status = 401, description = "Missing session or not an employee", body = ErrorResponse),
        (status = 404, description = "Shop not found for this employee's owner", body = ErrorResponse),
    )
)]
#[post("/collections")]
pub async fn post_collection(
    employee: EmployeePrincipal,
    app_state: web::Data<AppState>,
    body: web::Json<CollectionRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = body.into_inner();
    let user = load_current_user(employee.user_id, &app_state.db).await?;
    let collection = record_collection(&app_state.db, &user, payload.shop_id, payload.amount).await?;

    Ok(HttpResponse::Created().json(CollectionReceipt {
        id: collection.id,
        shop_id: collection.shop_id,
        amount: collection.amount,
        collected_at: collection.collected_at,
    }))
}

#[utoipa::path(
    get,
    path = "/api/mobile/broadcasts",
    tag = "Mobile",
    responses(
        (status = 200, description = "Active broadcasts, newest first", body = [broadcasts::Model]),
        (status = 401, description = "Missing session or not an employee", body = ErrorResponse),
    )
)]
#[get("/broadcasts")]
pub async fn get_active_broadcasts(
    _employee: EmployeePrincipal,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let broadcasts = list_broadcasts(&app_state.db, true).await?;
    Ok(HttpResponse::Ok().json(broadcasts))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/mobile")
            .service(mobile_auth)
            .service(get_me)
            .service(post_duty)
            .service(post_location)
            .service(post_collection)
            .service(get_active_broadcasts),
    );
}

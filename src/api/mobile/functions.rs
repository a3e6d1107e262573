use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set, TransactionTrait,
};

use crate::{
    app_state::AppState,
    database::models::{collections, location_history, shops, users},
    errors::AppError,
};

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Checks e-mail and password and issues a session token.
///
/// Unknown e-mail and wrong password fail with the same error.
pub async fn authenticate(
    app_state: &AppState,
    email: &str,
    password: &str,
) -> Result<(users::Model, String), AppError> {
    let user = users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(&app_state.db)
        .await?;

    let verified = match &user {
        Some(user) => app_state.auth.verify_password(password, &user.password_hash)?,
        None => app_state.auth.verify_dummy(password),
    };

    let user = match user {
        Some(user) if verified => user,
        _ => {
            log::info!("Failed mobile login attempt");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }
    };

    let token = app_state
        .auth
        .issue_token(user.id, &user.email, user.role, &user.name)?;
    log::info!("User {} signed in from mobile", user.id);

    Ok((user, token))
}

pub async fn set_duty(
    db: &DatabaseConnection,
    employee: users::Model,
    on_duty: bool,
) -> Result<users::Model, AppError> {
    let mut active_model = employee.into_active_model();
    active_model.is_on_duty = Set(on_duty);
    Ok(active_model.update(db).await?)
}

/// Caches the latest position on the user and appends it to the trail, atomically.
pub async fn record_location(
    db: &DatabaseConnection,
    employee: users::Model,
    latitude: f64,
    longitude: f64,
) -> Result<location_history::Model, AppError> {
    let now = Utc::now();
    let employee_id = employee.id;
    let txn = db.begin().await?;

    let mut active_model = employee.into_active_model();
    active_model.last_latitude = Set(Some(latitude));
    active_model.last_longitude = Set(Some(longitude));
    active_model.last_location_update = Set(Some(now));
    active_model.update(&txn).await?;

    let row = location_history::ActiveModel {
        employee_id: Set(employee_id),
        latitude: Set(latitude),
        longitude: Set(longitude),
        timestamp: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    Ok(row)
}

/// Records a collection at one of the shops of the employee's owner.
pub async fn record_collection(
    db: &DatabaseConnection,
    employee: &users::Model,
    shop_id: i32,
    amount: f64,
) -> Result<collections::Model, AppError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(AppError::InvalidInput(
            "amount must be greater than zero".to_string(),
        ));
    }

    let owner_id = employee.owner_id.ok_or_else(|| {
        AppError::InvalidInput("Employee is not assigned to an owner".to_string())
    })?;

    // Shops of other owners are reported exactly like missing ones
    let shop = shops::Entity::find_by_id(shop_id)
        .filter(shops::Column::OwnerId.eq(owner_id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Shop with id {} not found", shop_id)))?;

    let collection = collections::ActiveModel {
        shop_id: Set(shop.id),
        employee_id: Set(employee.id),
        amount: Set(amount),
        collected_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    log::info!(
        "Employee {} collected {:.2} at shop {}",
        employee.id,
        amount,
        shop.id
    );
    Ok(collection)
}

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};

use crate::{
    app_state::AppState,
    database::{
        models::{shops, users},
        types::Role,
    },
    errors::AppError,
};

pub async fn list_employees(
    db: &DatabaseConnection,
    owner_id: i32,
) -> Result<Vec<users::Model>, AppError> {
    Ok(users::Entity::find()
        .filter(users::Column::OwnerId.eq(owner_id))
        .filter(users::Column::Role.eq(Role::Employee))
        .order_by_asc(users::Column::Name)
        .all(db)
        .await?)
}

/// Creates an employee bound to `owner_id`; the caller is always the owner.
pub async fn create_employee(
    app_state: &AppState,
    owner_id: i32,
    name: String,
    email: String,
    password: &str,
) -> Result<users::Model, AppError> {
    let existing = users::Entity::find()
        .filter(users::Column::Email.eq(email.clone()))
        .one(&app_state.db)
        .await?;

    if existing.is_some() {
        return Err(AppError::InvalidInput(format!(
            "User with email {} already exists",
            email
        )));
    }

    let employee = users::ActiveModel {
        name: Set(name),
        email: Set(email.clone()),
        password_hash: Set(app_state.auth.hash_password(password)?),
        role: Set(Role::Employee),
        owner_id: Set(Some(owner_id)),
        is_on_duty: Set(false),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    match employee.insert(&app_state.db).await {
        Ok(created) => {
            log::info!("Owner {} created employee {}", owner_id, created.id);
            Ok(created)
        }
        Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => Err(
            AppError::InvalidInput(format!("User with email {} already exists", email)),
        ),
        Err(err) => Err(err.into()),
    }
}

pub async fn list_shops(
    db: &DatabaseConnection,
    owner_id: i32,
) -> Result<Vec<shops::Model>, AppError> {
    Ok(shops::Entity::find()
        .filter(shops::Column::OwnerId.eq(owner_id))
        .order_by_asc(shops::Column::Name)
        .all(db)
        .await?)
}

pub async fn create_shop(
    db: &DatabaseConnection,
    owner_id: i32,
    name: String,
    address: Option<String>,
    latitude: f64,
    longitude: f64,
) -> Result<shops::Model, AppError> {
    let shop = shops::ActiveModel {
        owner_id: Set(owner_id),
        name: Set(name),
        address: Set(address),
        latitude: Set(latitude),
        longitude: Set(longitude),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    log::info!("Owner {} registered shop {}", owner_id, shop.id);
    Ok(shop)
}

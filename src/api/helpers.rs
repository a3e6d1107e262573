use actix_web::web;
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, EntityTrait};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    app_state::AppState,
    database::{
        models::users,
        types::{Role, SubscriptionStatus},
    },
    errors::AppError,
    services::dashboard::start_of_local_day,
};

/// Public projection of a user; never carries the password hash.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_on_duty: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_status: Option<SubscriptionStatus>,
}

impl From<users::Model> for UserView {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            is_on_duty: user.is_on_duty,
            owner_id: user.owner_id,
            subscription_status: user.subscription_status,
        }
    }
}

/// Loads the user behind a token; a token for a deleted account is treated as no session.
pub async fn load_current_user(
    user_id: i32,
    db: &DatabaseConnection,
) -> Result<users::Model, AppError> {
    users::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| {
            log::warn!("Session refers to missing user {}", user_id);
            AppError::unauthorized()
        })
}

/// Start of "today" in the configured server timezone.
pub fn today_start(app_state: &AppState) -> Result<DateTime<Utc>, AppError> {
    let tz = app_state.config.get_timezone().map_err(|e| {
        log::error!("Invalid server timezone: {}", e);
        AppError::Internal
    })?;
    Ok(start_of_local_day(tz, Utc::now()))
}

/// JSON extractor config: malformed bodies answer with the regular error shape.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| AppError::InvalidInput(err.to_string()).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::InvalidInput(err.to_string()).into())
}

#![allow(dead_code, unused_macros)]

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, Set};

use fieldtrack::app_state::AppState;
use fieldtrack::config::Config;
use fieldtrack::database::{
    self,
    models::{collections, location_history, shops, users},
    schema,
    types::{Role, SubscriptionStatus},
};
use fieldtrack::services::auth::AuthService;

pub const PASSWORD: &str = "password123";
pub const JWT_SECRET: &str = "integration-test-secret-0123456789";

pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 8080,
        jwt_secret: JWT_SECRET.to_string(),
        timezone: Some("UTC".to_string()),
        token_ttl_hours: Some(24),
        bcrypt_cost: Some(4),
        seed_admin_email: Some("seed-admin@fieldtrack.test".to_string()),
        seed_admin_password: Some("seed-password".to_string()),
        seed_admin_name: None,
        workers: Some(1),
        max_body_bytes: None,
    }
}

/// Fresh in-memory database with every table created.
pub async fn test_state() -> AppState {
    let db = database::connect_from_url("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    schema::create_tables(&db).await.expect("create tables");

    let config = test_config();
    let auth = AuthService::from_config(&config).expect("auth service");

    AppState { db, config, auth }
}

/// Builds the full application the way `main` does, minus the network listener.
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(fieldtrack::api::middleware::Authentication)
                .wrap(fieldtrack::api::middleware::RequestId)
                .app_data(actix_web::web::Data::new($state.clone()))
                .app_data(fieldtrack::api::helpers::json_config(256 * 1024))
                .app_data(fieldtrack::api::helpers::query_config())
                .configure(fieldtrack::api::configure),
        )
        .await
    };
}

pub async fn insert_user(
    state: &AppState,
    name: &str,
    email: &str,
    role: Role,
    owner_id: Option<i32>,
) -> users::Model {
    users::ActiveModel {
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        password_hash: Set(state.auth.hash_password(PASSWORD).unwrap()),
        role: Set(role),
        owner_id: Set(owner_id),
        is_on_duty: Set(false),
        subscription_status: Set(match role {
            Role::Owner => Some(SubscriptionStatus::Active),
            Role::Admin | Role::Employee => None,
        }),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .unwrap()
}

pub async fn insert_shop(state: &AppState, owner_id: i32, name: &str) -> shops::Model {
    shops::ActiveModel {
        owner_id: Set(owner_id),
        name: Set(name.to_string()),
        address: Set(None),
        latitude: Set(12.9716),
        longitude: Set(77.5946),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .unwrap()
}

pub async fn insert_ping(
    state: &AppState,
    employee_id: i32,
    latitude: f64,
    longitude: f64,
    timestamp: DateTime<Utc>,
) -> location_history::Model {
    location_history::ActiveModel {
        employee_id: Set(employee_id),
        latitude: Set(latitude),
        longitude: Set(longitude),
        timestamp: Set(timestamp),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .unwrap()
}

pub async fn insert_collection(
    state: &AppState,
    shop_id: i32,
    employee_id: i32,
    amount: f64,
    collected_at: DateTime<Utc>,
) -> collections::Model {
    collections::ActiveModel {
        shop_id: Set(shop_id),
        employee_id: Set(employee_id),
        amount: Set(amount),
        collected_at: Set(collected_at),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .unwrap()
}

pub fn token_for(state: &AppState, user: &users::Model) -> String {
    state
        .auth
        .issue_token(user.id, &user.email, user.role, &user.name)
        .unwrap()
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

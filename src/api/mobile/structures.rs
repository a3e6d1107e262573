use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::helpers::UserView;

#[derive(Debug, Deserialize, ToSchema, Clone)]
pub struct AuthRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserView,
}

#[derive(Debug, Deserialize, ToSchema, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DutyRequest {
    pub is_on_duty: bool,
}

#[derive(Debug, Serialize, ToSchema, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DutyResponse {
    pub is_on_duty: bool,
}

#[derive(Debug, Deserialize, ToSchema, Clone)]
pub struct LocationPing {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Serialize, ToSchema, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LocationAck {
    pub latitude: f64,
    pub longitude: f64,
    #[schema(value_type = String, format = DateTime)]
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRequest {
    pub shop_id: i32,
    pub amount: f64,
}

#[derive(Debug, Serialize, ToSchema, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CollectionReceipt {
    pub id: i32,
    pub shop_id: i32,
    pub amount: f64,
    #[schema(value_type = String, format = DateTime)]
    pub collected_at: DateTime<Utc>,
}

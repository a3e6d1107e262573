use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::database::types::{LogLevel, SubscriptionStatus};

pub const DEFAULT_LOG_LIMIT: u64 = 50;
pub const MAX_LOG_LIMIT: u64 = 500;

#[derive(Debug, Serialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SystemStats {
    pub total_owners: u64,
    pub total_employees: u64,
    pub employees_on_duty: u64,
    pub total_shops: u64,
    /// Sum of every collection amount ever recorded.
    pub total_collections: f64,
    pub active_broadcasts: u64,
}

#[derive(Debug, Deserialize, IntoParams, Clone, Default)]
#[into_params(parameter_in = Query)]
pub struct LogsQuery {
    /// Maximum rows to return (1..=500, default 50)
    pub limit: Option<u64>,
    /// INFO, WARN or ERROR
    pub level: Option<String>,
}

impl LogsQuery {
    pub fn effective_limit(&self) -> u64 {
        self.limit
            .unwrap_or(DEFAULT_LOG_LIMIT)
            .clamp(1, MAX_LOG_LIMIT)
    }
}

#[derive(Debug, Serialize, ToSchema, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LogActor {
    pub id: i32,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SystemLogView {
    pub id: i32,
    pub level: LogLevel,
    pub message: String,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
    pub user: Option<LogActor>,
}

#[derive(Debug, Deserialize, ToSchema, Clone)]
pub struct CreateBroadcastRequest {
    pub title: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize, ToSchema, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OwnerOverview {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub subscription_status: Option<SubscriptionStatus>,
    pub employee_count: i64,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema, Clone)]
pub struct UpdateSubscriptionRequest {
    pub status: SubscriptionStatus,
}

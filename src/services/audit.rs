use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr, Set};

use crate::database::{models::system_logs, types::LogLevel};

/// Appends one row to the system log.
///
/// Takes any connection so callers can write the audit row inside the same
/// transaction as the change it describes.
pub async fn record<C: ConnectionTrait>(
    db: &C,
    level: LogLevel,
    message: impl Into<String>,
    user_id: Option<i32>,
) -> Result<system_logs::Model, DbErr> {
    let message = message.into();
    log::info!("audit [{:?}] user={:?} {}", level, user_id, message);

    system_logs::ActiveModel {
        level: Set(level),
        message: Set(message),
        user_id: Set(user_id),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}

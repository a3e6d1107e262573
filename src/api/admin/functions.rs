use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::Expr,
};

use crate::{
    database::{
        models::{broadcasts, collections, shops, system_logs, users},
        types::{LogLevel, Role, SubscriptionStatus},
    },
    errors::AppError,
    services::audit,
};

use super::structures::{LogActor, OwnerOverview, SystemLogView, SystemStats};

pub async fn load_system_stats(db: &DatabaseConnection) -> Result<SystemStats, AppError> {
    let total_owners = users::Entity::find()
        .filter(users::Column::Role.eq(Role::Owner))
        .count(db)
        .await?;

    let total_employees = users::Entity::find()
        .filter(users::Column::Role.eq(Role::Employee))
        .count(db)
        .await?;

    let employees_on_duty = users::Entity::find()
        .filter(users::Column::Role.eq(Role::Employee))
        .filter(users::Column::IsOnDuty.eq(true))
        .count(db)
        .await?;

    let total_shops = shops::Entity::find().count(db).await?;

    // SUM over zero rows is NULL
    let total_collections = collections::Entity::find()
        .select_only()
        .column_as(Expr::col(collections::Column::Amount).sum(), "total")
        .into_tuple::<Option<f64>>()
        .one(db)
        .await?
        .flatten()
        .unwrap_or(0.0);

    let active_broadcasts = broadcasts::Entity::find()
        .filter(broadcasts::Column::IsActive.eq(true))
        .count(db)
        .await?;

    Ok(SystemStats {
        total_owners,
        total_employees,
        employees_on_duty,
        total_shops,
        total_collections,
        active_broadcasts,
    })
}

pub async fn load_recent_logs(
    db: &DatabaseConnection,
    limit: u64,
    level: Option<LogLevel>,
) -> Result<Vec<SystemLogView>, AppError> {
    let mut query = system_logs::Entity::find().find_also_related(users::Entity);
    if let Some(level) = level {
        query = query.filter(system_logs::Column::Level.eq(level));
    }

    let rows = query
        .order_by_desc(system_logs::Column::CreatedAt)
        .order_by_desc(system_logs::Column::Id)
        .limit(limit)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(log, user)| SystemLogView {
            id: log.id,
            level: log.level,
            message: log.message,
            created_at: log.created_at,
            user: user.map(|user| LogActor {
                id: user.id,
                name: user.name,
                email: user.email,
            }),
        })
        .collect())
}

pub async fn list_broadcasts(
    db: &DatabaseConnection,
    active_only: bool,
) -> Result<Vec<broadcasts::Model>, AppError> {
    let mut query = broadcasts::Entity::find();
    if active_only {
        query = query.filter(broadcasts::Column::IsActive.eq(true));
    }
    Ok(query
        .order_by_desc(broadcasts::Column::CreatedAt)
        .order_by_desc(broadcasts::Column::Id)
        .all(db)
        .await?)
}

/// Creates an active broadcast and its audit row in one transaction.
pub async fn create_broadcast(
    db: &DatabaseConnection,
    actor_id: i32,
    actor_name: &str,
    title: String,
    message: String,
) -> Result<broadcasts::Model, AppError> {
    let txn = db.begin().await?;

    let broadcast = broadcasts::ActiveModel {
        title: Set(title),
        message: Set(message),
        is_active: Set(true),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    audit::record(
        &txn,
        LogLevel::Info,
        format!(
            "Broadcast #{} \"{}\" created by {}",
            broadcast.id, broadcast.title, actor_name
        ),
        Some(actor_id),
    )
    .await?;

    txn.commit().await?;
    Ok(broadcast)
}

pub async fn list_owners(db: &DatabaseConnection) -> Result<Vec<OwnerOverview>, AppError> {
    let owners = users::Entity::find()
        .filter(users::Column::Role.eq(Role::Owner))
        .order_by_asc(users::Column::Name)
        .all(db)
        .await?;

    let counts: HashMap<i32, i64> = users::Entity::find()
        .select_only()
        .column(users::Column::OwnerId)
        .column_as(Expr::col(users::Column::Id).count(), "employee_count")
        .filter(users::Column::Role.eq(Role::Employee))
        .filter(users::Column::OwnerId.is_not_null())
        .group_by(users::Column::OwnerId)
        .into_tuple::<(Option<i32>, i64)>()
        .all(db)
        .await?
        .into_iter()
        .filter_map(|(owner_id, count)| owner_id.map(|id| (id, count)))
        .collect();

    Ok(owners
        .into_iter()
        .map(|owner| OwnerOverview {
            employee_count: counts.get(&owner.id).copied().unwrap_or(0),
            id: owner.id,
            name: owner.name,
            email: owner.email,
            subscription_status: owner.subscription_status,
            created_at: owner.created_at,
        })
        .collect())
}

pub async fn update_owner_subscription(
    db: &DatabaseConnection,
    actor_id: i32,
    owner_id: i32,
    status: SubscriptionStatus,
) -> Result<users::Model, AppError> {
    let owner = users::Entity::find_by_id(owner_id)
        .filter(users::Column::Role.eq(Role::Owner))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Owner with id {} not found", owner_id)))?;

    let txn = db.begin().await?;

    let mut active_model = owner.into_active_model();
    active_model.subscription_status = Set(Some(status));
    let updated = active_model.update(&txn).await?;

    audit::record(
        &txn,
        LogLevel::Info,
        format!(
            "Subscription of owner {} set to {:?}",
            updated.email, status
        ),
        Some(actor_id),
    )
    .await?;

    txn.commit().await?;
    Ok(updated)
}

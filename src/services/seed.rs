use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr,
    TransactionTrait,
};

use crate::{
    config::SeedAdmin,
    database::{models::users, types::{LogLevel, Role}},
    errors::AppError,
    services::{audit, auth::AuthService},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Created(i32),
    AlreadyExists(i32),
}

/// Creates the bootstrap admin account unless an admin with the same e-mail exists.
///
/// The e-mail being held by a non-admin account is a conflict, not success.
pub async fn ensure_admin(
    db: &DatabaseConnection,
    auth: &AuthService,
    seed: &SeedAdmin,
) -> Result<SeedOutcome, AppError> {
    let email = seed.email.trim().to_lowercase();

    if let Some(existing) = find_by_email(db, &email).await? {
        return existing_outcome(existing);
    }

    let admin = users::ActiveModel {
        name: Set(seed.name.clone()),
        email: Set(email.clone()),
        password_hash: Set(auth.hash_password(&seed.password)?),
        role: Set(Role::Admin),
        is_on_duty: Set(false),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let txn = db.begin().await?;
    let created = match admin.insert(&txn).await {
        Ok(created) => created,
        // A concurrent seed call won the race on the unique e-mail index
        Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            txn.rollback().await?;
            let existing = find_by_email(db, &email)
                .await?
                .ok_or(AppError::Internal)?;
            return existing_outcome(existing);
        }
        Err(err) => return Err(err.into()),
    };

    audit::record(
        &txn,
        LogLevel::Info,
        format!("Seeded admin account {}", created.email),
        Some(created.id),
    )
    .await?;
    txn.commit().await?;

    log::info!("Seeded admin account {}", created.email);
    Ok(SeedOutcome::Created(created.id))
}

fn existing_outcome(user: users::Model) -> Result<SeedOutcome, AppError> {
    match user.role {
        Role::Admin => Ok(SeedOutcome::AlreadyExists(user.id)),
        Role::Owner | Role::Employee => {
            log::warn!(
                "Seed admin e-mail {} belongs to {} account {}",
                user.email,
                user.role,
                user.id
            );
            Err(AppError::InvalidInput(format!(
                "E-mail {} is already used by a non-admin account",
                user.email
            )))
        }
    }
}

async fn find_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<users::Model>, AppError> {
    Ok(users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(db)
        .await?)
}

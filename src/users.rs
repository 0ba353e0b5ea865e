//! User accounts: registration, lookup, credential changes and removal.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    database::{
        is_unique_violation,
        models::{
            journal_entry,
            role::{encode_roles, Role},
            user,
        },
    },
    password::hash_password,
};

#[derive(Debug, Error)]
pub enum UserError {
    #[error("Username is already taken")]
    UsernameTaken,
    #[error("Failed to hash password: {0}")]
    Hashing(String),
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

fn conflict_as_taken(username: &str) -> impl Fn(DbErr) -> UserError + '_ {
    move |e| {
        if is_unique_violation(&e) {
            warn!(username, "Username already exists");
            UserError::UsernameTaken
        } else {
            UserError::Database(e)
        }
    }
}

pub(crate) fn hash(password: &str) -> Result<String, UserError> {
    hash_password(password).map_err(|e| UserError::Hashing(e.to_string()))
}

/// Create a regular account holding the `USER` role.
///
/// Uniqueness is decided by the database's unique index in the same statement
/// as the insert, so concurrent signups for one name cannot both succeed.
pub async fn register_user(
    db: &impl ConnectionTrait,
    username: &str,
    password: &str,
) -> Result<user::Model, UserError> {
    let user = insert_user(db, username, password, &[Role::User]).await?;
    info!(username, "New user created successfully");

    Ok(user)
}

/// Create an account holding both `USER` and `ADMIN`.
pub async fn create_admin(
    db: &impl ConnectionTrait,
    username: &str,
    password: &str,
) -> Result<user::Model, UserError> {
    let user = insert_user(db, username, password, &[Role::User, Role::Admin]).await?;
    info!(username, "Admin user created");

    Ok(user)
}

pub(crate) fn new_user(
    username: &str,
    password_hash: String,
    roles: &[Role],
) -> user::ActiveModel {
    let now = Utc::now().naive_utc();

    user::ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(username.to_string()),
        password_hash: Set(password_hash),
        roles: Set(encode_roles(roles)),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

async fn insert_user(
    db: &impl ConnectionTrait,
    username: &str,
    password: &str,
    roles: &[Role],
) -> Result<user::Model, UserError> {
    new_user(username, hash(password)?, roles)
        .insert(db)
        .await
        .map_err(conflict_as_taken(username))
}

pub async fn list_all(db: &impl ConnectionTrait) -> Result<Vec<user::Model>, DbErr> {
    user::Entity::find()
        .order_by_asc(user::Column::Username)
        .all(db)
        .await
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Uuid) -> Result<Option<user::Model>, DbErr> {
    user::Entity::find_by_id(id).one(db).await
}

pub async fn find_by_username(
    db: &impl ConnectionTrait,
    username: &str,
) -> Result<Option<user::Model>, DbErr> {
    user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await
}

/// Change a user's username and password. The password is re-hashed.
pub async fn update_credentials(
    db: &impl ConnectionTrait,
    user: user::Model,
    username: &str,
    password: &str,
) -> Result<user::Model, UserError> {
    let previous = user.username.clone();
    let mut active: user::ActiveModel = user.into();

    active.username = Set(username.to_string());
    active.password_hash = Set(hash(password)?);
    active.updated_at = Set(Utc::now().naive_utc());

    let updated = active
        .update(db)
        .await
        .map_err(conflict_as_taken(username))?;
    info!(previous = %previous, username, "User credentials updated");

    Ok(updated)
}

/// Delete a user together with their journal entries.
///
/// Returns false when no such user exists.
pub async fn delete_by_id(db: &DatabaseConnection, id: Uuid) -> Result<bool, DbErr> {
    let txn = db.begin().await?;

    journal_entry::Entity::delete_many()
        .filter(journal_entry::Column::UserId.eq(id))
        .exec(&txn)
        .await?;

    let deleted = user::Entity::delete_by_id(id).exec(&txn).await?.rows_affected > 0;

    txn.commit().await?;

    if deleted {
        info!(%id, "User deleted");
    }

    Ok(deleted)
}

//! Journal entries, always scoped to their owner.
//!
//! An entry that belongs to someone else is treated exactly like one that
//! does not exist.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use tracing::debug;
use uuid::Uuid;

use crate::database::models::{journal_entry, user};

/// Entries of `owner`, newest first.
pub async fn list(
    db: &impl ConnectionTrait,
    owner: &user::Model,
) -> Result<Vec<journal_entry::Model>, DbErr> {
    journal_entry::Entity::find()
        .filter(journal_entry::Column::UserId.eq(owner.id))
        .order_by_desc(journal_entry::Column::Date)
        .all(db)
        .await
}

pub async fn create(
    db: &impl ConnectionTrait,
    owner: &user::Model,
    title: &str,
    content: &str,
) -> Result<journal_entry::Model, DbErr> {
    let now = Utc::now().naive_utc();

    let entry = journal_entry::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(owner.id),
        title: Set(title.to_string()),
        content: Set(content.to_string()),
        date: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;

    debug!(entry_id = %entry.id, username = %owner.username, "Journal entry created");

    Ok(entry)
}

pub async fn find(
    db: &impl ConnectionTrait,
    owner: &user::Model,
    id: Uuid,
) -> Result<Option<journal_entry::Model>, DbErr> {
    journal_entry::Entity::find_by_id(id)
        .filter(journal_entry::Column::UserId.eq(owner.id))
        .one(db)
        .await
}

/// Replace title and content. `None` when the entry is absent.
pub async fn update(
    db: &impl ConnectionTrait,
    owner: &user::Model,
    id: Uuid,
    title: &str,
    content: &str,
) -> Result<Option<journal_entry::Model>, DbErr> {
    let Some(entry) = find(db, owner, id).await? else {
        return Ok(None);
    };

    let mut active: journal_entry::ActiveModel = entry.into();
    active.title = Set(title.to_string());
    active.content = Set(content.to_string());
    active.updated_at = Set(Utc::now().naive_utc());

    active.update(db).await.map(Some)
}

/// Returns false when the entry is absent.
pub async fn delete(
    db: &impl ConnectionTrait,
    owner: &user::Model,
    id: Uuid,
) -> Result<bool, DbErr> {
    let result = journal_entry::Entity::delete_many()
        .filter(journal_entry::Column::Id.eq(id))
        .filter(journal_entry::Column::UserId.eq(owner.id))
        .exec(db)
        .await?;

    Ok(result.rows_affected > 0)
}

use sea_orm::{sea_query::OnConflict, ConnectionTrait, EntityTrait};
use tracing::info;

use crate::{
    config::BootstrapConfig,
    database::models::{role::Role, user},
    users::{self, UserError},
};

/// Make sure the configured admin account exists.
///
/// The insert skips on a username conflict within a single statement, so
/// several instances starting at once still produce exactly one admin. An
/// existing account with that name is left untouched. Returns whether an
/// account was created.
pub async fn ensure_admin(
    db: &impl ConnectionTrait,
    config: &BootstrapConfig,
) -> Result<bool, UserError> {
    let admin = users::new_user(
        &config.admin_username,
        users::hash(&config.admin_password)?,
        &[Role::Admin],
    );

    let inserted = user::Entity::insert(admin)
        .on_conflict(
            OnConflict::column(user::Column::Username)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    if inserted > 0 {
        info!(username = %config.admin_username, "Admin user created successfully");
    } else {
        info!(username = %config.admin_username, "Admin user already exists");
    }

    Ok(inserted > 0)
}

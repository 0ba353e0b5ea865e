//! `SeaORM` Entity for user accounts

use sea_orm::entity::prelude::*;
use serde::Serialize;

use super::role::{decode_roles, Role};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    pub password_hash: String,
    pub roles: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::journal_entry::Entity")]
    JournalEntry,
}

impl Related<super::journal_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalEntry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn role_list(&self) -> Vec<Role> {
        decode_roles(&self.roles)
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role_list().contains(&role)
    }
}

/// Outward representation of a user; never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct UserView {
    pub id: Uuid,
    pub username: String,
    pub roles: Vec<Role>,
    pub created_at: DateTime,
}

impl From<Model> for UserView {
    fn from(user: Model) -> Self {
        Self {
            roles: user.role_list(),
            id: user.id,
            username: user.username,
            created_at: user.created_at,
        }
    }
}

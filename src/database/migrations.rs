pub use sea_orm_migration::prelude::*;

mod m20250901_120000_create_users;
mod m20250901_120500_create_journal_entries;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_120000_create_users::Migration),
            Box::new(m20250901_120500_create_journal_entries::Migration),
        ]
    }
}

pub struct Migrator;

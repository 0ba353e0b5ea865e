pub mod journal_entry;
pub mod role;
pub mod user;

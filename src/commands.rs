pub mod generate_secret;
pub mod migrate;
pub mod serve;
pub mod version;

use serde::{Deserialize, Deserializer, Serialize};

use lettre::message::Mailbox;

pub use crate::auth::login_throttle::LoginThrottleConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub tracing: TracingConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub email: EmailConfig,
    pub jwt: JwtConfig,
    pub weather: WeatherConfig,
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
    #[serde(default)]
    pub login_throttle: LoginThrottleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_expiration_hours")]
    pub expiration_hours: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EmailConfig {
    /// Mock mailer that captures emails for testing
    Mock,
    /// Real SMTP configuration for sending emails
    Smtp {
        host: String,
        port: u16,
        #[serde(deserialize_with = "deserialize_mailbox")]
        sender: Mailbox,
        username: Option<String>,
        password: Option<String>,
        #[serde(default = "default_use_tls")]
        use_tls: bool,
    },
}

impl EmailConfig {
    /// Address used in the `From` header of outgoing mail.
    pub fn sender(&self) -> Result<Mailbox, lettre::address::AddressError> {
        match self {
            Self::Smtp { sender, .. } => Ok(sender.clone()),
            Self::Mock => "noreply@example.com".parse(),
        }
    }
}

fn deserialize_mailbox<'de, D>(deserializer: D) -> Result<Mailbox, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
}

fn default_use_tls() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TracingConfig {
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

/// Settings for the weatherstack client and its response cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    pub api_key: String,
    /// City used for the greeting on `GET /user`
    #[serde(default = "default_city")]
    pub default_city: String,
    /// How long a successful lookup stays cached (default: 1800 = 30 minutes)
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_seconds: u64,
    /// Maximum number of cities kept in the cache (default: 1000)
    #[serde(default = "default_cache_capacity")]
    pub cache_max_capacity: u64,
    /// Outbound request timeout in seconds (default: 10)
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapConfig {
    #[serde(default = "default_admin_username")]
    pub admin_username: String,
    #[serde(default = "default_admin_password")]
    pub admin_password: String,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            admin_username: default_admin_username(),
            admin_password: default_admin_password(),
        }
    }
}

const fn default_expiration_hours() -> u64 {
    1
}

fn default_weather_base_url() -> String {
    "http://api.weatherstack.com".to_string()
}

fn default_city() -> String {
    "Mumbai".to_string()
}

const fn default_cache_ttl() -> u64 {
    1800 // 30 minutes
}

const fn default_cache_capacity() -> u64 {
    1000
}

const fn default_weather_timeout() -> u64 {
    10
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_admin_password() -> String {
    "adminpass".to_string()
}

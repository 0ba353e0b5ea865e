use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{config::Config, database::models::role::Role};

/// JWT claims structure containing user information and token metadata.
///
/// The `sub` (subject) field holds the username and `uid` the account id.
/// A token only authenticates while both still name the same account.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - the username
    pub sub: String,
    /// Id of the account the token was issued to
    pub uid: Uuid,
    /// Roles held by the user when the token was issued
    #[serde(default)]
    pub roles: Vec<Role>,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Generate a signed token for the given username.
///
/// The token is signed with HS256 using the configured secret and expires
/// `jwt.expiration_hours` after issue.
///
/// # Errors
/// Returns `jsonwebtoken::errors::Error` if token encoding fails
pub fn generate_token(
    config: &Config,
    user_id: Uuid,
    username: &str,
    roles: Vec<Role>,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + (config.jwt.expiration_hours * 3600) as usize;

    let claims = Claims {
        sub: username.to_string(),
        uid: user_id,
        roles,
        exp,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt.secret.as_bytes()),
    )
}

/// Verify and decode a token.
///
/// # Errors
/// Returns `jsonwebtoken::errors::Error` if token is invalid, expired, or malformed
pub fn verify_token(config: &Config, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt.secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

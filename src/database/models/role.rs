use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Authorization role granted to a user.
///
/// Roles are persisted in the `roles` column as a comma-separated list of the
/// uppercase names, in the order they were granted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

const SEPARATOR: char = ',';

/// Joins roles into their column representation.
pub fn encode_roles(roles: &[Role]) -> String {
    roles
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(&SEPARATOR.to_string())
}

/// Parses the column representation, skipping unknown role names.
pub fn decode_roles(column: &str) -> Vec<Role> {
    column
        .split(SEPARATOR)
        .filter_map(|name| name.trim().parse().ok())
        .collect()
}

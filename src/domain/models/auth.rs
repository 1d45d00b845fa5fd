use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Coach,
    Parent,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Coach => "COACH",
            Role::Parent => "PARENT",
            Role::Admin => "ADMIN",
        }
    }
}

/// Claims issued by the identity provider. Only verified here, never minted.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub exp: usize,
    pub iat: usize,
    pub role: Role,
}

/// An authenticated caller resolved to the profile that owns their resources.
#[derive(Debug, Clone)]
pub struct Actor {
    pub user_id: String,
    pub role: Role,
    /// coaches.id or parents.id depending on role; None for admins.
    pub profile_id: Option<String>,
}

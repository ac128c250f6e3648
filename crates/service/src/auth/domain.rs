use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Marketplace role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Client,
    Provider,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Client => models::user::ROLE_CLIENT,
            UserRole::Provider => models::user::ROLE_PROVIDER,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            models::user::ROLE_CLIENT => Some(Self::Client),
            models::user::ROLE_PROVIDER => Some(Self::Provider),
            _ => None,
        }
    }
}

/// Registration input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub city: String,
    pub phone: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
}

/// Login input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Domain user (business view, never carries the password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: UserRole,
    pub city: String,
    pub phone: String,
    pub address: Option<String>,
    pub photo: Option<String>,
}

/// Account creation record handed to the repository (hash already computed)
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub city: String,
    pub phone: String,
    pub address: Option<String>,
    pub photo: Option<String>,
}

/// Login result (session)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: AuthUser,
    pub token: String,
}

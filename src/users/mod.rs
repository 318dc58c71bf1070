//! User accounts
//!
//! The dashboard's user registry: the [`User`] model and a JSON-file-backed
//! [`UserStore`] with the CRUD surface the API exposes. Passwords are stored
//! as argon2 hashes only.

pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use store::UserStore;

/// A registered dashboard user. `password_hash` is persisted with the store
/// but never leaves the backend; API responses use their own DTOs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u32,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub username: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Display name used in generated reports: "First Last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Input for creating a user; the plaintext password is hashed by the store.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// Mutable user fields; everything else is fixed after creation.
#[derive(Debug, Clone, Deserialize)]
pub struct UserUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_joins_first_and_last() {
        let user = User {
            id: 1,
            first_name: "Anna".to_string(),
            last_name: "Rossi".to_string(),
            username: "arossi".to_string(),
            email: "anna.rossi@example.com".to_string(),
            password_hash: String::new(),
            is_admin: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(user.full_name(), "Anna Rossi");
    }

    #[test]
    fn test_new_user_optional_fields_default() {
        let json = r#"{
            "first_name": "Anna",
            "last_name": "Rossi",
            "email": "anna@example.com",
            "password": "segreta"
        }"#;
        let new_user: NewUser = serde_json::from_str(json).unwrap();
        assert_eq!(new_user.username, "");
        assert!(!new_user.is_admin);
    }
}

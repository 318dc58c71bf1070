//! JSON-file-backed user store
//!
//! The registry lives in a single JSON document, loaded at startup and
//! rewritten on every mutation. Reads go through an `RwLock`; the database
//! proper was scoped out of this backend, and the registry is small enough
//! that a flat file is the honest choice.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::DefaultUser;
use crate::error::{DashboardError, DashboardResult};
use crate::users::{NewUser, User, UserUpdate};

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreData {
    next_id: u32,
    users: BTreeMap<u32, User>,
}

pub struct UserStore {
    path: PathBuf,
    inner: RwLock<StoreData>,
}

impl UserStore {
    /// Open the store at `path`, creating an empty registry if the file does
    /// not exist yet.
    pub fn open(path: &Path) -> DashboardResult<Self> {
        let data = if path.is_file() {
            let contents = fs::read_to_string(path)?;
            serde_json::from_str(&contents).map_err(|e| {
                DashboardError::Store(format!(
                    "failed to parse user store {}: {}",
                    path.display(),
                    e
                ))
            })?
        } else {
            StoreData {
                next_id: 1,
                users: BTreeMap::new(),
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            inner: RwLock::new(data),
        })
    }

    pub fn list(&self) -> Vec<User> {
        let data = self.inner.read().expect("user store lock poisoned");
        data.users.values().cloned().collect()
    }

    pub fn get(&self, id: u32) -> Option<User> {
        let data = self.inner.read().expect("user store lock poisoned");
        data.users.get(&id).cloned()
    }

    pub fn find_by_email(&self, email: &str) -> Option<User> {
        let data = self.inner.read().expect("user store lock poisoned");
        data.users
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    /// Create a user, hashing the plaintext password. Fails when the email is
    /// already registered or the password is blank.
    pub fn create(&self, new_user: NewUser) -> DashboardResult<User> {
        if new_user.password.trim().is_empty() {
            return Err(DashboardError::Store("password must not be empty".to_string()));
        }
        if self.find_by_email(&new_user.email).is_some() {
            return Err(DashboardError::Store(format!(
                "email already registered: {}",
                new_user.email
            )));
        }

        let password_hash = hash_password(&new_user.password)?;
        let now = Utc::now();

        let mut data = self.inner.write().expect("user store lock poisoned");
        let id = data.next_id;
        data.next_id += 1;

        let user = User {
            id,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            username: new_user.username,
            email: new_user.email,
            password_hash,
            is_admin: new_user.is_admin,
            created_at: now,
            updated_at: now,
        };
        data.users.insert(id, user.clone());
        self.persist(&data)?;
        Ok(user)
    }

    /// Update the mutable fields of an existing user.
    pub fn update(&self, id: u32, update: UserUpdate) -> DashboardResult<User> {
        let mut data = self.inner.write().expect("user store lock poisoned");
        let user = data.users.get_mut(&id).ok_or(DashboardError::UserNotFound)?;

        user.first_name = update.first_name;
        user.last_name = update.last_name;
        user.email = update.email;
        user.updated_at = Utc::now();
        let updated = user.clone();

        self.persist(&data)?;
        Ok(updated)
    }

    pub fn delete(&self, id: u32) -> DashboardResult<()> {
        let mut data = self.inner.write().expect("user store lock poisoned");
        data.users.remove(&id).ok_or(DashboardError::UserNotFound)?;
        self.persist(&data)
    }

    /// Check email + password against the registry. The error does not reveal
    /// whether the email exists.
    pub fn verify_credentials(&self, email: &str, password: &str) -> DashboardResult<User> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(DashboardError::InvalidCredentials);
        }
        let user = self
            .find_by_email(email)
            .ok_or(DashboardError::InvalidCredentials)?;
        if verify_password(password, &user.password_hash) {
            Ok(user)
        } else {
            Err(DashboardError::InvalidCredentials)
        }
    }

    /// Seed the configured default admin user if its email is not present.
    /// Idempotent across restarts.
    pub fn seed_default(&self, seed: &DefaultUser) -> DashboardResult<()> {
        if seed.email.trim().is_empty() || seed.password.trim().is_empty() {
            return Err(DashboardError::Config(
                "default user seed needs a non-empty email and password".to_string(),
            ));
        }
        if self.find_by_email(&seed.email).is_some() {
            return Ok(());
        }

        info!(email = %seed.email, "seeding default admin user");
        self.create(NewUser {
            first_name: seed.first_name.clone(),
            last_name: seed.last_name.clone(),
            username: seed.username.clone(),
            email: seed.email.clone(),
            password: seed.password.clone(),
            is_admin: true,
        })?;
        Ok(())
    }

    fn persist(&self, data: &StoreData) -> DashboardResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let contents = serde_json::to_string_pretty(data)
            .map_err(|e| DashboardError::Store(format!("failed to serialize user store: {e}")))?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

fn hash_password(password: &str) -> DashboardResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DashboardError::Store(format!("failed to hash password: {e}")))
}

fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

//! Application configuration
//!
//! Loaded from an optional JSON file with sensible defaults, mirroring the
//! shape of the original deployment's settings: server binding, template
//! location, user store path, session cookie name and the seeded admin user.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, DashboardResult};
use crate::report::TEMPLATE_FILE_NAME;

/// Seed data for the default admin user created on first startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultUser {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Host to bind the API server to
    pub host: String,
    /// Port to bind the API server to
    pub port: u16,
    /// Directory holding the report template assets
    pub templates_dir: PathBuf,
    /// Path of the JSON user store
    pub users_file: PathBuf,
    /// Name of the session cookie
    pub cookie_name: String,
    /// Origins allowed to call the API with credentials (the SPA dev servers)
    pub allowed_origins: Vec<String>,
    /// Admin user seeded into the store when its email is not present
    pub default_user: Option<DefaultUser>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            templates_dir: PathBuf::from("Templates"),
            users_file: PathBuf::from("data/users.json"),
            cookie_name: "session".to_string(),
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(),
            ],
            default_user: None,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file, or fall back to defaults when no
    /// path is given. A missing explicit path is an error; a missing implicit
    /// one is not.
    pub fn load(path: Option<&Path>) -> DashboardResult<Self> {
        match path {
            Some(path) => {
                let contents = fs::read_to_string(path).map_err(|e| {
                    DashboardError::Config(format!(
                        "failed to read config file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                serde_json::from_str(&contents).map_err(|e| {
                    DashboardError::Config(format!(
                        "failed to parse config file {}: {}",
                        path.display(),
                        e
                    ))
                })
            }
            None => Ok(Self::default()),
        }
    }

    /// Full path of the Alfa report template asset.
    pub fn template_path(&self) -> PathBuf {
        self.templates_dir.join(TEMPLATE_FILE_NAME)
    }
}

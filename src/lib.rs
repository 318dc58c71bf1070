//! Tempestive dashboard backend
//!
//! Internal dashboard service: session-cookie authentication, user
//! management and generation of the monthly Alfa timesheet report
//! (`rapportino`) from an uploaded spreadsheet export.
//!
//! # Features
//!
//! - Upload → extract → sort → template → xlsx report pipeline
//! - Fixed `rapportino_alfa.xlsx` template populated per request
//! - Cookie-based sessions backed by an in-process token table
//! - JSON-file user registry with argon2 password hashes
//! - Axum REST API consumed by the SPA frontend
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use tempestive_dashboard::report::generate_report;
//!
//! let upload = std::fs::read("timesheet.xlsx")?;
//! let report = generate_report(
//!     Path::new("Templates/rapportino_alfa.xlsx"),
//!     &upload,
//!     2,
//!     2024,
//!     "Anna Rossi",
//! )?;
//! std::fs::write(&report.file_name, &report.bytes)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod report;
pub mod users;

// Re-export commonly used types
pub use config::Config;
pub use error::{DashboardError, DashboardResult};
pub use report::{ExtractedRow, GeneratedReport};
pub use users::{User, UserStore};

use std::path::PathBuf;
use thiserror::Error;

pub type DashboardResult<T> = Result<T, DashboardError>;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("no file uploaded")]
    NoFileProvided,

    #[error("no data to process for the report")]
    NoMatchingData,

    #[error("report template not found: {}", .0.display())]
    TemplateMissing(PathBuf),

    #[error("invalid month: {0} (expected 1-12)")]
    InvalidMonth(u32),

    #[error("missing form field: {0}")]
    MissingField(&'static str),

    #[error("invalid upload payload: {0}")]
    Upload(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("authentication required")]
    Unauthorized,

    #[error("user not found")]
    UserNotFound,

    #[error("user store error: {0}")]
    Store(String),

    #[error("configuration error: {0}")]
    Config(String),
}

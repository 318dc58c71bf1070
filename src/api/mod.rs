//! Dashboard HTTP API
//!
//! REST boundary for the SPA: session auth, user management and the Alfa
//! report upload endpoint. Run with `dashboard serve`.

pub mod handlers;
pub mod server;

pub use server::{build_router, run_server, AppState};

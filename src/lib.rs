//! Bistro: backend API for a restaurant ordering platform.
//!
//! Menu browsing, carts, users with an admin role, reviews, and payments,
//! backed by schemaless document collections in SQLite.

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod payments;
pub mod util;

pub use db::AppState;
pub use error::{AppError, Result};
pub use handlers::router;

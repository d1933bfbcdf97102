//! SDK resource modules
//!
//! This module contains resource-specific clients for interacting with
//! different API endpoints.

pub mod auth;
pub mod submissions;
pub mod tasks;

pub use auth::AuthClient;
pub use submissions::SubmissionsClient;
pub use tasks::TasksClient;

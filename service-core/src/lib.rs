//! service-core: Shared infrastructure for the category service workspace.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;

pub use axum;
pub use mongodb;
pub use serde;
pub use tokio;
pub use tower_http;
pub use tracing;
pub use validator;

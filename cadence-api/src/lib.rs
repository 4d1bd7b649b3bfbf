//! Typed access to the platform's list-backed collection endpoints.

pub mod client;
pub mod routes;
pub mod types;

pub use client::{ApiClient, ResourceClient};
pub use routes::ResourceRoutes;

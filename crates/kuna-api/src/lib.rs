// kuna-api: Async Rust client for the Kuna cloud camera REST API

pub mod auth;
pub mod cameras;
pub mod client;
pub mod error;
pub mod models;
pub mod recordings;
pub mod transport;

pub use client::ApiClient;
pub use error::Error;
pub use models::{Camera, CameraPatch, Recording};

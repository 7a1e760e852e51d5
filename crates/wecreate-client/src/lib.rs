//! Generation client implementations for WeCreate.
//!
//! This crate provides concrete implementations of the `GenerationClient` trait.
//!
//! # Backends
//!
//! - **Http**: the WeCreate generation service over JSON/HTTP
//! - **Mock**: deterministic offline content for demos and tests

pub mod factory;
pub mod http;
pub mod mock;
pub mod options;

pub use factory::{ClientFactory, ClientKind};
pub use http::HttpGenerationClient;
pub use mock::MockGenerationClient;
pub use options::{ClientOptions, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

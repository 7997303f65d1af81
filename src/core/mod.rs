/// Layered configuration and build profiles.
pub mod config;

/// The crate-wide error type and `Result` alias.
pub mod error;

/// Traits shared by the build pipeline.
pub mod traits;

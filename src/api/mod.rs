//! Cloud controller interfaces.
//!
//! The dispatch core depends only on the repository traits here; the concrete
//! HTTP client lives in [`client`] and is swapped for recording mocks in
//! tests.

pub mod client;
pub mod models;

pub use client::CloudController;
pub use models::Buildpack;

use thiserror::Error;

/// Failure reported by the remote API or the transport underneath it.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The named entity does not exist server-side.
    #[error("{model} '{name}' not found")]
    NotFound { model: &'static str, name: String },

    /// No API endpoint has been targeted yet.
    #[error("No API endpoint set. Use 'nimbus api ENDPOINT' to target one.")]
    NoEndpoint,

    /// Server-side rejection or transport failure; the message surfaces
    /// verbatim.
    #[error("{0}")]
    Remote(String),
}

impl ApiError {
    pub fn not_found(model: &'static str, name: impl Into<String>) -> Self {
        ApiError::NotFound { model, name: name.into() }
    }
}

/// Read and mutate buildpack records.
pub trait BuildpackRepository {
    fn list(&self) -> Result<Vec<Buildpack>, ApiError>;

    fn find_by_name(&self, name: &str) -> Result<Buildpack, ApiError>;

    /// Push changed fields to the server. The returned record is the
    /// server's representation and supersedes the argument.
    fn update(&self, buildpack: &Buildpack) -> Result<Buildpack, ApiError>;

    fn delete(&self, guid: &str) -> Result<(), ApiError>;
}

/// Upload buildpack bits as a separate operation from field updates.
pub trait BuildpackBitsRepository {
    fn upload(&self, buildpack: &Buildpack, path: &str) -> Result<(), ApiError>;
}

//! # Aegis Core
//!
//! The domain layer of the Aegis content backend.
//! This crate contains the content entities, the store ports, and the
//! services that mediate between the HTTP surface and the remote backend,
//! with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{AuthError, BlobError, StoreError};

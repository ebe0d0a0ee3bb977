//! # Aegis Infrastructure
//!
//! Concrete implementations of the ports defined in `aegis-core`:
//! document store, blob storage, token validation, and the relational
//! source read by the migration utility.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - In-memory adapters only
//! - `firestore` - Firestore / Firebase Storage REST adapters
//! - `postgres` - Relational source via SeaORM
//! - `auth` - JWT token validation

pub mod blob;
pub mod store;

#[cfg(feature = "auth")]
pub mod auth;

#[cfg(feature = "postgres")]
pub mod relational;

// Re-exports - In-Memory
pub use blob::MemoryBlobStore;
pub use store::MemoryDocumentStore;

// Re-exports - Config (plain data, available without the adapters)
pub use blob::StorageConfig;
pub use store::FirestoreConfig;

// Re-exports - Remote
#[cfg(feature = "firestore")]
pub use blob::FirebaseBlobStore;
#[cfg(feature = "firestore")]
pub use store::FirestoreStore;

#[cfg(feature = "auth")]
pub use auth::{JwtConfig, JwtTokenService};

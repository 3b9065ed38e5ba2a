//! Record identifiers.
//!
//! Every patient and treatment record carries an opaque [`RecordId`] assigned when the record
//! enters a roster or ledger. Identifiers are random (UUID v4), so two records never share one
//! even when they are created in the same millisecond.
//!
//! ## Canonical form
//! - Length: 32
//! - Characters: `0-9` and `a-f` only
//! - Example: `3f2b8c0e9d6a4e1b8f7c5d4a3b2c1d0e`
//!
//! Identifiers coming back from a client (REST path, CLI argument, fixture file) must already be
//! canonical. Hyphenated or uppercase forms are rejected rather than normalised, so the string a
//! user sees is always the string that looks the record up.

mod record_id;

pub use record_id::{RecordId, Uuid};

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum IdError {
    /// Input is not a canonical record identifier
    #[error("Invalid record id: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type IdResult<T> = Result<T, IdError>;

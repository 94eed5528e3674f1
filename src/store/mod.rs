//! Document Store Adapter for rightsledger
//!
//! Wraps the host's byte-level get/put with typed document read/write.
//!
//! # Design Principles
//!
//! - Canonical JSON encoding with a `docType` discriminator
//! - Point reads distinguish absent, empty and undecodable values
//! - No retries; host failures surface as `StoreError`

mod document;
mod errors;
mod keys;

pub use document::{Document, DocumentStore, Fetched};
pub use errors::{StoreError, StoreErrorCode, StoreResult};
pub use keys::{copyright_key, primary_key, report_key, validate_id, COPYRIGHT_TAG, REPORT_TAG};

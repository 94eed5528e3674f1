//! Rich Query Builder for rightsledger
//!
//! Builds `{"selector": {...}}` expressions keyed on the `docType`
//! discriminator and runs them through the host query engine.
//!
//! # Invariants
//!
//! - Every selector constrains `docType`
//! - Cursors are released on every exit path
//! - Each row decodes independently; failures follow `DecodePolicy`

mod cursor;
mod executor;
mod selector;

pub use cursor::ScopedCursor;
pub use executor::{DecodePolicy, QueryExecutor, QueryRecord, QueryResults};
pub use selector::{Selector, DOC_TYPE_FIELD};

//! Composite Key Indexer subsystem for rightsledger
//!
//! Secondary indexes are stored in the ledger itself as marker records whose
//! composite key encodes `(indexName, [attributeValue, primaryKey])`.
//!
//! # Invariants
//!
//! - Key derivation is deterministic and collision-free
//! - One entry per document created through the indexed path
//! - Entries are written in the same transaction as their document
//! - Entries are never updated or removed; readers tolerate stale entries

mod indexer;
mod scan;
mod spec;

pub use indexer::{CompositeKeyIndexer, INDEX_MARKER};
pub use scan::IndexScan;
pub use spec::{IndexSpec, AUTHOR_ID, COPYRIGHT_ID};

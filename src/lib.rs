//! rightsledger - copyright registrations and infringement reports on a ledger
//!
//! Documents live in a key-value world state supplied by the host ledger.
//! Secondary indexes are composite-key marker records; bulk listings go
//! through the host's selector query engine.

pub mod cli;
pub mod contract;
pub mod gateway;
pub mod index;
pub mod ledger;
pub mod observability;
pub mod query;
pub mod registry;
pub mod store;

//! Registries for rightsledger
//!
//! Copyright, rights-holder report and authority investigation registries.
//! Each operation takes the ledger handle explicitly and runs inside the
//! caller's transaction.
//!
//! # Invariants
//!
//! - Primary keys are a type tag followed by the caller's serial
//! - Every indexed document is written together with its index entry
//! - Copyrights are never mutated after registration
//! - `isPirated` and `status` change only through read-modify-write

mod copyright;
mod documents;
mod investigation;
mod report;

pub use copyright::CopyrightRegistry;
pub use documents::{
    Copyright, InvestigationReport, InvestigationStatus, InvestigationSubmission, PiracyVerdict,
    Report, ReportFiling,
};
pub use investigation::InvestigationRegistry;
pub use report::ReportRegistry;

use crate::query::DecodePolicy;

/// Behaviour switches shared by the registries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegistryOptions {
    /// Handling of undecodable rows in bulk listings
    pub decode_policy: DecodePolicy,
    /// Require the referenced copyright to exist when filing a report
    pub verify_copyright_reference: bool,
}

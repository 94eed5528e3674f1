//! Gateway subsystem for rightsledger
//!
//! Hosts the rights-holder and authority channels side by side, each with its
//! own ledger, and the workflows that move a report from one to the other.
//!
//! # Principles
//!
//! 1. One transaction per invocation per channel
//! 2. Reads never commit
//! 3. Channels share no state; referral copies what it needs

mod channel;
mod errors;
mod referral;
mod service;

pub use channel::Channel;
pub use errors::{GatewayError, GatewayResult};
pub use referral::{filing_date, ReferralPolicy, DEFAULT_REFERRAL_THRESHOLD, FILING_DATE_FORMAT};
pub use service::{
    FiledReport, Gateway, InfringementNotice, AUTHORITY_SNAPSHOT, RIGHTS_HOLDER_SNAPSHOT,
};

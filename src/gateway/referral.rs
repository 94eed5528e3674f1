//! Verdict derivation for newly filed reports

use chrono::Local;

use crate::registry::PiracyVerdict;

/// Timestamp layout stamped on filed reports
pub const FILING_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Default similarity above which a report is treated as piracy
pub const DEFAULT_REFERRAL_THRESHOLD: f64 = 70.0;

/// When filed reports are judged and forwarded to the authority
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferralPolicy {
    /// Forward reports judged `true` to the authority channel
    pub auto_refer: bool,
    /// Similarity strictly above this is `true`
    pub threshold: f64,
}

impl Default for ReferralPolicy {
    fn default() -> Self {
        Self {
            auto_refer: true,
            threshold: DEFAULT_REFERRAL_THRESHOLD,
        }
    }
}

impl ReferralPolicy {
    /// Initial verdict for a report with the given similarity score
    ///
    /// Scores that do not parse are left for human review.
    pub fn verdict_for(&self, similarity: &str) -> PiracyVerdict {
        match similarity.trim().parse::<f64>() {
            Ok(score) if score > self.threshold => PiracyVerdict::True,
            _ => PiracyVerdict::Pending,
        }
    }
}

/// Current local time in `FILING_DATE_FORMAT`
pub fn filing_date() -> String {
    Local::now().format(FILING_DATE_FORMAT).to_string()
}

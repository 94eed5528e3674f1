//! Document shapes stored by the registries
//!
//! All fields are plain strings on the wire. Field names and order are fixed;
//! they define the canonical encoding.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::store::{Document, COPYRIGHT_TAG, REPORT_TAG};

/// A registered work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Copyright {
    #[serde(rename = "docType")]
    pub doc_type: String,
    pub id: String,
    pub title: String,
    #[serde(rename = "contentType")]
    pub content_type: String,
    pub author: String,
}

impl Copyright {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content_type: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            doc_type: COPYRIGHT_TAG.to_string(),
            id: id.into(),
            title: title.into(),
            content_type: content_type.into(),
            author: author.into(),
        }
    }
}

impl Document for Copyright {
    const DOC_TYPE: &'static str = COPYRIGHT_TAG;

    fn doc_type(&self) -> &str {
        &self.doc_type
    }

    fn id(&self) -> &str {
        &self.id
    }
}

/// Reviewer decision on a rights-holder report
///
/// Stored lowercase. Parsing is case-insensitive so `True` and `Pending`
/// written by older front ends still decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PiracyVerdict {
    #[default]
    Pending,
    False,
    True,
}

impl PiracyVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            PiracyVerdict::Pending => "pending",
            PiracyVerdict::False => "false",
            PiracyVerdict::True => "true",
        }
    }

    /// Returns true once a reviewer has decided either way
    pub fn is_decided(&self) -> bool {
        !matches!(self, PiracyVerdict::Pending)
    }
}

impl fmt::Display for PiracyVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PiracyVerdict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(PiracyVerdict::Pending),
            "false" => Ok(PiracyVerdict::False),
            "true" => Ok(PiracyVerdict::True),
            _ => Err(format!(
                "isPirated must be one of pending, false, true; got {:?}",
                s
            )),
        }
    }
}

impl TryFrom<String> for PiracyVerdict {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PiracyVerdict> for String {
    fn from(verdict: PiracyVerdict) -> Self {
        verdict.as_str().to_string()
    }
}

/// Infringement report filed by the rights-holder side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    #[serde(rename = "docType")]
    pub doc_type: String,
    pub id: String,
    pub url: String,
    pub site: String,
    /// Soft reference to `Copyright::id`
    #[serde(rename = "copyrightID")]
    pub copyright_id: String,
    pub pirate: String,
    #[serde(rename = "reporterEmail")]
    pub reporter_email: String,
    pub date: String,
    pub form: String,
    pub similarity: String,
    #[serde(rename = "isPirated")]
    pub is_pirated: PiracyVerdict,
}

impl Document for Report {
    const DOC_TYPE: &'static str = REPORT_TAG;

    fn doc_type(&self) -> &str {
        &self.doc_type
    }

    fn id(&self) -> &str {
        &self.id
    }
}

/// Caller-supplied fields of a rights-holder report
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportFiling {
    pub url: String,
    pub site: String,
    /// Serial of the referenced copyright, without the `copyright` tag
    pub copyright_serial: String,
    pub pirate: String,
    pub reporter_email: String,
    pub date: String,
    pub form: String,
    pub similarity: String,
    pub is_pirated: PiracyVerdict,
}

/// Investigation status on the authority side. Free-form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvestigationStatus(String);

impl InvestigationStatus {
    /// The only status the contract itself assigns
    pub const PENDING: &'static str = "Pending";

    pub fn new(status: impl Into<String>) -> Self {
        Self(status.into())
    }

    pub fn pending() -> Self {
        Self::new(Self::PENDING)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_pending(&self) -> bool {
        self.0 == Self::PENDING
    }
}

impl fmt::Display for InvestigationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Report as received by the investigating authority
///
/// Carries a flattened snapshot of the copyright's descriptive fields; the
/// authority channel shares no state with the rights-holder channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestigationReport {
    #[serde(rename = "docType")]
    pub doc_type: String,
    pub id: String,
    pub url: String,
    pub site: String,
    pub title: String,
    #[serde(rename = "contentType")]
    pub content_type: String,
    pub author: String,
    pub pirate: String,
    #[serde(rename = "reporterEmail")]
    pub reporter_email: String,
    pub date: String,
    pub form: String,
    pub similarity: String,
    pub status: InvestigationStatus,
}

impl Document for InvestigationReport {
    const DOC_TYPE: &'static str = REPORT_TAG;

    fn doc_type(&self) -> &str {
        &self.doc_type
    }

    fn id(&self) -> &str {
        &self.id
    }
}

/// Flattened report submission received by the authority
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InvestigationSubmission {
    pub url: String,
    pub site: String,
    pub title: String,
    pub content_type: String,
    pub author: String,
    pub pirate: String,
    pub reporter_email: String,
    pub date: String,
    pub form: String,
    pub similarity: String,
}

//! Report Registry, authority side
//!
//! Receives flattened submissions and tracks an open-ended investigation
//! status. No secondary index is kept for these documents.

use super::documents::{InvestigationReport, InvestigationStatus, InvestigationSubmission};
use super::RegistryOptions;
use crate::ledger::LedgerStub;
use crate::observability::{log_event_with_fields, Event};
use crate::query::{QueryExecutor, QueryRecord, Selector};
use crate::store::{report_key, DocumentStore, StoreResult, REPORT_TAG};

/// Tracks investigations opened by the authority
#[derive(Debug, Clone, Copy, Default)]
pub struct InvestigationRegistry {
    executor: QueryExecutor,
}

impl InvestigationRegistry {
    pub fn new(options: &RegistryOptions) -> Self {
        Self {
            executor: QueryExecutor::new(options.decode_policy),
        }
    }

    /// Open an investigation under `report` + `id`
    ///
    /// Status always starts as `Pending`.
    pub fn create<S>(
        &self,
        stub: &mut S,
        id: &str,
        submission: InvestigationSubmission,
    ) -> StoreResult<InvestigationReport>
    where
        S: LedgerStub + ?Sized,
    {
        let key = report_key(id)?;
        let report = InvestigationReport {
            doc_type: REPORT_TAG.to_string(),
            id: key.clone(),
            url: submission.url,
            site: submission.site,
            title: submission.title,
            content_type: submission.content_type,
            author: submission.author,
            pirate: submission.pirate,
            reporter_email: submission.reporter_email,
            date: submission.date,
            form: submission.form,
            similarity: submission.similarity,
            status: InvestigationStatus::pending(),
        };

        DocumentStore::put(stub, &key, &report)?;

        log_event_with_fields(Event::InvestigationOpened, &[("key", &key)]);
        Ok(report)
    }

    /// Every investigation, in key order
    pub fn query_all<S>(&self, stub: &S) -> StoreResult<Vec<QueryRecord<InvestigationReport>>>
    where
        S: LedgerStub + ?Sized,
    {
        let results = self.executor.execute(stub, &Selector::doc_type(REPORT_TAG))?;
        Ok(results.into_records())
    }

    /// The investigation opened under `report_no`
    pub fn query_one<S>(&self, stub: &S, report_no: &str) -> StoreResult<InvestigationReport>
    where
        S: LedgerStub + ?Sized,
    {
        let key = report_key(report_no)?;
        DocumentStore::require(stub, &key)
    }

    /// Replace the status of investigation `report_no`
    pub fn set_status<S>(
        &self,
        stub: &mut S,
        report_no: &str,
        status: InvestigationStatus,
    ) -> StoreResult<InvestigationReport>
    where
        S: LedgerStub + ?Sized,
    {
        let key = report_key(report_no)?;
        let mut report: InvestigationReport = DocumentStore::require(stub, &key)?;
        let previous = std::mem::replace(&mut report.status, status);
        DocumentStore::put(stub, &key, &report)?;

        log_event_with_fields(
            Event::StatusChanged,
            &[
                ("from", previous.as_str()),
                ("key", &key),
                ("to", report.status.as_str()),
            ],
        );
        Ok(report)
    }
}

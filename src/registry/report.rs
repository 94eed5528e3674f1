//! Report Registry, rights-holder side
//!
//! Reports reference a copyright through `copyrightID`. The reference is not
//! checked unless `verify_copyright_reference` is set. `isPirated` is the only
//! mutable field.

use super::documents::{Copyright, PiracyVerdict, Report, ReportFiling};
use super::RegistryOptions;
use crate::index::{CompositeKeyIndexer, IndexScan, COPYRIGHT_ID};
use crate::ledger::LedgerStub;
use crate::observability::{log_event_with_fields, Event};
use crate::query::{QueryExecutor, QueryRecord, QueryResults, Selector};
use crate::store::{
    copyright_key, report_key, validate_id, DocumentStore, Fetched, StoreErrorCode, StoreResult, REPORT_TAG,
};

/// Files and reviews infringement reports
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportRegistry {
    executor: QueryExecutor,
    verify_copyright_reference: bool,
}

impl ReportRegistry {
    pub fn new(options: &RegistryOptions) -> Self {
        Self {
            executor: QueryExecutor::new(options.decode_policy),
            verify_copyright_reference: options.verify_copyright_reference,
        }
    }

    /// File a report under `report` + `serial`
    ///
    /// Writes the document, then a `copyrightid~id` entry on
    /// `(copyrightID, id)`.
    pub fn create<S>(&self, stub: &mut S, serial: &str, filing: ReportFiling) -> StoreResult<Report>
    where
        S: LedgerStub + ?Sized,
    {
        let key = report_key(serial)?;
        let copyright_id = copyright_key(&filing.copyright_serial)?;

        if self.verify_copyright_reference {
            DocumentStore::require::<_, Copyright>(stub, &copyright_id)?;
        }

        let report = Report {
            doc_type: REPORT_TAG.to_string(),
            id: key.clone(),
            url: filing.url,
            site: filing.site,
            copyright_id,
            pirate: filing.pirate,
            reporter_email: filing.reporter_email,
            date: filing.date,
            form: filing.form,
            similarity: filing.similarity,
            is_pirated: filing.is_pirated,
        };

        DocumentStore::put(stub, &key, &report)?;
        CompositeKeyIndexer::register_index_entry(stub, &COPYRIGHT_ID, &[&report.copyright_id, &key])?;

        log_event_with_fields(
            Event::ReportFiled,
            &[
                ("copyright", &report.copyright_id),
                ("is_pirated", report.is_pirated.as_str()),
                ("key", &key),
            ],
        );
        Ok(report)
    }

    /// Every report, in key order
    pub fn query_all<S>(&self, stub: &S) -> StoreResult<Vec<QueryRecord<Report>>>
    where
        S: LedgerStub + ?Sized,
    {
        let results = self.executor.execute(stub, &Selector::doc_type(REPORT_TAG))?;
        Ok(results.into_records())
    }

    /// The report filed under `serial`
    pub fn query_one<S>(&self, stub: &S, serial: &str) -> StoreResult<Report>
    where
        S: LedgerStub + ?Sized,
    {
        let key = report_key(serial)?;
        DocumentStore::require(stub, &key)
    }

    /// Reports filed against `copyright` + `copyright_serial`
    ///
    /// Resolved through the `copyrightid~id` index. Entries whose report is
    /// missing or now points elsewhere are skipped with a warning. Rows that
    /// do not decode follow the decode policy, as in `query_all`.
    pub fn query_by_copyright<S>(
        &self,
        stub: &S,
        copyright_serial: &str,
    ) -> StoreResult<Vec<QueryRecord<Report>>>
    where
        S: LedgerStub + ?Sized,
    {
        let copyright_id = copyright_key(copyright_serial)?;

        let policy = self.executor.policy();
        let mut results = QueryResults::empty();
        for key in IndexScan::primary_keys(stub, &COPYRIGHT_ID, &[&copyright_id])? {
            match DocumentStore::get::<_, Report>(stub, &key) {
                Ok(Fetched::Found(report)) if report.copyright_id == copyright_id => {
                    results.accept(key, Ok(report), policy)?;
                }
                Err(e) if e.code() == StoreErrorCode::DecodeFailure => {
                    results.accept(key, Err(e), policy)?;
                }
                Err(e) => return Err(e),
                Ok(_) => log_event_with_fields(
                    Event::StaleIndexEntry,
                    &[("index", COPYRIGHT_ID.name()), ("key", &key)],
                ),
            }
        }
        Ok(results.into_records())
    }

    /// Set `isPirated` on the report stored under the full id `report_id`
    ///
    /// Read-modify-write. Any transition is accepted, including back to
    /// pending. Applying the same verdict twice is a no-op on the stored bytes.
    pub fn set_pirated<S>(&self, stub: &mut S, report_id: &str, verdict: PiracyVerdict) -> StoreResult<Report>
    where
        S: LedgerStub + ?Sized,
    {
        validate_id("report id", report_id)?;

        let mut report: Report = DocumentStore::require(stub, report_id)?;
        let previous = report.is_pirated;
        report.is_pirated = verdict;
        DocumentStore::put(stub, report_id, &report)?;

        log_event_with_fields(
            Event::VerdictChanged,
            &[
                ("from", previous.as_str()),
                ("key", report_id),
                ("to", verdict.as_str()),
            ],
        );
        Ok(report)
    }
}

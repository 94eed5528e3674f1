//! Authority contract
//!
//! Receives referred reports and tracks their investigation status.

use serde_json::Value;

use super::{expect_args, to_json, Contract, ContractError, ContractResult};
use crate::ledger::LedgerStub;
use crate::registry::{InvestigationRegistry, InvestigationStatus, InvestigationSubmission, RegistryOptions};

const FUNCTIONS: &[&str] = &[
    "createReport",
    "queryAllReports",
    "queryReport",
    "changeReportStatus",
];

/// Contract operated by the investigating authority
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorityContract {
    investigations: InvestigationRegistry,
}

impl AuthorityContract {
    pub fn new(options: &RegistryOptions) -> Self {
        Self {
            investigations: InvestigationRegistry::new(options),
        }
    }

    pub fn investigations(&self) -> &InvestigationRegistry {
        &self.investigations
    }
}

impl Contract for AuthorityContract {
    fn name(&self) -> &'static str {
        "authority"
    }

    fn functions(&self) -> &'static [&'static str] {
        FUNCTIONS
    }

    fn invoke(&self, stub: &mut dyn LedgerStub, function: &str, args: &[String]) -> ContractResult<Value> {
        match function {
            "createReport" => {
                let [id, url, site, title, content_type, author, pirate, email, date, form, similarity] =
                    expect_args::<11>(function, args)?;
                let submission = InvestigationSubmission {
                    url: url.clone(),
                    site: site.clone(),
                    title: title.clone(),
                    content_type: content_type.clone(),
                    author: author.clone(),
                    pirate: pirate.clone(),
                    reporter_email: email.clone(),
                    date: date.clone(),
                    form: form.clone(),
                    similarity: similarity.clone(),
                };
                to_json(&self.investigations.create(stub, id, submission)?)
            }
            "queryAllReports" => {
                expect_args::<0>(function, args)?;
                to_json(&self.investigations.query_all(stub)?)
            }
            "queryReport" => {
                let [report_no] = expect_args::<1>(function, args)?;
                to_json(&self.investigations.query_one(stub, report_no)?)
            }
            "changeReportStatus" => {
                let [report_no, status] = expect_args::<2>(function, args)?;
                let status = InvestigationStatus::new(status.as_str());
                to_json(&self.investigations.set_status(stub, report_no, status)?)
            }
            _ => Err(ContractError::UnknownFunction {
                contract: self.name(),
                function: function.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MemoryLedger;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn submission(id: &str) -> Vec<String> {
        args(&[
            id,
            "http://mirror.example/t",
            "mirror",
            "T",
            "image",
            "A",
            "uploader",
            "a@example.com",
            "2024-01-02 03:04",
            "reupload",
            "93.10",
        ])
    }

    #[test]
    fn test_create_then_query() {
        let contract = AuthorityContract::default();
        let mut ledger = MemoryLedger::new();
        contract.invoke(&mut ledger, "createReport", &submission("010")).unwrap();

        let value = contract.invoke(&mut ledger, "queryReport", &args(&["010"])).unwrap();
        assert_eq!(value["id"], "report010");
        assert_eq!(value["title"], "T");
        assert_eq!(value["status"], "Pending");
    }

    #[test]
    fn test_change_status_takes_report_no() {
        let contract = AuthorityContract::default();
        let mut ledger = MemoryLedger::new();
        contract.invoke(&mut ledger, "createReport", &submission("010")).unwrap();
        contract
            .invoke(&mut ledger, "changeReportStatus", &args(&["010", "Investigating"]))
            .unwrap();

        let value = contract.invoke(&mut ledger, "queryAllReports", &[]).unwrap();
        assert_eq!(value[0]["Record"]["status"], "Investigating");
    }

    #[test]
    fn test_create_arity() {
        let contract = AuthorityContract::default();
        let mut ledger = MemoryLedger::new();
        let err = contract
            .invoke(&mut ledger, "createReport", &args(&["010"]))
            .unwrap_err();
        assert_eq!(err.code(), "RL_ARGUMENT_COUNT");
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_rights_holder_functions_are_unknown() {
        let contract = AuthorityContract::default();
        let mut ledger = MemoryLedger::new();
        let err = contract
            .invoke(&mut ledger, "registCopyright", &args(&["001", "T", "image", "A"]))
            .unwrap_err();
        assert_eq!(err.code(), "RL_UNKNOWN_FUNCTION");
    }
}

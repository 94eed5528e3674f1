//! Rights-holder contract
//!
//! Registers copyrights, files reports and records the reviewer's verdict.

use serde_json::Value;

use super::{expect_args, to_json, Contract, ContractError, ContractResult};
use crate::ledger::LedgerStub;
use crate::registry::{CopyrightRegistry, PiracyVerdict, RegistryOptions, ReportFiling, ReportRegistry};

const FUNCTIONS: &[&str] = &[
    "registCopyright",
    "queryAllCopyrights",
    "queryCopyrightsByAuthor",
    "queryCopyright",
    "createReport",
    "queryAllReports",
    "queryReport",
    "changeReportIsPirated",
    "queryReportsByCopyright",
];

/// Contract operated by the rights-holder organisation
#[derive(Debug, Clone, Copy, Default)]
pub struct RightsHolderContract {
    copyrights: CopyrightRegistry,
    reports: ReportRegistry,
}

impl RightsHolderContract {
    pub fn new(options: &RegistryOptions) -> Self {
        Self {
            copyrights: CopyrightRegistry::new(options),
            reports: ReportRegistry::new(options),
        }
    }

    pub fn copyrights(&self) -> &CopyrightRegistry {
        &self.copyrights
    }

    pub fn reports(&self) -> &ReportRegistry {
        &self.reports
    }
}

fn parse_verdict(raw: &str) -> ContractResult<PiracyVerdict> {
    raw.parse().map_err(ContractError::InvalidArgument)
}

impl Contract for RightsHolderContract {
    fn name(&self) -> &'static str {
        "rights_holder"
    }

    fn functions(&self) -> &'static [&'static str] {
        FUNCTIONS
    }

    fn invoke(&self, stub: &mut dyn LedgerStub, function: &str, args: &[String]) -> ContractResult<Value> {
        match function {
            "registCopyright" => {
                let [no, title, content_type, author] = expect_args::<4>(function, args)?;
                let copyright = self
                    .copyrights
                    .register(stub, no, title, content_type, author)?;
                to_json(&copyright)
            }
            "queryAllCopyrights" => {
                expect_args::<0>(function, args)?;
                to_json(&self.copyrights.query_all(stub)?)
            }
            "queryCopyrightsByAuthor" => {
                let [author] = expect_args::<1>(function, args)?;
                to_json(&self.copyrights.query_by_author(stub, author)?)
            }
            "queryCopyright" => {
                let [no] = expect_args::<1>(function, args)?;
                to_json(&self.copyrights.query_one(stub, no)?)
            }
            "createReport" => {
                let [no, url, site, copyright_no, pirate, email, date, form, similarity, is_pirated] =
                    expect_args::<10>(function, args)?;
                let filing = ReportFiling {
                    url: url.clone(),
                    site: site.clone(),
                    copyright_serial: copyright_no.clone(),
                    pirate: pirate.clone(),
                    reporter_email: email.clone(),
                    date: date.clone(),
                    form: form.clone(),
                    similarity: similarity.clone(),
                    is_pirated: parse_verdict(is_pirated)?,
                };
                to_json(&self.reports.create(stub, no, filing)?)
            }
            "queryAllReports" => {
                expect_args::<0>(function, args)?;
                to_json(&self.reports.query_all(stub)?)
            }
            "queryReport" => {
                let [no] = expect_args::<1>(function, args)?;
                to_json(&self.reports.query_one(stub, no)?)
            }
            "changeReportIsPirated" => {
                let [report_id, is_pirated] = expect_args::<2>(function, args)?;
                let verdict = parse_verdict(is_pirated)?;
                to_json(&self.reports.set_pirated(stub, report_id, verdict)?)
            }
            "queryReportsByCopyright" => {
                let [copyright_no] = expect_args::<1>(function, args)?;
                to_json(&self.reports.query_by_copyright(stub, copyright_no)?)
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
    use crate::contract::is_read_only;
    use crate::ledger::MemoryLedger;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn seeded() -> (RightsHolderContract, MemoryLedger) {
        let contract = RightsHolderContract::default();
        let mut ledger = MemoryLedger::new();
        contract
            .invoke(&mut ledger, "registCopyright", &args(&["001", "T", "image", "A"]))
            .unwrap();
        contract
            .invoke(
                &mut ledger,
                "createReport",
                &args(&[
                    "010",
                    "http://mirror.example/t",
                    "mirror",
                    "001",
                    "uploader",
                    "a@example.com",
                    "2024-01-02 03:04",
                    "reupload",
                    "93.10",
                    "Pending",
                ]),
            )
            .unwrap();
        (contract, ledger)
    }

    #[test]
    fn test_query_copyright() {
        let (contract, mut ledger) = seeded();
        let value = contract
            .invoke(&mut ledger, "queryCopyright", &args(&["001"]))
            .unwrap();
        assert_eq!(value["id"], "copyright001");
        assert_eq!(value["author"], "A");
    }

    #[test]
    fn test_query_all_returns_key_record_pairs() {
        let (contract, mut ledger) = seeded();
        let value = contract
            .invoke(&mut ledger, "queryAllCopyrights", &[])
            .unwrap();
        assert_eq!(value[0]["Key"], "copyright001");
        assert_eq!(value[0]["Record"]["title"], "T");
    }

    #[test]
    fn test_change_verdict_by_full_id() {
        let (contract, mut ledger) = seeded();
        contract
            .invoke(&mut ledger, "changeReportIsPirated", &args(&["report010", "true"]))
            .unwrap();
        let value = contract.invoke(&mut ledger, "queryReport", &args(&["010"])).unwrap();
        assert_eq!(value["isPirated"], "true");
    }

    #[test]
    fn test_unknown_verdict_is_invalid_argument() {
        let (contract, mut ledger) = seeded();
        let err = contract
            .invoke(&mut ledger, "changeReportIsPirated", &args(&["report010", "maybe"]))
            .unwrap_err();
        assert_eq!(err.code(), "RL_INVALID_ARGUMENT");
    }

    #[test]
    fn test_argument_count_checked() {
        let (contract, mut ledger) = seeded();
        let err = contract
            .invoke(&mut ledger, "queryCopyright", &[])
            .unwrap_err();
        assert_eq!(err.code(), "RL_ARGUMENT_COUNT");
    }

    #[test]
    fn test_unknown_function() {
        let (contract, mut ledger) = seeded();
        let err = contract
            .invoke(&mut ledger, "changeReportStatus", &args(&["010", "x"]))
            .unwrap_err();
        assert_eq!(err.code(), "RL_UNKNOWN_FUNCTION");
    }

    #[test]
    fn test_reports_by_copyright() {
        let (contract, mut ledger) = seeded();
        let value = contract
            .invoke(&mut ledger, "queryReportsByCopyright", &args(&["001"]))
            .unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(1));
        assert_eq!(value[0]["Key"], "report010");
    }

    #[test]
    fn test_query_functions_do_not_write() {
        let (contract, mut ledger) = seeded();
        let before = ledger.len();
        for function in contract.functions().iter().filter(|f| is_read_only(f)) {
            let arity = match *function {
                "queryAllCopyrights" | "queryAllReports" => 0,
                _ => 1,
            };
            let _ = contract.invoke(&mut ledger, function, &args(&["001"][..arity]));
        }
        assert_eq!(ledger.len(), before);
    }
}

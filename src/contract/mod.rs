//! Contract surface for rightsledger
//!
//! Function dispatch over positional string arguments, the way the ledger
//! host invokes chaincode. Results are returned as JSON values.
//!
//! # Invariants
//!
//! - Argument count is checked before any ledger access
//! - Functions named `query*` never write
//! - A failed invocation may leave writes in the stub; the caller discards them

mod authority;
mod errors;
mod rights_holder;

pub use authority::AuthorityContract;
pub use errors::{ContractError, ContractResult};
pub use rights_holder::RightsHolderContract;

use serde::Serialize;
use serde_json::Value;

use crate::ledger::LedgerStub;

/// A set of named ledger functions
pub trait Contract {
    /// Contract name, used in errors and logs
    fn name(&self) -> &'static str;

    /// Every function this contract dispatches
    fn functions(&self) -> &'static [&'static str];

    /// Run `function` with `args` against `stub`
    fn invoke(&self, stub: &mut dyn LedgerStub, function: &str, args: &[String]) -> ContractResult<Value>;
}

/// Returns true if `function` only reads
///
/// Matches the submit/evaluate split used by the client gateway: anything
/// whose name starts with `query` is evaluated.
pub fn is_read_only(function: &str) -> bool {
    function.starts_with("query")
}

/// Check the argument count and hand back the arguments as a fixed array
pub(crate) fn expect_args<'a, const N: usize>(function: &str, args: &'a [String]) -> ContractResult<&'a [String; N]> {
    args.try_into().map_err(|_| ContractError::ArgumentCount {
        function: function.to_string(),
        expected: N,
        actual: args.len(),
    })
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> ContractResult<Value> {
    Ok(serde_json::to_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_only_split() {
        assert!(is_read_only("queryAllReports"));
        assert!(is_read_only("queryCopyright"));
        assert!(!is_read_only("createReport"));
        assert!(!is_read_only("changeReportStatus"));
    }

    #[test]
    fn test_expect_args() {
        let args = vec!["a".to_string()];
        let [only] = expect_args::<1>("f", &args).unwrap();
        assert_eq!(only, "a");
        match expect_args::<2>("f", &args) {
            Err(ContractError::ArgumentCount { expected, actual, .. }) => {
                assert_eq!((expected, actual), (2, 1));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}

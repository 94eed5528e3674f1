//! Selector evaluation for the in-memory host
//!
//! Accepts `{"selector": {field: value, ...}}` where each value is either a
//! literal or `{"$eq": literal}`. All clauses must match (AND semantics).
//! No type coercion: `"123"` does not match `123`.

use serde_json::{Map, Value};

use super::errors::{LedgerError, LedgerResult};

/// A parsed equality selector
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorFilter {
    clauses: Vec<(String, Value)>,
}

impl SelectorFilter {
    /// Parse a rich-query string
    pub fn parse(query: &str) -> LedgerResult<Self> {
        let parsed: Value = serde_json::from_str(query)
            .map_err(|e| LedgerError::InvalidQuery(format!("query is not JSON: {}", e)))?;

        let selector = parsed
            .get("selector")
            .and_then(Value::as_object)
            .ok_or_else(|| LedgerError::InvalidQuery("missing selector object".to_string()))?;

        Self::from_selector(selector)
    }

    fn from_selector(selector: &Map<String, Value>) -> LedgerResult<Self> {
        let mut clauses = Vec::with_capacity(selector.len());

        for (field, condition) in selector {
            let expected = match condition {
                Value::Object(ops) => match (ops.len(), ops.get("$eq")) {
                    (1, Some(v)) => v.clone(),
                    _ => {
                        return Err(LedgerError::InvalidQuery(format!(
                            "unsupported operator on field {:?}",
                            field
                        )))
                    }
                },
                literal => literal.clone(),
            };
            clauses.push((field.clone(), expected));
        }

        Ok(Self { clauses })
    }

    /// Checks if a document matches every clause
    pub fn matches(&self, document: &Value) -> bool {
        self.clauses
            .iter()
            .all(|(field, expected)| Self::matches_clause(document, field, expected))
    }

    fn matches_clause(document: &Value, field: &str, expected: &Value) -> bool {
        let actual = match document.get(field) {
            Some(v) => v,
            None => return false, // Missing field = no match
        };

        // Null values never match
        if actual.is_null() {
            return false;
        }

        actual == expected
    }

    /// Number of clauses in the selector
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Returns true if the selector has no clauses (matches every document)
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

//! Secondary index definitions
//!
//! An index name lists its components separated by `~`; the last component
//! is always the primary key of the indexed document. `author~id` has arity 2.

use std::fmt;

use crate::store::{StoreError, StoreResult};

/// Copyrights by author
pub const AUTHOR_ID: IndexSpec = IndexSpec::well_known("author~id", 2);

/// Reports by referenced copyright
pub const COPYRIGHT_ID: IndexSpec = IndexSpec::well_known("copyrightid~id", 2);

/// A named composite-key index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSpec {
    name: &'static str,
    arity: usize,
}

impl IndexSpec {
    const fn well_known(name: &'static str, arity: usize) -> Self {
        Self { name, arity }
    }

    /// Parse an index name such as `author~id`
    pub fn parse(name: &'static str) -> StoreResult<Self> {
        let parts: Vec<&str> = name.split('~').collect();
        if parts.len() < 2 || parts.iter().any(|p| p.is_empty()) {
            return Err(StoreError::invalid_key(format!(
                "index name {:?} must name at least two non-empty components",
                name
            )));
        }
        Ok(Self {
            name,
            arity: parts.len(),
        })
    }

    /// Index name, used as the composite key object type
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of components in a full entry
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Check a full component list
    pub fn check_entry(&self, components: &[&str]) -> StoreResult<()> {
        if components.len() != self.arity {
            return Err(StoreError::invalid_key(format!(
                "index {} takes {} components, got {}",
                self.name,
                self.arity,
                components.len()
            )));
        }
        Ok(())
    }

    /// Check a leading subset of components used for a scan
    pub fn check_prefix(&self, components: &[&str]) -> StoreResult<()> {
        if components.len() >= self.arity {
            return Err(StoreError::invalid_key(format!(
                "index {} scan takes fewer than {} components, got {}",
                self.name,
                self.arity,
                components.len()
            )));
        }
        Ok(())
    }
}

impl fmt::Display for IndexSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_matches_well_known() {
        assert_eq!(IndexSpec::parse("author~id").unwrap(), AUTHOR_ID);
        assert_eq!(IndexSpec::parse("copyrightid~id").unwrap(), COPYRIGHT_ID);
        assert_eq!(IndexSpec::parse("site~date~id").unwrap().arity(), 3);
    }

    #[test]
    fn test_parse_rejects_degenerate_names() {
        assert!(IndexSpec::parse("author").is_err());
        assert!(IndexSpec::parse("author~").is_err());
        assert!(IndexSpec::parse("~id").is_err());
    }

    #[test]
    fn test_component_counts() {
        assert!(AUTHOR_ID.check_entry(&["A", "copyright001"]).is_ok());
        assert!(AUTHOR_ID.check_entry(&["A"]).is_err());
        assert!(AUTHOR_ID.check_prefix(&["A"]).is_ok());
        assert!(AUTHOR_ID.check_prefix(&[]).is_ok());
        assert!(AUTHOR_ID.check_prefix(&["A", "copyright001"]).is_err());
    }
}

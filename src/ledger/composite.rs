//! Composite key encoding
//!
//! Layout:
//!
//! ```text
//! \0 objectType \0 attr1 \0 attr2 \0 ... attrN \0
//! ```
//!
//! Every component is terminated by U+0000 and no component may contain
//! U+0000, so the encoding is injective and a partial key (object type plus a
//! leading subset of attributes) is a strict string prefix of every full key
//! that extends it. Primary keys never start with U+0000, which keeps the two
//! key spaces disjoint.

use super::errors::{LedgerError, LedgerResult};

/// Namespace marker that starts every composite key
pub const COMPOSITE_KEY_NAMESPACE: char = '\u{0}';

const MIN_UNICODE_RUNE: char = '\u{0}';

/// Encode an object type and ordered attributes into a composite key
pub fn encode(object_type: &str, attributes: &[&str]) -> LedgerResult<String> {
    validate_component(object_type, "object type")?;
    if object_type.is_empty() {
        return Err(LedgerError::InvalidKey(
            "composite key object type must not be empty".to_string(),
        ));
    }

    let mut key = String::with_capacity(
        2 + object_type.len() + attributes.iter().map(|a| a.len() + 1).sum::<usize>(),
    );
    key.push(COMPOSITE_KEY_NAMESPACE);
    key.push_str(object_type);
    key.push(MIN_UNICODE_RUNE);

    for attribute in attributes {
        validate_component(attribute, "attribute")?;
        key.push_str(attribute);
        key.push(MIN_UNICODE_RUNE);
    }

    Ok(key)
}

/// Split a composite key back into its object type and attributes
pub fn decode(key: &str) -> LedgerResult<(String, Vec<String>)> {
    let body = key
        .strip_prefix(COMPOSITE_KEY_NAMESPACE)
        .ok_or_else(|| LedgerError::InvalidKey(format!("not a composite key: {:?}", key)))?;
    let body = body
        .strip_suffix(MIN_UNICODE_RUNE)
        .ok_or_else(|| LedgerError::InvalidKey(format!("unterminated composite key: {:?}", key)))?;

    let mut parts = body.split(MIN_UNICODE_RUNE).map(str::to_string);
    let object_type = parts
        .next()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| LedgerError::InvalidKey(format!("missing object type: {:?}", key)))?;

    Ok((object_type, parts.collect()))
}

/// Returns true if `key` lives in the composite-key namespace
pub fn is_composite(key: &str) -> bool {
    key.starts_with(COMPOSITE_KEY_NAMESPACE)
}

fn validate_component(component: &str, what: &str) -> LedgerResult<()> {
    if component.contains(MIN_UNICODE_RUNE) {
        return Err(LedgerError::InvalidKey(format!(
            "{} {:?} contains U+0000",
            what, component
        )));
    }
    Ok(())
}

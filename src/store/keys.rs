//! Primary key construction
//!
//! Keys are a literal type tag followed directly by the caller's serial, with
//! no separator: `copyright` + `001` = `copyright001`.

use super::errors::{StoreError, StoreResult};

/// Type tag and discriminator for copyright documents
pub const COPYRIGHT_TAG: &str = "copyright";

/// Type tag and discriminator for report documents
pub const REPORT_TAG: &str = "report";

/// Build `tag + serial`
///
/// The serial must be non-empty and free of U+0000 so a primary key can never
/// land in the composite-key namespace.
pub fn primary_key(tag: &str, serial: &str) -> StoreResult<String> {
    validate_id("serial", serial)?;
    Ok(format!("{}{}", tag, serial))
}

/// `copyright` + serial
pub fn copyright_key(serial: &str) -> StoreResult<String> {
    primary_key(COPYRIGHT_TAG, serial)
}

/// `report` + serial
pub fn report_key(serial: &str) -> StoreResult<String> {
    primary_key(REPORT_TAG, serial)
}

/// Check a caller-supplied serial or full document id
///
/// Empty ids and ids containing U+0000 are `RL_INVALID_KEY`.
pub fn validate_id(what: &str, id: &str) -> StoreResult<()> {
    if id.is_empty() {
        return Err(StoreError::invalid_key(format!("{} must not be empty", what)));
    }
    if id.contains('\u{0}') {
        return Err(StoreError::invalid_key(format!(
            "{} {:?} contains U+0000",
            what, id
        )));
    }
    Ok(())
}

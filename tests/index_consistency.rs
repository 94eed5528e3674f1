//! Index Consistency Tests
//!
//! Tests for composite-key index invariants:
//! - Key derivation is deterministic and collision-free
//! - Every indexed document has exactly one entry
//! - Index entries never appear in rich-query results
//! - Stale entries are tolerated by index reads

use std::collections::HashSet;

use rightsledger::index::{CompositeKeyIndexer, IndexScan, IndexSpec, AUTHOR_ID, COPYRIGHT_ID, INDEX_MARKER};
use rightsledger::ledger::{is_composite, LedgerStub, MemoryLedger};
use rightsledger::registry::{CopyrightRegistry, PiracyVerdict, ReportFiling, ReportRegistry};

// =============================================================================
// Helper Functions
// =============================================================================

fn filing(copyright_serial: &str) -> ReportFiling {
    ReportFiling {
        copyright_serial: copyright_serial.to_string(),
        is_pirated: PiracyVerdict::Pending,
        ..ReportFiling::default()
    }
}

fn index_entries(ledger: &MemoryLedger) -> Vec<String> {
    ledger
        .keys()
        .filter(|k| is_composite(k))
        .map(str::to_string)
        .collect()
}

// =============================================================================
// Key Derivation
// =============================================================================

/// Same (index, components) always yields the same key.
#[test]
fn test_key_derivation_deterministic() {
    let ledger = MemoryLedger::new();
    let first = CompositeKeyIndexer::make_composite_key(&ledger, &AUTHOR_ID, &["A", "copyright001"]).unwrap();
    for _ in 0..100 {
        let again = CompositeKeyIndexer::make_composite_key(&ledger, &AUTHOR_ID, &["A", "copyright001"]).unwrap();
        assert_eq!(again, first);
    }
}

/// Distinct pairs never collide, including concatenation-ambiguous ones.
#[test]
fn test_key_derivation_collision_free() {
    let ledger = MemoryLedger::new();
    let cases: &[(&IndexSpec, [&str; 2])] = &[
        (&AUTHOR_ID, ["ab", "c"]),
        (&AUTHOR_ID, ["a", "bc"]),
        (&AUTHOR_ID, ["", "abc"]),
        (&AUTHOR_ID, ["abc", ""]),
        (&COPYRIGHT_ID, ["ab", "c"]),
        (&COPYRIGHT_ID, ["a", "bc"]),
    ];

    let mut seen = HashSet::new();
    for (index, components) in cases {
        let key = CompositeKeyIndexer::make_composite_key(&ledger, index, components).unwrap();
        assert!(seen.insert(key), "collision for {} {:?}", index, components);
    }
}

/// Composite keys can be split back into their parts.
#[test]
fn test_key_splits_back() {
    let ledger = MemoryLedger::new();
    let key = CompositeKeyIndexer::make_composite_key(&ledger, &COPYRIGHT_ID, &["copyright001", "report010"]).unwrap();
    let (object_type, components) = ledger.split_composite_key(&key).unwrap();
    assert_eq!(object_type, "copyrightid~id");
    assert_eq!(components, vec!["copyright001", "report010"]);
}

// =============================================================================
// One Entry Per Document
// =============================================================================

/// Every registration writes exactly one marker entry.
#[test]
fn test_one_entry_per_document() {
    let mut ledger = MemoryLedger::new();
    let copyrights = CopyrightRegistry::default();
    let reports = ReportRegistry::default();

    for i in 0..10 {
        let serial = format!("{:03}", i);
        copyrights
            .register(&mut ledger, &serial, "t", "text", if i % 2 == 0 { "even" } else { "odd" })
            .unwrap();
        reports.create(&mut ledger, &format!("1{:02}", i), filing(&serial)).unwrap();
    }

    let entries = index_entries(&ledger);
    assert_eq!(entries.len(), 20);
    for entry in &entries {
        assert_eq!(ledger.raw(entry), Some(&INDEX_MARKER[..]));
    }
    assert_eq!(ledger.len(), 40);
}

/// Re-registering the same document does not duplicate its entry.
#[test]
fn test_reregistration_no_duplicate_entry() {
    let mut ledger = MemoryLedger::new();
    let registry = CopyrightRegistry::default();
    registry.register(&mut ledger, "001", "T", "image", "A").unwrap();
    registry.register(&mut ledger, "001", "T2", "image", "A").unwrap();

    assert_eq!(index_entries(&ledger).len(), 1);
    assert_eq!(registry.query_one(&ledger, "001").unwrap().title, "T2");
}

// =============================================================================
// Separation From Rich Queries
// =============================================================================

/// Marker records never surface in selector results.
#[test]
fn test_entries_invisible_to_rich_query() {
    let mut ledger = MemoryLedger::new();
    let registry = CopyrightRegistry::default();
    registry.register(&mut ledger, "001", "T", "image", "A").unwrap();

    let records = registry.query_all(&ledger).unwrap();
    assert_eq!(records.len(), 1);
    assert!(!is_composite(&records[0].key));
}

// =============================================================================
// Stale Entries
// =============================================================================

/// Changing a copyright's author leaves the old entry, which reads ignore.
#[test]
fn test_stale_entry_tolerated() {
    let mut ledger = MemoryLedger::new();
    let registry = CopyrightRegistry::default();
    registry.register(&mut ledger, "001", "T", "image", "A").unwrap();
    registry.register(&mut ledger, "001", "T", "image", "B").unwrap();

    // Both entries exist
    assert_eq!(IndexScan::primary_keys(&ledger, &AUTHOR_ID, &["A"]).unwrap(), vec!["copyright001"]);
    assert_eq!(IndexScan::primary_keys(&ledger, &AUTHOR_ID, &["B"]).unwrap(), vec!["copyright001"]);

    // Only the current one resolves
    assert!(registry.query_by_author_index(&ledger, "A").unwrap().is_empty());
    assert_eq!(registry.query_by_author_index(&ledger, "B").unwrap().len(), 1);
}

/// An entry whose document never landed is skipped.
#[test]
fn test_dangling_entry_skipped() {
    let mut ledger = MemoryLedger::new();
    CompositeKeyIndexer::register_index_entry(&mut ledger, &COPYRIGHT_ID, &["copyright001", "report404"]).unwrap();
    ReportRegistry::default().create(&mut ledger, "010", filing("001")).unwrap();

    let reports = ReportRegistry::default().query_by_copyright(&ledger, "001").unwrap();
    let keys: Vec<&str> = reports.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["report010"]);
    assert_eq!(ledger.open_cursors(), 0);
}

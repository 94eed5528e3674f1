//! Checksummed ledger snapshots
//!
//! Snapshot file format:
//!
//! ```text
//! +------------------+
//! | Magic "RLSN"     | (4 bytes)
//! +------------------+
//! | Format Version   | (u8)
//! +------------------+
//! | Entry Count      | (u32 LE)
//! +------------------+
//! | Key Length       | (u32 LE)   \
//! | Key              | (UTF-8)     | repeated Entry Count times,
//! | Value Length     | (u32 LE)    | in key order
//! | Value            | (bytes)    /
//! +------------------+
//! | Checksum         | (u32 LE)
//! +------------------+
//! ```
//!
//! Checksum covers all bytes except the checksum itself. Snapshots are written
//! to a sibling temp file, synced, then renamed over the target.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use super::checksum::{compute_checksum, verify_checksum};
use super::errors::{LedgerError, LedgerResult};
use super::memory::MemoryLedger;
use crate::observability::{log_event_with_fields, Event};

const MAGIC: &[u8; 4] = b"RLSN";
const FORMAT_VERSION: u8 = 1;
const HEADER_LEN: usize = 4 + 1 + 4;
const CHECKSUM_LEN: usize = 4;

impl MemoryLedger {
    /// Load a snapshot. A missing file yields an empty ledger.
    pub fn load(path: &Path) -> LedgerResult<Self> {
        let bytes = match fs::read(path) {
            Ok(b) => b,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => return Err(e.into()),
        };

        let state = decode_snapshot(&bytes)?;
        log_event_with_fields(
            Event::SnapshotLoaded,
            &[
                ("entries", &state.len().to_string()),
                ("path", &path.display().to_string()),
            ],
        );
        Ok(Self::from_state(state))
    }

    /// Write the committed state to `path`
    pub fn save(&self, path: &Path) -> LedgerResult<()> {
        let bytes = encode_snapshot(self.state())?;

        let tmp_path = path.with_extension("tmp");
        {
            let mut file = File::create(&tmp_path)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
        }
        if let Err(e) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        log_event_with_fields(
            Event::SnapshotSaved,
            &[
                ("entries", &self.len().to_string()),
                ("path", &path.display().to_string()),
            ],
        );
        Ok(())
    }
}

fn encode_snapshot(state: &BTreeMap<String, Vec<u8>>) -> LedgerResult<Vec<u8>> {
    let mut out = Vec::with_capacity(HEADER_LEN + CHECKSUM_LEN);
    out.extend_from_slice(MAGIC);
    out.push(FORMAT_VERSION);
    out.extend_from_slice(&length_prefix(state.len())?);

    for (key, value) in state {
        out.extend_from_slice(&length_prefix(key.len())?);
        out.extend_from_slice(key.as_bytes());
        out.extend_from_slice(&length_prefix(value.len())?);
        out.extend_from_slice(value);
    }

    let checksum = compute_checksum(&out);
    out.extend_from_slice(&checksum.to_le_bytes());
    Ok(out)
}

fn decode_snapshot(bytes: &[u8]) -> LedgerResult<BTreeMap<String, Vec<u8>>> {
    if bytes.len() < HEADER_LEN + CHECKSUM_LEN {
        return Err(corrupt("file shorter than header"));
    }

    let (body, checksum_bytes) = bytes.split_at(bytes.len() - CHECKSUM_LEN);
    let expected = u32::from_le_bytes([
        checksum_bytes[0],
        checksum_bytes[1],
        checksum_bytes[2],
        checksum_bytes[3],
    ]);
    if !verify_checksum(body, expected) {
        return Err(corrupt("checksum mismatch"));
    }

    if &body[..4] != MAGIC {
        return Err(corrupt("bad magic"));
    }
    if body[4] != FORMAT_VERSION {
        return Err(corrupt(&format!("unsupported format version {}", body[4])));
    }

    let mut reader = Reader {
        bytes: body,
        pos: 5,
    };
    let count = reader.read_u32()? as usize;

    let mut state = BTreeMap::new();
    for _ in 0..count {
        let key_len = reader.read_u32()? as usize;
        let key = String::from_utf8(reader.take(key_len)?.to_vec())
            .map_err(|_| corrupt("key is not UTF-8"))?;
        let value_len = reader.read_u32()? as usize;
        let value = reader.take(value_len)?.to_vec();
        state.insert(key, value);
    }

    if reader.pos != body.len() {
        return Err(corrupt("trailing bytes after last entry"));
    }
    Ok(state)
}

fn length_prefix(len: usize) -> LedgerResult<[u8; 4]> {
    u32::try_from(len)
        .map(u32::to_le_bytes)
        .map_err(|_| corrupt("entry exceeds u32 length"))
}

fn corrupt(reason: &str) -> LedgerError {
    LedgerError::CorruptSnapshot(reason.to_string())
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, len: usize) -> LedgerResult<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| corrupt("truncated entry"))?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn read_u32(&mut self) -> LedgerResult<u32> {
        let raw = self.take(4)?;
        Ok(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> BTreeMap<String, Vec<u8>> {
        let mut state = BTreeMap::new();
        state.insert(
            "copyright001".to_string(),
            br#"{"docType":"copyright","id":"copyright001"}"#.to_vec(),
        );
        state.insert("\u{0}author~id\u{0}A\u{0}copyright001\u{0}".to_string(), vec![0x00]);
        state.insert("empty".to_string(), Vec::new());
        state
    }

    #[test]
    fn test_encode_decode_preserves_state() {
        let state = sample_state();
        let bytes = encode_snapshot(&state).unwrap();
        assert_eq!(&bytes[..4], MAGIC);
        assert_eq!(decode_snapshot(&bytes).unwrap(), state);
    }

    #[test]
    fn test_flipped_byte_is_detected() {
        let mut bytes = encode_snapshot(&sample_state()).unwrap();
        let mid = bytes.len() / 2;
        bytes[mid] ^= 0x40;
        assert!(matches!(
            decode_snapshot(&bytes),
            Err(LedgerError::CorruptSnapshot(_))
        ));
    }

    #[test]
    fn test_truncated_file_is_detected() {
        let bytes = encode_snapshot(&sample_state()).unwrap();
        assert!(decode_snapshot(&bytes[..bytes.len() - 7]).is_err());
        assert!(decode_snapshot(&bytes[..3]).is_err());
    }

    #[test]
    fn test_bad_magic_with_valid_checksum() {
        let mut body = b"XXXX".to_vec();
        body.push(FORMAT_VERSION);
        body.extend_from_slice(&0u32.to_le_bytes());
        let checksum = compute_checksum(&body);
        body.extend_from_slice(&checksum.to_le_bytes());

        let err = decode_snapshot(&body).unwrap_err();
        assert!(err.to_string().contains("bad magic"));
    }
}

//! Append-only record stores.
//!
//! A store is a sequence of lines, each holding two fields separated by
//! [`DELIMITER`]. Lines without a delimiter are not records and are skipped
//! when reading.

use std::collections::HashMap;
use std::error::Error;
use std::fmt::Display;

pub const DELIMITER: char = ',';

/// The two record collections of an election.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum StoreKind {
    /// Lines of `id,name`.
    Candidates,
    /// Lines of `voterId,candidateId`.
    Votes,
}

impl StoreKind {
    pub const ALL: [StoreKind; 2] = [StoreKind::Candidates, StoreKind::Votes];

    /// Name of the file backing this store.
    pub fn file_name(&self) -> &'static str {
        match self {
            StoreKind::Candidates => "candidates.csv",
            StoreKind::Votes => "votes.csv",
        }
    }
}

/// One line of a store, split at its first delimiter.
///
/// The value keeps any further delimiter verbatim.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RawRecord {
    pub key: String,
    pub value: String,
}

impl RawRecord {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> RawRecord {
        RawRecord {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Splits a line at its first delimiter. Returns None for a line that
    /// carries no delimiter.
    pub fn parse_line(line: &str) -> Option<RawRecord> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        line.split_once(DELIMITER)
            .map(|(key, value)| RawRecord::new(key, value))
    }

    pub fn to_line(&self) -> String {
        format!("{}{}{}", self.key, DELIMITER, self.value)
    }
}

#[derive(Debug, Clone)]
pub struct StoreError {
    pub kind: StoreKind,
    pub message: String,
}

impl StoreError {
    pub fn new(kind: StoreKind, message: impl Into<String>) -> StoreError {
        StoreError {
            kind,
            message: message.into(),
        }
    }
}

impl Error for StoreError {}

impl Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind.file_name(), self.message)
    }
}

/// Access to the record collections.
///
/// An absent collection reads as empty. Clearing an absent collection is not
/// an error.
pub trait RecordStore {
    fn read_all(&self, kind: StoreKind) -> Result<Vec<RawRecord>, StoreError>;

    fn append(&mut self, kind: StoreKind, record: &RawRecord) -> Result<(), StoreError>;

    fn clear(&mut self, kind: StoreKind) -> Result<(), StoreError>;
}

/// A store that keeps its lines in memory.
///
/// Lines are kept raw so that malformed content can be injected with
/// [`MemoryStore::push_line`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    lines: HashMap<StoreKind, Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    pub fn push_line(&mut self, kind: StoreKind, line: &str) {
        self.lines.entry(kind).or_default().push(line.to_string());
    }

    pub fn lines(&self, kind: StoreKind) -> &[String] {
        self.lines.get(&kind).map(|v| v.as_slice()).unwrap_or(&[])
    }
}

impl RecordStore for MemoryStore {
    fn read_all(&self, kind: StoreKind) -> Result<Vec<RawRecord>, StoreError> {
        Ok(self
            .lines(kind)
            .iter()
            .filter_map(|l| RawRecord::parse_line(l))
            .collect())
    }

    fn append(&mut self, kind: StoreKind, record: &RawRecord) -> Result<(), StoreError> {
        self.push_line(kind, &record.to_line());
        Ok(())
    }

    fn clear(&mut self, kind: StoreKind) -> Result<(), StoreError> {
        self.lines.remove(&kind);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_line_splits_at_first_delimiter() {
        assert_eq!(
            RawRecord::parse_line("3,Ann,Lee"),
            Some(RawRecord::new("3", "Ann,Lee"))
        );
        assert_eq!(RawRecord::parse_line("4,"), Some(RawRecord::new("4", "")));
        assert_eq!(RawRecord::parse_line("12,7\r"), Some(RawRecord::new("12", "7")));
        assert_eq!(RawRecord::parse_line("no delimiter"), None);
        assert_eq!(RawRecord::parse_line(""), None);
    }

    #[test]
    fn memory_store_skips_malformed_lines() {
        let mut store = MemoryStore::new();
        store.push_line(StoreKind::Votes, "1,2");
        store.push_line(StoreKind::Votes, "garbage");
        store
            .append(StoreKind::Votes, &RawRecord::new("3", "4"))
            .unwrap();
        let records = store.read_all(StoreKind::Votes).unwrap();
        assert_eq!(
            records,
            vec![RawRecord::new("1", "2"), RawRecord::new("3", "4")]
        );
        assert!(store.read_all(StoreKind::Candidates).unwrap().is_empty());
    }

    #[test]
    fn memory_store_clear_is_idempotent() {
        let mut store = MemoryStore::new();
        store.push_line(StoreKind::Candidates, "1,Alice");
        store.clear(StoreKind::Candidates).unwrap();
        store.clear(StoreKind::Candidates).unwrap();
        assert!(store.lines(StoreKind::Candidates).is_empty());
    }
}

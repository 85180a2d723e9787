use crate::crawler::util::write_atomic;
use crate::error::CrawlError;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Lookup result for a challenge that has never been synchronized.
pub const UNSEEN_SUBMISSION: i64 = -1;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredId {
    Text(String),
    Number(i64),
}

/// Per-challenge high-water marks: the greatest submission id already
/// synchronized for each challenge id.
///
/// The whole file is loaded at construction and rewritten on every `put`.
#[derive(Debug)]
pub struct MetadataStore {
    path: Option<PathBuf>,
    marks: BTreeMap<String, i64>,
}

impl MetadataStore {
    pub fn open(path: &Path) -> Result<Self> {
        let marks = if path.exists() {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            parse_marks(path, &raw)?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path: Some(path.to_path_buf()),
            marks,
        })
    }

    pub fn in_memory() -> Self {
        Self {
            path: None,
            marks: BTreeMap::new(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// High-water mark for `challenge_id`, or [`UNSEEN_SUBMISSION`].
    ///
    /// Unknown ids get the sentinel inserted in memory; sentinels are never persisted.
    pub fn get(&mut self, challenge_id: i64) -> i64 {
        *self
            .marks
            .entry(challenge_id.to_string())
            .or_insert(UNSEEN_SUBMISSION)
    }

    /// Record `submission_id` for `challenge_id` and flush the store before returning.
    ///
    /// A lower id than the one already recorded leaves the mark unchanged.
    pub fn put(&mut self, challenge_id: i64, submission_id: i64) -> Result<()> {
        let mark = self
            .marks
            .entry(challenge_id.to_string())
            .or_insert(UNSEEN_SUBMISSION);
        *mark = (*mark).max(submission_id);
        self.save()
    }

    /// Number of challenges with a real (non-sentinel) mark.
    pub fn tracked(&self) -> usize {
        self.marks
            .values()
            .filter(|id| **id != UNSEEN_SUBMISSION)
            .count()
    }

    fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let persisted: BTreeMap<&str, String> = self
            .marks
            .iter()
            .filter(|(_, id)| **id != UNSEEN_SUBMISSION)
            .map(|(challenge, id)| (challenge.as_str(), id.to_string()))
            .collect();
        let data = serde_json::to_string_pretty(&persisted)?;
        write_atomic(path, &format!("{data}\n"))
    }
}

fn parse_marks(path: &Path, raw: &str) -> Result<BTreeMap<String, i64>> {
    let parsed: BTreeMap<String, StoredId> = serde_json::from_str(raw)
        .map_err(|err| CrawlError::StateCorrupt(format!("{}: {err}", path.display())))?;

    let mut marks = BTreeMap::new();
    for (challenge, stored) in parsed {
        let id = match stored {
            StoredId::Number(id) => id,
            StoredId::Text(text) => text.trim().parse::<i64>().map_err(|_| {
                CrawlError::StateCorrupt(format!(
                    "{}: submission id `{text}` for challenge {challenge} is not an integer",
                    path.display()
                ))
            })?,
        };
        marks.insert(challenge, id);
    }
    Ok(marks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CrawlErrorCode, error_code_of};
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_an_empty_store() {
        let tmp = tempdir().expect("tempdir");
        let mut store = MetadataStore::open(&tmp.path().join("metadata.json")).expect("open");
        assert_eq!(store.get(42), UNSEEN_SUBMISSION);
        assert_eq!(store.tracked(), 0);
    }

    #[test]
    fn put_persists_immediately_and_reloads() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("metadata.json");

        let mut store = MetadataStore::open(&path).expect("open");
        store.get(7);
        store.put(42, 101).expect("put");

        let raw = fs::read_to_string(&path).expect("read");
        let json: serde_json::Value = serde_json::from_str(&raw).expect("json");
        assert_eq!(json["42"], "101");
        assert!(json.get("7").is_none(), "sentinels are not persisted");

        let mut reopened = MetadataStore::open(&path).expect("reopen");
        assert_eq!(reopened.get(42), 101);
        assert_eq!(reopened.tracked(), 1);
    }

    #[test]
    fn marks_never_decrease() {
        let mut store = MetadataStore::in_memory();
        for id in [5, 9, 3, 9, 12, 1] {
            let before = store.get(1);
            store.put(1, id).expect("put");
            assert!(store.get(1) >= before);
        }
        assert_eq!(store.get(1), 12);
    }

    #[test]
    fn accepts_integer_values_from_older_files() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("metadata.json");
        fs::write(&path, r#"{"1": "10", "2": -1, "3": 30}"#).expect("write");

        let mut store = MetadataStore::open(&path).expect("open");
        assert_eq!(store.get(1), 10);
        assert_eq!(store.get(2), UNSEEN_SUBMISSION);
        assert_eq!(store.get(3), 30);
    }

    #[test]
    fn malformed_file_is_fatal() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("metadata.json");

        fs::write(&path, "{not json").expect("write");
        let err = MetadataStore::open(&path).unwrap_err();
        assert_eq!(error_code_of(&err), Some(CrawlErrorCode::E004StateCorrupt));

        fs::write(&path, r#"{"1": "abc"}"#).expect("write");
        let err = MetadataStore::open(&path).unwrap_err();
        assert_eq!(error_code_of(&err), Some(CrawlErrorCode::E004StateCorrupt));

        fs::write(&path, r#"["1", "2"]"#).expect("write");
        assert!(MetadataStore::open(&path).is_err());
    }
}

//! The script corpus and the placeholder image pool.
//!
//! A corpus file is a JSON object mapping arbitrary keys to script entries:
//!
//! ```text
//! {
//!   "note-001": { "title": ..., "body": ..., "tags": [...], "strategy": {...} },
//!   ...
//! }
//! ```
//!
//! Object order is the corpus order. Keys only identify entries in errors.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::model::ScriptEntry;

/// The corpus embedded in the binary, used when none is configured.
const BUILTIN_CORPUS: &str = include_str!("../assets/corpus.json");

/// Errors that can occur while loading a corpus or building an image pool.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("failed to read corpus {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("corpus is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corpus must be a JSON object of key → entry")]
    NotAnObject,

    #[error("invalid corpus entry '{key}': {source}")]
    InvalidEntry {
        key: String,
        source: serde_json::Error,
    },

    #[error("image pool must contain at least one image")]
    EmptyImagePool,
}

pub type Result<T> = core::result::Result<T, CorpusError>;

/// Read-only, ordered collection of script entries.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    entries: Vec<ScriptEntry>,
}

impl Corpus {
    /// Builds a corpus from entries already in memory.
    #[cfg(test)]
    pub fn from_entries(entries: Vec<ScriptEntry>) -> Self {
        Self { entries }
    }

    /// The corpus shipped with the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CORPUS)
    }

    /// Loads a corpus file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| CorpusError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let corpus = Self::from_json(&json)?;
        debug!(path = %path.display(), entries = corpus.len(), "loaded corpus");
        Ok(corpus)
    }

    /// Parses a corpus from its JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let Value::Object(map) = serde_json::from_str::<Value>(json)? else {
            return Err(CorpusError::NotAnObject);
        };
        Self::from_map(map)
    }

    fn from_map(map: Map<String, Value>) -> Result<Self> {
        let entries = map
            .into_iter()
            .map(|(key, value)| {
                serde_json::from_value(value)
                    .map_err(|source| CorpusError::InvalidEntry { key, source })
            })
            .collect::<Result<Vec<ScriptEntry>>>()?;
        let corpus = Self { entries };
        if corpus.is_empty() {
            warn!("corpus has no entries");
        }
        Ok(corpus)
    }

    pub fn entries(&self) -> &[ScriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A fixed, finite, pre-numbered set of placeholder image locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePool {
    refs: Vec<String>,
}

impl ImagePool {
    /// Pool of `/1.png` through `/<size>.png`.
    pub fn numbered(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(CorpusError::EmptyImagePool);
        }
        Ok(Self {
            refs: (1..=size).map(|n| format!("/{n}.png")).collect(),
        })
    }

    /// The same pool, starting `offset` places further along.
    pub fn rotated(&self, offset: usize) -> Self {
        let mut refs = self.refs.clone();
        let len = refs.len();
        refs.rotate_left(offset % len);
        Self { refs }
    }

    /// Image for the candidate at 0-based `position`.
    pub fn image_for(&self, position: usize) -> &str {
        &self.refs[position % self.refs.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    use crate::model::{Goal, Style, Viewpoint};

    #[test]
    fn builtin_corpus_loads() {
        let corpus = Corpus::builtin().unwrap();
        assert_eq!(corpus.len(), 24);
        assert_eq!(
            corpus.entries()[0].title,
            "Golden hour at the lakeside campsite"
        );
        assert!(corpus.entries().iter().any(|e| e.strategy.is_none()));
    }

    #[test]
    fn preserves_object_order() {
        let corpus = Corpus::from_json(
            r#"{
                "zeta": {"title": "first", "body": "a"},
                "alpha": {"title": "second", "body": "b"},
                "mid": {"title": "third", "body": "c"}
            }"#,
        )
        .unwrap();
        let titles: Vec<&str> = corpus.entries().iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[test]
    fn accepts_legacy_entry_shape() {
        let corpus = Corpus::from_json(
            r#"{
                "1": {
                    "title": "Lakeside",
                    "content": "Bring a jacket.",
                    "tags": ["lake", "lake"],
                    "strategy": {"style": "创新型", "view": "社交达人", "target": "深度种草"}
                }
            }"#,
        )
        .unwrap();
        let entry = &corpus.entries()[0];
        assert_eq!(entry.body, "Bring a jacket.");
        assert_eq!(entry.tags, vec!["lake", "lake"]);
        let strategy = entry.strategy.unwrap();
        assert_eq!(strategy.style, Style::Innovative);
        assert_eq!(strategy.viewpoint, Viewpoint::SocialConnector);
        assert_eq!(strategy.goal, Goal::DeepEndorsement);
    }

    #[test]
    fn invalid_entry_names_its_key() {
        let err = Corpus::from_json(
            r#"{
                "good": {"title": "ok", "body": "ok"},
                "bad": {"title": "x", "body": "y",
                        "strategy": {"style": "reckless", "viewpoint": "official-voice", "goal": "call-to-action"}}
            }"#,
        )
        .unwrap_err();
        match err {
            CorpusError::InvalidEntry { key, .. } => assert_eq!(key, "bad"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_non_object() {
        let err = Corpus::from_json(r#"[{"title": "x", "body": "y"}]"#).unwrap_err();
        assert!(matches!(err, CorpusError::NotAnObject));
    }

    #[test]
    fn load_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("corpus.json");
        fs::write(&path, r#"{"a": {"title": "t", "body": "b"}}"#).unwrap();

        let corpus = Corpus::load(&path).unwrap();
        assert_eq!(corpus.len(), 1);
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let err = Corpus::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, CorpusError::Read { .. }));
    }

    #[test]
    fn numbered_pool_wraps_around() {
        let pool = ImagePool::numbered(3).unwrap();
        assert_eq!(pool.image_for(0), "/1.png");
        assert_eq!(pool.image_for(2), "/3.png");
        assert_eq!(pool.image_for(3), "/1.png");
    }

    #[test]
    fn rotated_pool_starts_at_offset() {
        let pool = ImagePool::numbered(20).unwrap().rotated(8);
        assert_eq!(pool.image_for(0), "/9.png");
        assert_eq!(pool.image_for(12), "/1.png");

        let wrapped = ImagePool::numbered(20).unwrap().rotated(28);
        assert_eq!(wrapped, pool);
    }

    #[test]
    fn empty_pool_rejected() {
        assert!(matches!(
            ImagePool::numbered(0),
            Err(CorpusError::EmptyImagePool)
        ));
    }
}

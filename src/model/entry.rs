//! Script entries: the immutable corpus items candidates are built from.

use serde::{Deserialize, Serialize};

use super::Strategy;

/// A scripted note in the corpus.
///
/// Tags keep their source order and may contain duplicates; they are
/// deduplicated when displayed or copied into a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptEntry {
    pub title: String,

    #[serde(alias = "content")]
    pub body: String,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Entries without a strategy match every facet filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,
}

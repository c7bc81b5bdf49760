//! Draft and publish payload types.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// The user's editable working copy of the selected note.
///
/// Tags are kept free of duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub title: String,
    pub body: String,
    pub(crate) tags: Vec<String>,
}

/// A snapshot of the draft at publish time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishPayload {
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    /// Image references of the selected image candidates, in pick order.
    pub images: Vec<String>,
    pub timestamp: Timestamp,
}

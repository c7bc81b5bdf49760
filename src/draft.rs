//! Draft assembly: project a selected candidate into an editable draft and
//! snapshot it for publishing.
//!
//! A draft is never written back to its candidate. Re-selecting a candidate
//! rebuilds the draft from scratch, so unsaved edits are dropped.

use jiff::Timestamp;

use crate::model::{Candidate, Draft, PublishPayload};

impl Draft {
    /// A fresh draft holding the candidate's title, body, and distinct tags.
    pub fn reset_from(candidate: &Candidate) -> Self {
        Self {
            title: candidate.title.clone(),
            body: candidate.body.clone(),
            tags: candidate
                .distinct_tags()
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Appends `tag`, trimmed. Blank or already-present tags are ignored.
    ///
    /// Matching is exact and case-sensitive. Returns whether the tag was added.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    /// Removes every tag equal to `tag`. Returns how many were removed.
    pub fn remove_tag(&mut self, tag: &str) -> usize {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        before - self.tags.len()
    }

    /// Snapshots the draft with the given image references.
    ///
    /// Never fails and leaves the draft editable.
    pub fn publish(&self, images: Vec<String>) -> PublishPayload {
        PublishPayload {
            title: self.title.clone(),
            body: self.body.clone(),
            tags: self.tags.clone(),
            images,
            timestamp: Timestamp::now(),
        }
    }
}

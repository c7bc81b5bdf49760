//! Candidates: corpus entries materialized into selectable cards.

use serde::Serialize;

use super::Strategy;

/// A selectable card. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Sequential, 1-based, unique within its list.
    pub id: u32,
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,
    /// Placeholder image location from the image pool.
    pub image_ref: String,
}

impl Candidate {
    /// Tags with duplicates removed, first occurrence wins.
    pub fn distinct_tags(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::with_capacity(self.tags.len());
        for tag in &self.tags {
            if !seen.contains(&tag.as_str()) {
                seen.push(tag);
            }
        }
        seen
    }
}

/// An append-only page sequence over one filtered corpus.
///
/// `cursor` counts the filtered entries already consumed, so after every
/// successful extension `cursor == items.len()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateList {
    items: Vec<Candidate>,
    cursor: usize,
    exhausted: bool,
}

impl CandidateList {
    pub fn items(&self) -> &[Candidate] {
        &self.items
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// True when no un-shown entries remain under the current filter.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Looks up a candidate by id.
    pub fn get(&self, id: u32) -> Option<&Candidate> {
        self.items.iter().find(|c| c.id == id)
    }

    /// Appends a freshly materialized page and advances the cursor.
    pub(crate) fn append_page(&mut self, page: Vec<Candidate>, filtered_len: usize) {
        self.cursor += page.len();
        self.items.extend(page);
        self.exhausted = self.cursor >= filtered_len;
    }

    pub(crate) fn mark_exhausted(&mut self) {
        self.exhausted = true;
    }
}

/// Candidate ids picked on the image tab, in the order they were picked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImageSelection(Vec<u32>);

impl ImageSelection {
    pub fn ids(&self) -> &[u32] {
        &self.0
    }

    pub fn contains(&self, id: u32) -> bool {
        self.0.contains(&id)
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Adds `id` if absent, removes it if present.
    pub(crate) fn toggle(&mut self, id: u32) {
        if let Some(pos) = self.0.iter().position(|&existing| existing == id) {
            self.0.remove(pos);
        } else {
            self.0.push(id);
        }
    }
}

impl From<Vec<u32>> for ImageSelection {
    fn from(ids: Vec<u32>) -> Self {
        let mut selection = Self::default();
        for id in ids {
            if !selection.contains(id) {
                selection.0.push(id);
            }
        }
        selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: u32, tags: &[&str]) -> Candidate {
        Candidate {
            id,
            title: format!("Note {id}"),
            body: "body".into(),
            tags: tags.iter().map(ToString::to_string).collect(),
            strategy: None,
            image_ref: "/1.png".into(),
        }
    }

    #[test]
    fn distinct_tags_keep_first_seen_order() {
        let c = candidate(1, &["camping", "sunset", "camping", "gear", "sunset"]);
        assert_eq!(c.distinct_tags(), vec!["camping", "sunset", "gear"]);
    }

    #[test]
    fn append_page_tracks_cursor_and_exhaustion() {
        let mut list = CandidateList::default();
        list.append_page(vec![candidate(1, &[]), candidate(2, &[])], 3);
        assert_eq!(list.cursor(), 2);
        assert!(!list.is_exhausted());

        list.append_page(vec![candidate(3, &[])], 3);
        assert_eq!(list.cursor(), 3);
        assert_eq!(list.len(), 3);
        assert!(list.is_exhausted());
    }

    #[test]
    fn list_json_carries_paging_state() {
        let mut list = CandidateList::default();
        list.append_page(vec![candidate(1, &["lake"])], 1);

        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(json["cursor"], 1);
        assert_eq!(json["exhausted"], true);
        assert_eq!(json["items"][0]["imageRef"], "/1.png");
    }

    #[test]
    fn get_finds_by_id() {
        let mut list = CandidateList::default();
        list.append_page(vec![candidate(1, &[]), candidate(2, &[])], 2);
        assert_eq!(list.get(2).unwrap().title, "Note 2");
        assert!(list.get(3).is_none());
    }

    #[test]
    fn toggle_is_xor_and_keeps_pick_order() {
        let mut selection = ImageSelection::from(vec![1]);
        selection.toggle(4);
        selection.toggle(2);
        assert_eq!(selection.ids(), &[1, 4, 2]);

        selection.toggle(1);
        assert_eq!(selection.ids(), &[4, 2]);

        selection.toggle(4);
        selection.toggle(2);
        assert!(selection.is_empty());
    }

    #[test]
    fn from_vec_drops_duplicates() {
        let selection = ImageSelection::from(vec![3, 1, 3]);
        assert_eq!(selection.ids(), &[3, 1]);
    }
}

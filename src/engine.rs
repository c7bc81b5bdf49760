//! Candidate selection: filter the corpus by facets, then page through the
//! filtered order without repeats.
//!
//! The filtered order is computed once per facet selection and is the only
//! thing a [`CandidateList`] cursor indexes into. Extending a list always
//! continues from its cursor, so no entry is shown twice and a fixed corpus
//! with fixed facets always produces the same pages.

use tracing::debug;

use crate::corpus::{Corpus, ImagePool};
use crate::model::{Candidate, CandidateList, FacetSelection, ImageSelection, ScriptEntry};

/// Entries materialized per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Errors from candidate lookups.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("no candidate with id {0}")]
    CandidateNotFound(u32),
}

/// Outcome of asking a list for more candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extension {
    /// A new page was appended.
    Appended { added: usize },

    /// Nothing left under the current filter. The list was not touched.
    Exhausted,
}

/// The corpus entries admitted by one facet selection, in corpus order.
#[derive(Debug, Clone)]
pub struct FilteredCorpus<'c> {
    entries: Vec<&'c ScriptEntry>,
}

impl<'c> FilteredCorpus<'c> {
    pub fn entries(&self) -> &[&'c ScriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Selection engine over an injected, read-only corpus.
#[derive(Debug, Clone)]
pub struct Engine<'c> {
    corpus: &'c Corpus,
    pool: ImagePool,
    page_size: usize,
}

impl<'c> Engine<'c> {
    pub fn new(corpus: &'c Corpus, pool: ImagePool) -> Self {
        Self {
            corpus,
            pool,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Overrides the page size. Zero is treated as one.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// The same engine drawing images from a different pool.
    #[must_use]
    pub fn with_pool(&self, pool: ImagePool) -> Self {
        Self {
            corpus: self.corpus,
            pool,
            page_size: self.page_size,
        }
    }

    pub fn pool(&self) -> &ImagePool {
        &self.pool
    }

    #[cfg(test)]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Entries admitted by `facets`, in corpus order.
    pub fn filter(&self, facets: &FacetSelection) -> FilteredCorpus<'c> {
        let entries: Vec<&'c ScriptEntry> = if facets.is_unconstrained() {
            self.corpus.entries().iter().collect()
        } else {
            self.corpus
                .entries()
                .iter()
                .filter(|entry| facets.admits(entry))
                .collect()
        };
        debug!(
            corpus = self.corpus.len(),
            matched = entries.len(),
            "filtered corpus"
        );
        FilteredCorpus { entries }
    }

    /// The first page of a fresh list.
    ///
    /// An empty filtered corpus yields an empty, exhausted list.
    pub fn initial_page(&self, filtered: &FilteredCorpus<'_>) -> CandidateList {
        let mut list = CandidateList::default();
        let page = self.materialize(&list, filtered);
        list.append_page(page, filtered.len());
        list
    }

    /// Appends the next page after the list's cursor.
    ///
    /// On an exhausted list this re-signals exhaustion and changes nothing.
    pub fn extend(&self, list: &mut CandidateList, filtered: &FilteredCorpus<'_>) -> Extension {
        if list.cursor() >= filtered.len() {
            list.mark_exhausted();
            return Extension::Exhausted;
        }

        let page = self.materialize(list, filtered);
        let added = page.len();
        list.append_page(page, filtered.len());
        debug!(
            added,
            cursor = list.cursor(),
            exhausted = list.is_exhausted(),
            "extended candidate list"
        );
        Extension::Appended { added }
    }

    fn materialize(&self, list: &CandidateList, filtered: &FilteredCorpus<'_>) -> Vec<Candidate> {
        let start = list.cursor();
        let end = (start + self.page_size).min(filtered.len());
        filtered.entries()[start..end]
            .iter()
            .enumerate()
            .map(|(offset, entry)| {
                let position = list.len() + offset;
                Candidate {
                    id: candidate_id(position),
                    title: entry.title.clone(),
                    body: entry.body.clone(),
                    tags: entry.tags.clone(),
                    strategy: entry.strategy,
                    image_ref: self.pool.image_for(position).to_string(),
                }
            })
            .collect()
    }
}

/// 1-based id for the candidate at 0-based `position`.
fn candidate_id(position: usize) -> u32 {
    u32::try_from(position + 1).unwrap_or(u32::MAX)
}

/// Index of the candidate with `id` in the list's items.
pub fn select(list: &CandidateList, id: u32) -> Result<usize, EngineError> {
    list.items()
        .iter()
        .position(|c| c.id == id)
        .ok_or(EngineError::CandidateNotFound(id))
}

/// XOR-toggles `id` in the image selection.
pub fn toggle_image_selection(selection: &mut ImageSelection, id: u32) {
    selection.toggle(id);
}

//! A single preview session: the state behind the display screen.
//!
//! The session owns both candidate tabs, the note and image selections, the
//! draft, and one loading sequencer per tab. Nothing here outlives the
//! session.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info};

use crate::engine::{self, Engine, EngineError, Extension, FilteredCorpus};
use crate::model::{Candidate, CandidateList, Draft, FacetSelection, ImageSelection, PublishPayload};
use crate::sequencer::{self, ManualScheduler, Progress, Sequencer};

/// Which candidate list an action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Note,
    Image,
}

impl Tab {
    pub fn label(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Image => "image",
        }
    }
}

/// Content line the requirement is written for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Section {
    #[default]
    OutdoorGuide,
    OutdoorWild,
    LifeSam,
    LifeTaste,
}

impl Section {
    pub fn label(self) -> &'static str {
        match self {
            Self::OutdoorGuide => "Outdoor: atmosphere photo guide",
            Self::OutdoorWild => "Outdoor: echoes of the wild",
            Self::LifeSam => "Lifestyle: at Sam's Club",
            Self::LifeTaste => "Lifestyle: a moment of taste",
        }
    }

    /// Only the variety-show line takes reference images.
    pub fn accepts_uploads(self) -> bool {
        matches!(self, Self::OutdoorWild)
    }
}

/// What the user filled in on the requirement form.
#[derive(Debug, Clone, Default)]
pub struct Requirement {
    pub section: Section,
    pub text: String,
    pub facets: FacetSelection,
    /// Uploaded reference images. Recorded only.
    pub uploads: Vec<PathBuf>,
}

/// State of one preview screen.
pub struct Session<'c> {
    requirement: Requirement,
    filtered: FilteredCorpus<'c>,
    note_engine: Engine<'c>,
    image_engine: Engine<'c>,
    notes: CandidateList,
    images: CandidateList,
    selected_note: Option<u32>,
    image_selection: ImageSelection,
    draft: Draft,
    note_loader: Sequencer<ManualScheduler>,
    image_loader: Sequencer<ManualScheduler>,
}

impl<'c> Session<'c> {
    /// Builds the first page of both tabs.
    ///
    /// The image tab draws from `engine`'s pool rotated by `image_offset`.
    /// Note 1 and image 1 start selected when present.
    pub fn new(engine: &Engine<'c>, image_offset: usize, requirement: Requirement) -> Self {
        let filtered = engine.filter(&requirement.facets);
        let note_engine = engine.clone();
        let image_engine = engine.with_pool(engine.pool().rotated(image_offset));

        let notes = note_engine.initial_page(&filtered);
        let images = image_engine.initial_page(&filtered);

        let selected_note = notes.items().first().map(|c| c.id);
        let draft = notes.items().first().map(Draft::reset_from).unwrap_or_default();
        let image_selection = match images.items().first() {
            Some(first) => ImageSelection::from(vec![first.id]),
            None => ImageSelection::default(),
        };

        info!(
            matched = filtered.len(),
            section = requirement.section.label(),
            uploads = requirement.uploads.len(),
            "session started"
        );

        Self {
            requirement,
            filtered,
            note_engine,
            image_engine,
            notes,
            images,
            selected_note,
            image_selection,
            draft,
            note_loader: Sequencer::new(sequencer::note_steps(), ManualScheduler::new()),
            image_loader: Sequencer::new(sequencer::image_steps(), ManualScheduler::new()),
        }
    }

    pub fn requirement(&self) -> &Requirement {
        &self.requirement
    }

    /// Number of corpus entries admitted by the facets.
    pub fn matched(&self) -> usize {
        self.filtered.len()
    }

    pub fn list(&self, tab: Tab) -> &CandidateList {
        match tab {
            Tab::Note => &self.notes,
            Tab::Image => &self.images,
        }
    }

    pub fn selected_note(&self) -> Option<&Candidate> {
        self.selected_note.and_then(|id| self.notes.get(id))
    }

    pub fn image_selection(&self) -> &ImageSelection {
        &self.image_selection
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }

    /// Selects a note and resets the draft to it, discarding edits.
    ///
    /// Re-selecting the current note also resets.
    pub fn select_note(&mut self, id: u32) -> Result<&Candidate, EngineError> {
        let index = engine::select(&self.notes, id)?;
        let candidate = &self.notes.items()[index];
        self.selected_note = Some(id);
        self.draft = Draft::reset_from(candidate);
        debug!(id, "note selected, draft reset");
        Ok(candidate)
    }

    /// Toggles an image candidate. Returns whether it is now selected.
    pub fn toggle_image(&mut self, id: u32) -> Result<bool, EngineError> {
        engine::select(&self.images, id)?;
        engine::toggle_image_selection(&mut self.image_selection, id);
        Ok(self.image_selection.contains(id))
    }

    /// Plays the tab's loading sequence to completion.
    pub fn play_loading(
        &mut self,
        tab: Tab,
        wait: impl FnMut(Duration),
        mut observe: impl FnMut(&str),
    ) {
        let loader = match tab {
            Tab::Note => &mut self.note_loader,
            Tab::Image => &mut self.image_loader,
        };
        loader.start();
        if let Some(first) = loader.current_step() {
            observe(first.label);
        }
        loader.run_to_completion(wait, |loader, progress| {
            if let Progress::Advanced { .. } = progress
                && let Some(step) = loader.current_step()
            {
                observe(step.label);
            }
        });
        debug!(tab = tab.label(), state = ?loader.state(), "loading finished");
    }

    /// Plays the loading sequence, then appends the tab's next page.
    ///
    /// An exhausted tab returns immediately without animating.
    pub fn load_more(
        &mut self,
        tab: Tab,
        wait: impl FnMut(Duration),
        observe: impl FnMut(&str),
    ) -> Extension {
        if self.list(tab).is_exhausted() {
            return Extension::Exhausted;
        }
        self.play_loading(tab, wait, observe);

        let extension = match tab {
            Tab::Note => self.note_engine.extend(&mut self.notes, &self.filtered),
            Tab::Image => self.image_engine.extend(&mut self.images, &self.filtered),
        };
        info!(tab = tab.label(), ?extension, "loaded more candidates");
        extension
    }

    /// Image references of the selected image candidates, in pick order.
    pub fn selected_image_refs(&self) -> Vec<String> {
        self.image_selection
            .ids()
            .iter()
            .filter_map(|&id| self.images.get(id))
            .map(|c| c.image_ref.clone())
            .collect()
    }

    /// Snapshots the draft with the selected images.
    pub fn publish(&self) -> PublishPayload {
        let payload = self.draft.publish(self.selected_image_refs());
        info!(
            title = %payload.title,
            images = payload.images.len(),
            "draft published"
        );
        payload
    }
}

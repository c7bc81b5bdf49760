//! Core data model for notecast.
//!
//! These types represent the pieces of the note preview workflow:
//! script entries and their strategy facets, candidates materialized from
//! them, the editable draft, and the publish payload.

mod candidate;
mod draft;
mod entry;
mod strategy;

pub use candidate::{Candidate, CandidateList, ImageSelection};
pub use draft::{Draft, PublishPayload};
pub use entry::ScriptEntry;
pub use strategy::{Facet, FacetSelection, Goal, Strategy, Style, Viewpoint};

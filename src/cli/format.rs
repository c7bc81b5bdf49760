//! Output formatting for CLI display.

use crate::model::{Candidate, CandidateList, Draft};

/// Characters of body text shown on a card.
const EXCERPT_CHARS: usize = 72;

/// Format a candidate as a three-line card.
///
/// Selected cards are marked with `*`. Duplicate tags are shown once.
pub(super) fn format_card(candidate: &Candidate, selected: bool) -> String {
    let marker = if selected { '*' } else { ' ' };
    let strategy = candidate
        .strategy
        .map_or_else(|| "unclassified".to_string(), |s| s.to_string());
    format!(
        "[{marker}] #{:<3} {}\n       {}\n       {}  {}  {}",
        candidate.id,
        candidate.title,
        excerpt(&candidate.body, EXCERPT_CHARS),
        format_tags(&candidate.distinct_tags()),
        strategy,
        candidate.image_ref,
    )
}

/// Summary line: how much of the filtered corpus is showing.
pub(super) fn format_list_status(list: &CandidateList, matched: usize) -> String {
    if list.is_exhausted() {
        format!("{} of {matched} shown — no more content", list.len())
    } else {
        format!("{} of {matched} shown", list.len())
    }
}

/// Format the draft being edited, with the images that will be published.
pub(super) fn format_draft(draft: &Draft, images: &[String]) -> String {
    let tags: Vec<&str> = draft.tags().iter().map(String::as_str).collect();
    let images = if images.is_empty() {
        "(none)".to_string()
    } else {
        images.join(", ")
    };
    format!(
        "Title:  {}\nBody:   {}\nTags:   {}\nImages: {images}",
        draft.title,
        draft.body,
        format_tags(&tags),
    )
}

fn format_tags(tags: &[&str]) -> String {
    if tags.is_empty() {
        return "(no tags)".to_string();
    }
    tags.iter()
        .map(|t| format!("#{t}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// First `max` characters of `text`, with an ellipsis when cut.
fn excerpt(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

//! Strategy coverage report: how many entries serve each
//! style/viewpoint/goal combination, and how far each falls short of a target.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::corpus::Corpus;
use crate::model::{Facet, Goal, Strategy, Style, Viewpoint};

/// Entry counts per strategy combination.
#[derive(Debug, Default)]
struct Coverage {
    counts: BTreeMap<Strategy, usize>,
    total: usize,
    unclassified: usize,
}

fn analyze(corpus: &Corpus) -> Coverage {
    let mut coverage = Coverage {
        total: corpus.len(),
        ..Coverage::default()
    };
    for entry in corpus.entries() {
        match entry.strategy {
            Some(strategy) => *coverage.counts.entry(strategy).or_default() += 1,
            None => coverage.unclassified += 1,
        }
    }
    coverage
}

/// Every combination of the enumerated facet values.
fn all_combinations() -> impl Iterator<Item = Strategy> {
    Style::ALL.iter().flat_map(|&style| {
        Viewpoint::ALL.iter().flat_map(move |&viewpoint| {
            Goal::ALL.iter().map(move |&goal| Strategy {
                style,
                viewpoint,
                goal,
            })
        })
    })
}

/// Render the coverage report for `corpus` against `target` entries per combination.
pub(super) fn report(corpus: &Corpus, target: usize) -> String {
    let coverage = analyze(corpus);
    let mut out = String::new();

    let mut by_count: Vec<(&Strategy, &usize)> = coverage.counts.iter().collect();
    by_count.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));

    let _ = writeln!(out, "Entries per combination (style/viewpoint/goal):");
    for (strategy, count) in by_count {
        let _ = writeln!(out, "  {strategy} = {count}");
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Total: {} entries", coverage.total);
    if coverage.unclassified > 0 {
        let _ = writeln!(out, "Unclassified: {}", coverage.unclassified);
    }
    let _ = writeln!(out, "Combinations covered: {}", coverage.counts.len());

    let mut needed = 0;
    let mut short = Vec::new();
    for strategy in all_combinations() {
        let count = coverage.counts.get(&strategy).copied().unwrap_or(0);
        if count < target {
            needed += target - count;
            short.push((strategy, count));
        }
    }

    let _ = writeln!(out);
    if short.is_empty() {
        let _ = writeln!(out, "Every combination has at least {target} entries");
        return out;
    }
    let _ = writeln!(out, "Below {target} entries:");
    for (strategy, count) in short {
        let _ = writeln!(out, "  {strategy} = {count} (needs {} more)", target - count);
    }
    let _ = writeln!(out, "Total needed: {needed}");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::ScriptEntry;

    fn entry(style: Style, viewpoint: Viewpoint, goal: Goal) -> ScriptEntry {
        ScriptEntry {
            title: "t".into(),
            body: "b".into(),
            tags: vec![],
            strategy: Some(Strategy {
                style,
                viewpoint,
                goal,
            }),
        }
    }

    fn corpus() -> Corpus {
        let popular = entry(
            Style::Innovative,
            Viewpoint::SocialConnector,
            Goal::CallToAction,
        );
        let rare = entry(
            Style::Conservative,
            Viewpoint::WhiteCollarChic,
            Goal::SparkCuriosity,
        );
        let mut unclassified = rare.clone();
        unclassified.strategy = None;
        Corpus::from_entries(vec![popular.clone(), rare, popular, unclassified])
    }

    #[test]
    fn combinations_cover_every_value() {
        let expected = Style::ALL.len() * Viewpoint::ALL.len() * Goal::ALL.len();
        assert_eq!(all_combinations().count(), expected);
    }

    #[test]
    fn analyze_counts_per_combination() {
        let coverage = analyze(&corpus());
        assert_eq!(coverage.total, 4);
        assert_eq!(coverage.unclassified, 1);
        assert_eq!(coverage.counts.len(), 2);
        assert_eq!(coverage.counts.values().max(), Some(&2));
    }

    #[test]
    fn report_sorts_by_count_and_lists_shortfalls() {
        let report = report(&corpus(), 2);
        let popular = report
            .find("innovative/social-connector/call-to-action = 2")
            .unwrap();
        let rare = report
            .find("conservative/white-collar-chic/spark-curiosity = 1")
            .unwrap();
        assert!(popular < rare);

        assert!(report.contains("conservative/white-collar-chic/spark-curiosity = 1 (needs 1 more)"));
        assert!(!report.contains("innovative/social-connector/call-to-action = 2 (needs"));

        // 36 combinations at target 2, minus 2 + 1 already present.
        assert!(report.contains("Total needed: 69"));
    }

    #[test]
    fn report_with_zero_target_has_no_shortfalls() {
        let report = report(&corpus(), 0);
        assert!(report.contains("Every combination has at least 0 entries"));
    }
}

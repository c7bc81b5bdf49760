//! Strategy facets: the classification axes used to filter the corpus.
//!
//! Each axis is a closed enum. The kebab-case names are canonical; the
//! labels written by the original content team are accepted as aliases so
//! existing data files load unchanged.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::ScriptEntry;

/// A closed set of values along one classification axis.
pub trait Facet: Copy + Ord + fmt::Debug + 'static {
    /// Every value of the axis, in display order.
    const ALL: &'static [Self];

    /// Canonical kebab-case name, as written in data files and on the CLI.
    fn label(self) -> &'static str;
}

/// How far a note strays from the house style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Style {
    #[serde(alias = "保守型")]
    Conservative,
    #[serde(alias = "适中型")]
    Moderate,
    #[serde(alias = "创新型")]
    Innovative,
}

impl Facet for Style {
    const ALL: &'static [Self] = &[Self::Conservative, Self::Moderate, Self::Innovative];

    fn label(self) -> &'static str {
        match self {
            Self::Conservative => "conservative",
            Self::Moderate => "moderate",
            Self::Innovative => "innovative",
        }
    }
}

/// The persona a note is written from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Viewpoint {
    #[serde(alias = "精致白领")]
    WhiteCollarChic,
    #[serde(alias = "户外玩家")]
    OutdoorEnthusiast,
    #[serde(alias = "社交达人")]
    SocialConnector,
    OfficialVoice,
}

impl Facet for Viewpoint {
    const ALL: &'static [Self] = &[
        Self::WhiteCollarChic,
        Self::OutdoorEnthusiast,
        Self::SocialConnector,
        Self::OfficialVoice,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::WhiteCollarChic => "white-collar-chic",
            Self::OutdoorEnthusiast => "outdoor-enthusiast",
            Self::SocialConnector => "social-connector",
            Self::OfficialVoice => "official-voice",
        }
    }
}

/// What a note is trying to make the reader do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Goal {
    #[serde(alias = "激发好奇")]
    SparkCuriosity,
    #[serde(alias = "深度种草")]
    DeepEndorsement,
    #[serde(alias = "号召行动")]
    CallToAction,
}

impl Facet for Goal {
    const ALL: &'static [Self] = &[Self::SparkCuriosity, Self::DeepEndorsement, Self::CallToAction];

    fn label(self) -> &'static str {
        match self {
            Self::SparkCuriosity => "spark-curiosity",
            Self::DeepEndorsement => "deep-endorsement",
            Self::CallToAction => "call-to-action",
        }
    }
}

/// Three-axis strategy descriptor attached to a script entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Strategy {
    pub style: Style,

    #[serde(alias = "view")]
    pub viewpoint: Viewpoint,

    #[serde(alias = "target")]
    pub goal: Goal,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.style.label(),
            self.viewpoint.label(),
            self.goal.label()
        )
    }
}

/// The user's facet filters. An empty set places no constraint on its axis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetSelection {
    pub styles: BTreeSet<Style>,
    pub viewpoints: BTreeSet<Viewpoint>,
    pub goals: BTreeSet<Goal>,
}

impl FacetSelection {
    /// True when no axis is constrained.
    pub fn is_unconstrained(&self) -> bool {
        self.styles.is_empty() && self.viewpoints.is_empty() && self.goals.is_empty()
    }

    /// Whether an entry passes every constrained axis.
    ///
    /// Unclassified entries always pass.
    pub fn admits(&self, entry: &ScriptEntry) -> bool {
        let Some(strategy) = entry.strategy else {
            return true;
        };
        admits_value(&self.styles, strategy.style)
            && admits_value(&self.viewpoints, strategy.viewpoint)
            && admits_value(&self.goals, strategy.goal)
    }
}

fn admits_value<F: Facet>(selected: &BTreeSet<F>, value: F) -> bool {
    selected.is_empty() || selected.contains(&value)
}

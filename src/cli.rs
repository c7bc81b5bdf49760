//! CLI interface for notecast.
//!
//! Three commands:
//!
//! - `notecast preview` — print candidate pages for a facet selection.
//! - `notecast session` — interactive pick/regenerate/edit/publish loop.
//! - `notecast coverage` — how well the corpus covers every strategy combination.
//!
//! All of them read the corpus named by `--corpus`, the config file, or the
//! built-in corpus, in that order.

mod coverage;
mod format;
mod repl;

use std::io;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::Config;
use crate::corpus::{Corpus, ImagePool};
use crate::engine::{Engine, Extension};
use crate::model::{FacetSelection, Goal, Style, Viewpoint};
use crate::session::{Requirement, Section, Session, Tab};

/// notecast — preview and publish notes from a scripted corpus.
#[derive(Debug, Parser)]
#[command(name = "notecast", after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    /// Corpus JSON file. Overrides the `corpus` config key.
    #[arg(long, global = true)]
    corpus: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r#"Workflow: from requirement to published note
  1. notecast coverage
     → which style/viewpoint/goal combinations the corpus can serve
  2. notecast preview --style conservative --goal call-to-action
  3. notecast session --style conservative --requirement "Lakeside weekend" --out published.jsonl
     > more note
     > select 4
     > image 2
     > tag add lakeside
     > publish"#;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print candidate pages for a facet selection.
    ///
    /// Pages are sequential and never repeat an entry.
    Preview {
        #[command(flatten)]
        facets: FacetArgs,

        /// How many pages to print.
        #[arg(long, default_value_t = 1)]
        pages: usize,

        /// Print candidates as JSON instead of cards.
        #[arg(long)]
        json: bool,
    },

    /// Start an interactive session: pick a note and images, edit, publish.
    ///
    /// Commands are read line by line from stdin. Type `help` for the list.
    Session {
        #[command(flatten)]
        facets: FacetArgs,

        /// Content line the notes are written for.
        #[arg(long, value_enum, default_value_t = SectionArg::OutdoorGuide)]
        section: SectionArg,

        /// What the notes should be about.
        #[arg(long, default_value = "")]
        requirement: String,

        /// Reference images to attach to the requirement. Can be repeated.
        /// Only the `outdoor-wild` section takes them.
        #[arg(long)]
        image: Vec<PathBuf>,

        /// Append each published payload to this file as one JSON line.
        /// Printed to stdout when omitted.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Skip the loading animations.
        #[arg(long)]
        no_animation: bool,
    },

    /// Count entries per strategy combination and report shortfalls.
    Coverage {
        /// Entries wanted per combination.
        #[arg(long, default_value_t = 20)]
        target: usize,
    },
}

/// Facet filters shared by `preview` and `session`. Each flag can repeat;
/// an omitted flag leaves its axis unconstrained.
#[derive(Debug, Clone, Args)]
pub struct FacetArgs {
    #[arg(long, value_enum)]
    style: Vec<StyleArg>,

    #[arg(long, value_enum)]
    viewpoint: Vec<ViewpointArg>,

    #[arg(long, value_enum)]
    goal: Vec<GoalArg>,
}

impl FacetArgs {
    fn to_domain(&self) -> FacetSelection {
        FacetSelection {
            styles: self.style.iter().map(StyleArg::to_domain).collect(),
            viewpoints: self.viewpoint.iter().map(ViewpointArg::to_domain).collect(),
            goals: self.goal.iter().map(GoalArg::to_domain).collect(),
        }
    }
}

/// CLI-facing content section, mapped to the session `Section`.
#[derive(Debug, Clone, ValueEnum)]
pub enum SectionArg {
    OutdoorGuide,
    OutdoorWild,
    LifeSam,
    LifeTaste,
}

impl SectionArg {
    fn to_domain(&self) -> Section {
        match self {
            Self::OutdoorGuide => Section::OutdoorGuide,
            Self::OutdoorWild => Section::OutdoorWild,
            Self::LifeSam => Section::LifeSam,
            Self::LifeTaste => Section::LifeTaste,
        }
    }
}

/// CLI-facing style, mapped to the domain `Style`.
#[derive(Debug, Clone, ValueEnum)]
pub enum StyleArg {
    Conservative,
    Moderate,
    Innovative,
}

impl StyleArg {
    fn to_domain(&self) -> Style {
        match self {
            Self::Conservative => Style::Conservative,
            Self::Moderate => Style::Moderate,
            Self::Innovative => Style::Innovative,
        }
    }
}

/// CLI-facing viewpoint, mapped to the domain `Viewpoint`.
#[derive(Debug, Clone, ValueEnum)]
pub enum ViewpointArg {
    WhiteCollarChic,
    OutdoorEnthusiast,
    SocialConnector,
    OfficialVoice,
}

impl ViewpointArg {
    fn to_domain(&self) -> Viewpoint {
        match self {
            Self::WhiteCollarChic => Viewpoint::WhiteCollarChic,
            Self::OutdoorEnthusiast => Viewpoint::OutdoorEnthusiast,
            Self::SocialConnector => Viewpoint::SocialConnector,
            Self::OfficialVoice => Viewpoint::OfficialVoice,
        }
    }
}

/// CLI-facing goal, mapped to the domain `Goal`.
#[derive(Debug, Clone, ValueEnum)]
pub enum GoalArg {
    SparkCuriosity,
    DeepEndorsement,
    CallToAction,
}

impl GoalArg {
    fn to_domain(&self) -> Goal {
        match self {
            Self::SparkCuriosity => Goal::SparkCuriosity,
            Self::DeepEndorsement => Goal::DeepEndorsement,
            Self::CallToAction => Goal::CallToAction,
        }
    }
}

/// Run the CLI, returning an error message on failure.
pub fn run(config: &Config) -> Result<(), String> {
    let cli = Cli::parse();

    let corpus = load_corpus(cli.corpus.as_ref().or(config.corpus.as_ref()))?;
    let pool = ImagePool::numbered(config.image_pool_size).map_err(|e| e.to_string())?;
    let engine = Engine::new(&corpus, pool).with_page_size(config.page_size);

    match cli.command {
        Command::Preview {
            facets,
            pages,
            json,
        } => cmd_preview(&engine, &facets.to_domain(), pages, json),
        Command::Session {
            facets,
            section,
            requirement,
            image,
            out,
            no_animation,
        } => {
            let section = section.to_domain();
            if !image.is_empty() && !section.accepts_uploads() {
                return Err(format!(
                    "section '{}' does not take reference images",
                    section.label()
                ));
            }
            let requirement = Requirement {
                section,
                text: requirement,
                facets: facets.to_domain(),
                uploads: image,
            };
            let animate = config.animate && !no_animation;
            cmd_session(&engine, config.image_offset, requirement, out, animate)
        }
        Command::Coverage { target } => {
            print!("{}", coverage::report(&corpus, target));
            Ok(())
        }
    }
}

fn load_corpus(path: Option<&PathBuf>) -> Result<Corpus, String> {
    match path {
        Some(path) => Corpus::load(path).map_err(|e| e.to_string()),
        None => Corpus::builtin().map_err(|e| format!("built-in corpus is broken: {e}")),
    }
}

fn cmd_preview(
    engine: &Engine<'_>,
    facets: &FacetSelection,
    pages: usize,
    json: bool,
) -> Result<(), String> {
    let filtered = engine.filter(facets);
    let mut list = engine.initial_page(&filtered);
    for _ in 1..pages {
        if engine.extend(&mut list, &filtered) == Extension::Exhausted {
            break;
        }
    }

    if json {
        let json = serde_json::to_string_pretty(&list)
            .map_err(|e| format!("failed to serialize candidates: {e}"))?;
        println!("{json}");
        return Ok(());
    }

    if filtered.is_empty() {
        println!("No notes match these filters");
        return Ok(());
    }
    for candidate in list.items() {
        println!("{}", format::format_card(candidate, false));
    }
    eprintln!("{}", format::format_list_status(&list, filtered.len()));
    Ok(())
}

fn cmd_session(
    engine: &Engine<'_>,
    image_offset: usize,
    requirement: Requirement,
    out: Option<PathBuf>,
    animate: bool,
) -> Result<(), String> {
    let mut session = Session::new(engine, image_offset, requirement);
    let mut wait = pause(animate);

    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    let mut echo = repl::StepEcho::new(&mut stdout);
    session.play_loading(Tab::Note, &mut wait, |label| echo.line(label));
    echo.finish().map_err(|e| format!("session failed: {e}"))?;

    let stdin = io::stdin();
    repl::run(&mut session, stdin.lock(), &mut stdout, out.as_deref(), wait)
        .map_err(|e| format!("session failed: {e}"))
}

/// Sleeps through each loading step when animating, returns at once otherwise.
fn pause(animate: bool) -> impl FnMut(Duration) {
    move |duration| {
        if animate {
            thread::sleep(duration);
        }
    }
}

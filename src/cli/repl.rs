//! Line-oriented session loop: the interactive display screen.
//!
//! Reads one command per line, applies it to the session, and writes the
//! result. Bad input is reported and the loop continues; only I/O failures
//! end it early.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::Duration;

use crate::engine::Extension;
use crate::model::PublishPayload;
use crate::session::{Session, Tab};

use super::format::{format_card, format_draft, format_list_status};

const HELP: &str = "\
Commands:
  show               list both tabs and the draft
  more note|image    load the next page of a tab
  select <id>        pick a note (resets the draft)
  image <id>         toggle an image
  title <text>       edit the draft title
  body <text>        edit the draft body
  tag add <tag>      add a tag
  tag rm <tag>       remove a tag
  publish            publish the draft with the selected images
  help               show this list
  quit               leave the session";

/// A parsed session command.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Show,
    More(Tab),
    Select(u32),
    Image(u32),
    Title(String),
    Body(String),
    AddTag(String),
    RemoveTag(String),
    Publish,
    Help,
    Quit,
}

fn parse(line: &str) -> Result<Input, String> {
    let line = line.trim();
    let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    let id = |what: &str| {
        rest.parse::<u32>()
            .map_err(|_| format!("usage: {what} <id>"))
    };

    match word {
        "show" => Ok(Input::Show),
        "more" => match rest {
            "" | "note" => Ok(Input::More(Tab::Note)),
            "image" => Ok(Input::More(Tab::Image)),
            _ => Err("usage: more note|image".to_string()),
        },
        "select" => id("select").map(Input::Select),
        "image" => id("image").map(Input::Image),
        "title" => Ok(Input::Title(rest.to_string())),
        "body" => Ok(Input::Body(rest.to_string())),
        "tag" => match rest.split_once(' ') {
            Some(("add", tag)) => Ok(Input::AddTag(tag.to_string())),
            Some(("rm", tag)) => Ok(Input::RemoveTag(tag.trim().to_string())),
            _ => Err("usage: tag add|rm <tag>".to_string()),
        },
        "publish" => Ok(Input::Publish),
        "help" | "?" => Ok(Input::Help),
        "quit" | "exit" => Ok(Input::Quit),
        other => Err(format!("unknown command '{other}' (try `help`)")),
    }
}

/// Run the session loop until `quit` or end of input.
pub(super) fn run(
    session: &mut Session<'_>,
    input: impl BufRead,
    out: &mut impl Write,
    publish_to: Option<&Path>,
    mut wait: impl FnMut(Duration),
) -> io::Result<()> {
    write_overview(session, out)?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let command = match parse(&line) {
            Ok(command) => command,
            Err(message) => {
                writeln!(out, "{message}")?;
                continue;
            }
        };

        match command {
            Input::Show => write_overview(session, out)?,
            Input::More(tab) => {
                let mut echo = StepEcho::new(&mut *out);
                let extension = session.load_more(tab, &mut wait, |label| echo.line(label));
                echo.finish()?;
                match extension {
                    Extension::Appended { added } => {
                        let list = session.list(tab);
                        for candidate in &list.items()[list.len() - added..] {
                            writeln!(out, "{}", format_card(candidate, false))?;
                        }
                        writeln!(out, "{}", format_list_status(list, session.matched()))?;
                    }
                    Extension::Exhausted => writeln!(out, "No more content")?,
                }
            }
            Input::Select(id) => match session.select_note(id) {
                Ok(candidate) => writeln!(out, "Selected note #{id}: {}", candidate.title)?,
                Err(e) => writeln!(out, "{e}")?,
            },
            Input::Image(id) => match session.toggle_image(id) {
                Ok(true) => writeln!(out, "Image #{id} selected")?,
                Ok(false) => writeln!(out, "Image #{id} deselected")?,
                Err(e) => writeln!(out, "{e}")?,
            },
            Input::Title(title) => session.draft_mut().title = title,
            Input::Body(body) => session.draft_mut().body = body,
            Input::AddTag(tag) => {
                if !session.draft_mut().add_tag(&tag) {
                    writeln!(out, "Tag not added (blank or already present)")?;
                }
            }
            Input::RemoveTag(tag) => {
                if session.draft_mut().remove_tag(&tag) == 0 {
                    writeln!(out, "No tag '{tag}'")?;
                }
            }
            Input::Publish => {
                let payload = session.publish();
                publish(&payload, publish_to, out)?;
            }
            Input::Help => writeln!(out, "{HELP}")?,
            Input::Quit => break,
        }
    }

    Ok(())
}

/// Writes loading step labels as they start.
///
/// The first write error stops further output and is returned by `finish`.
pub(super) struct StepEcho<'w, W: Write> {
    out: &'w mut W,
    error: Option<io::Error>,
}

impl<'w, W: Write> StepEcho<'w, W> {
    pub(super) fn new(out: &'w mut W) -> Self {
        Self { out, error: None }
    }

    pub(super) fn line(&mut self, label: &str) {
        if self.error.is_none()
            && let Err(e) = writeln!(self.out, "… {label}").and_then(|()| self.out.flush())
        {
            self.error = Some(e);
        }
    }

    pub(super) fn finish(self) -> io::Result<()> {
        self.error.map_or(Ok(()), Err)
    }
}

fn write_overview(session: &Session<'_>, out: &mut impl Write) -> io::Result<()> {
    let requirement = session.requirement();
    writeln!(out, "Section: {}", requirement.section.label())?;
    if !requirement.text.is_empty() {
        writeln!(out, "Requirement: {}", requirement.text)?;
    }
    for upload in &requirement.uploads {
        writeln!(out, "Reference image: {}", upload.display())?;
    }

    let selected_note = session.selected_note().map(|c| c.id);
    for tab in [Tab::Note, Tab::Image] {
        let list = session.list(tab);
        writeln!(out, "== {} options ==", tab.label())?;
        if list.is_empty() {
            writeln!(out, "No notes match these filters")?;
            continue;
        }
        for candidate in list.items() {
            let selected = match tab {
                Tab::Note => selected_note == Some(candidate.id),
                Tab::Image => session.image_selection().contains(candidate.id),
            };
            writeln!(out, "{}", format_card(candidate, selected))?;
        }
        writeln!(out, "{}", format_list_status(list, session.matched()))?;
    }

    writeln!(out, "== draft ==")?;
    writeln!(
        out,
        "{}",
        format_draft(session.draft(), &session.selected_image_refs())
    )
}

/// Append the payload as a JSON line to `path`, or print it.
fn publish(payload: &PublishPayload, path: Option<&Path>, out: &mut impl Write) -> io::Result<()> {
    match path {
        Some(path) => {
            let mut line = serde_json::to_string(payload)?;
            line.push('\n');
            let mut file = fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            file.write_all(line.as_bytes())?;
            writeln!(out, "Published → {}", path.display())
        }
        None => {
            let json = serde_json::to_string_pretty(payload)?;
            writeln!(out, "{json}")?;
            writeln!(out, "Published")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::RefCell;
    use std::io::Cursor;
    use std::rc::Rc;

    use tempfile::TempDir;

    use crate::corpus::{Corpus, ImagePool};
    use crate::engine::Engine;
    use crate::model::ScriptEntry;
    use crate::session::{Requirement, Section};

    fn corpus(len: usize) -> Corpus {
        Corpus::from_entries(
            (0..len)
                .map(|n| ScriptEntry {
                    title: format!("title {n}"),
                    body: format!("body {n}"),
                    tags: vec![format!("tag{n}")],
                    strategy: None,
                })
                .collect(),
        )
    }

    fn run_script(corpus: &Corpus, script: &str, publish_to: Option<&Path>) -> String {
        let engine = Engine::new(corpus, ImagePool::numbered(20).unwrap()).with_page_size(3);
        let mut session = Session::new(&engine, 8, Requirement::default());
        let mut out = Vec::new();
        run(
            &mut session,
            Cursor::new(script.to_string()),
            &mut out,
            publish_to,
            |_| {},
        )
        .unwrap();
        String::from_utf8(out).unwrap()
    }

    /// Output buffer that stays readable while `run` holds the writer.
    #[derive(Clone, Default)]
    struct SharedOut(Rc<RefCell<Vec<u8>>>);

    impl SharedOut {
        fn text(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).unwrap()
        }
    }

    impl Write for SharedOut {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Writer that rejects everything.
    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn step_labels_appear_before_each_wait() {
        let corpus = corpus(5);
        let engine = Engine::new(&corpus, ImagePool::numbered(20).unwrap()).with_page_size(3);
        let mut session = Session::new(&engine, 8, Requirement::default());

        let buffer = SharedOut::default();
        let mut out = buffer.clone();
        let watcher = buffer.clone();
        let mut shown_at_wait = Vec::new();
        run(
            &mut session,
            Cursor::new("more note\n"),
            &mut out,
            None,
            |_| shown_at_wait.push(watcher.text().matches("… ").count()),
        )
        .unwrap();

        assert_eq!(shown_at_wait, vec![1, 2, 3, 4]);
        assert!(buffer.text().contains("#4"));
    }

    #[test]
    fn step_echo_keeps_first_write_error() {
        let mut out = Broken;
        let mut echo = StepEcho::new(&mut out);
        echo.line("first");
        echo.line("second");
        let err = echo.finish().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn overview_shows_section_and_uploads() {
        let corpus = corpus(2);
        let engine = Engine::new(&corpus, ImagePool::numbered(20).unwrap());
        let requirement = Requirement {
            section: Section::OutdoorWild,
            text: "lakeside weekend".into(),
            uploads: vec!["show.jpg".into()],
            ..Requirement::default()
        };
        let mut session = Session::new(&engine, 8, requirement);
        let mut out = Vec::new();
        run(&mut session, Cursor::new(""), &mut out, None, |_| {}).unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Section: Outdoor: echoes of the wild"));
        assert!(out.contains("Requirement: lakeside weekend"));
        assert!(out.contains("Reference image: show.jpg"));
    }

    #[test]
    fn parses_commands() {
        assert_eq!(parse("more"), Ok(Input::More(Tab::Note)));
        assert_eq!(parse("more image"), Ok(Input::More(Tab::Image)));
        assert_eq!(parse("  select 4 "), Ok(Input::Select(4)));
        assert_eq!(parse("image 2"), Ok(Input::Image(2)));
        assert_eq!(
            parse("title A new title"),
            Ok(Input::Title("A new title".into()))
        );
        assert_eq!(
            parse("tag add lake side"),
            Ok(Input::AddTag("lake side".into()))
        );
        assert_eq!(parse("tag rm lake"), Ok(Input::RemoveTag("lake".into())));
        assert_eq!(parse("quit"), Ok(Input::Quit));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse("select x").is_err());
        assert!(parse("more video").is_err());
        assert!(parse("tag lake").is_err());
        assert!(parse("dance").unwrap_err().contains("unknown command"));
    }

    #[test]
    fn more_until_exhausted() {
        let out = run_script(&corpus(5), "more note\nmore note\nquit\n", None);
        assert!(out.contains("#4"));
        assert!(out.contains("5 of 5 shown — no more content"));
        assert!(out.contains("No more content"));
        assert_eq!(out.matches("Analyzing the requirement").count(), 1);
    }

    #[test]
    fn edits_reset_on_reselect() {
        let script = "title Mine\nselect 2\nselect 1\npublish\n";
        let out = run_script(&corpus(3), script, None);
        assert!(out.contains("Selected note #2: title 1"));
        assert!(out.contains("\"title\": \"title 0\""));
        assert!(!out.contains("\"title\": \"Mine\""));
    }

    #[test]
    fn stale_id_is_reported_and_loop_continues() {
        let out = run_script(&corpus(2), "select 9\nimage 9\nshow\n", None);
        assert_eq!(out.matches("no candidate with id 9").count(), 2);
        assert_eq!(out.matches("== draft ==").count(), 2);
    }

    #[test]
    fn publish_appends_json_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("published.jsonl");
        let script = "tag add lakeside\nimage 2\npublish\nimage 1\npublish\n";
        let out = run_script(&corpus(3), script, Some(&path));
        assert_eq!(out.matches("Published →").count(), 2);

        let contents = fs::read_to_string(&path).unwrap();
        let payloads: Vec<PublishPayload> = contents
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(payloads.len(), 2);
        assert_eq!(payloads[0].tags, vec!["tag0", "lakeside"]);
        assert_eq!(payloads[0].images, vec!["/9.png", "/10.png"]);
        assert_eq!(payloads[1].images, vec!["/10.png"]);
    }
}

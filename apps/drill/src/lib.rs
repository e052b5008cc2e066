pub mod config;
pub mod display;

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context};
use chrono::Utc;
use drill_core::{
    Card, DeckLoader, DeckSource, DeckStore, DirectorySource, DrillError, FileStore, Session,
    SessionSettings,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

/// A line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    Next,
    Previous,
    Pick,
    Progress,
    Reset,
    Quit,
    Answer(&'a str),
}

impl<'a> Command<'a> {
    pub fn parse(line: &'a str) -> Self {
        match line.trim() {
            ":next" | ":n" => Self::Next,
            ":prev" | ":p" => Self::Previous,
            ":pick" => Self::Pick,
            ":progress" => Self::Progress,
            ":reset" => Self::Reset,
            ":quit" | ":q" => Self::Quit,
            _ => Self::Answer(line.trim_end_matches(['\r', '\n'])),
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = Config::from_env()?;
    let source = DirectorySource::new(&config.decks_dir);

    let Some(deck_name) = std::env::args().nth(1) else {
        let decks = source
            .list()
            .with_context(|| format!("reading decks from {}", config.decks_dir.display()))?;
        bail!("usage: drill <deck>\navailable decks: {}", decks.join(", "));
    };

    tracing::info!(
        deck = %deck_name,
        decks_dir = %config.decks_dir.display(),
        data_dir = %config.data_dir.display(),
        navigation = config.session.navigation.as_str(),
        "starting drill"
    );

    let mut loader = DeckLoader::new(source, FileStore::new(&config.data_dir));
    let stdin = io::stdin();
    let stdout = io::stdout();
    drive(&mut loader, &deck_name, config.session, stdin.lock(), stdout.lock())
}

/// Run an interactive drill over `deck_name`, reading answers and commands
/// from `input` until it ends or `:quit`.
pub fn drive<S, T, R, W>(
    loader: &mut DeckLoader<S, T>,
    deck_name: &str,
    settings: SessionSettings,
    input: R,
    mut out: W,
) -> anyhow::Result<()>
where
    S: DeckSource,
    T: DeckStore,
    R: BufRead,
    W: Write,
{
    let deck = loader
        .load(deck_name)
        .with_context(|| format!("loading deck {deck_name}"))?;
    let mut session = Session::new(deck, settings);
    show_current(&session, &mut out)?;

    for line in input.lines() {
        let line = line?;
        match Command::parse(&line) {
            Command::Quit => break,
            Command::Next => {
                let shown = session.next().map(|_| ());
                navigated(shown, &session, &mut out)?;
            }
            Command::Previous => {
                let shown = session.previous().map(|_| ());
                navigated(shown, &session, &mut out)?;
            }
            Command::Pick => {
                let shown = session.pick().map(|_| ());
                navigated(shown, &session, &mut out)?;
            }
            Command::Progress => {
                writeln!(
                    out,
                    "{}",
                    display::progress(deck_name, &session.progress(), Utc::now())
                )?;
            }
            Command::Reset => {
                let deck = loader
                    .reset(deck_name)
                    .with_context(|| format!("resetting deck {deck_name}"))?;
                session.replace_deck(deck);
                writeln!(out, "Progress reset.")?;
                show_current(&session, &mut out)?;
            }
            Command::Answer(text) if session.is_resolved() => {
                if text.trim().is_empty() {
                    let shown = session.next().map(|_| ());
                    navigated(shown, &session, &mut out)?;
                } else {
                    writeln!(out, "Press Enter for the next card.")?;
                }
            }
            Command::Answer(text) => match session.submit(text) {
                Ok(outcome) => {
                    writeln!(out, "{}", display::feedback(&outcome))?;
                    if outcome.is_recorded() {
                        loader
                            .save(session.deck())
                            .with_context(|| format!("saving deck {deck_name}"))?;
                        if let Some(card) = session.current() {
                            writeln!(out, "History: {}", display::history(card))?;
                        }
                    }
                }
                Err(DrillError::EmptyDeck) => writeln!(out, "No cards in this deck yet.")?,
                Err(e) => return Err(e.into()),
            },
        }
        out.flush()?;
    }

    Ok(())
}

fn navigated<W: Write>(
    shown: drill_core::Result<()>,
    session: &Session,
    out: &mut W,
) -> anyhow::Result<()> {
    match shown {
        Ok(()) => show_current(session, out),
        Err(DrillError::EmptyDeck) => {
            writeln!(out, "No cards in this deck yet.")?;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn show_current<W: Write>(session: &Session, out: &mut W) -> anyhow::Result<()> {
    match session.current() {
        Some(card) => show_card(card, out),
        None => {
            writeln!(out, "No cards in this deck yet.")?;
            Ok(())
        }
    }
}

fn show_card<W: Write>(card: &Card, out: &mut W) -> anyhow::Result<()> {
    writeln!(out)?;
    writeln!(out, "Q: {}", card.question)?;
    writeln!(out, "History: {}", display::history(card))?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use drill_core::{MemorySource, MemoryStore, Navigation};
    use std::io::Cursor;

    const CAPITALS: &str = r#"[
        {"question": "Capital of France?", "answer": "Paris"},
        {"question": "Capital of Italy?", "answer": "Rome"}
    ]"#;

    fn loader() -> DeckLoader<MemorySource, MemoryStore> {
        let mut source = MemorySource::new();
        source.insert("capitals.json", CAPITALS);
        source.insert("empty.json", "[]");
        DeckLoader::new(source, MemoryStore::new())
    }

    fn run_script<S: DeckSource, T: DeckStore>(
        loader: &mut DeckLoader<S, T>,
        deck: &str,
        script: &str,
    ) -> String {
        let mut out = Vec::new();
        drive(loader, deck, SessionSettings::default(), Cursor::new(script), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn command_parsing() {
        assert_eq!(Command::parse(":next"), Command::Next);
        assert_eq!(Command::parse(" :q "), Command::Quit);
        assert_eq!(Command::parse(":prev"), Command::Previous);
        assert_eq!(Command::parse("Paris\r"), Command::Answer("Paris"));
        assert_eq!(Command::parse(""), Command::Answer(""));
    }

    #[test]
    fn answering_saves_progress() {
        let mut loader = loader();
        let output = run_script(&mut loader, "capitals.json", "paris\n\n:quit\n");

        assert!(output.contains("Q: Capital of France?"));
        assert!(output.contains("Perfect!"));
        assert!(output.contains("Q: Capital of Italy?"));

        let deck = loader.load("capitals.json").unwrap();
        assert_eq!(deck.cards[0].total_attempts, 1);
        assert_eq!(deck.cards[1].total_attempts, 0);
    }

    #[test]
    fn wrong_answers_reveal_after_three_tries() {
        let mut loader = loader();
        let output = run_script(&mut loader, "capitals.json", "London\nBerlin\nLyon\nParis\n");

        assert!(output.contains("Remaining attempts: 2"));
        assert!(output.contains("Remaining attempts: 1"));
        assert!(output.contains("Wrong! Answer: Paris"));
        assert!(output.contains("Press Enter for the next card."));

        let deck = loader.load("capitals.json").unwrap();
        assert_eq!(deck.cards[0].attempt_history.successes(), 0);
        assert_eq!(deck.cards[0].total_attempts, 1);
    }

    #[test]
    fn progress_and_reset() {
        let mut loader = loader();
        let script = "Paris\n:progress\n:reset\n:progress\n";
        let output = run_script(&mut loader, "capitals.json", script);

        assert!(output.contains("Total attempts: 1"));
        assert!(output.contains("Progress reset."));
        assert!(output.contains("Last studied: not studied yet"));
        assert_eq!(loader.load("capitals.json").unwrap().progress().total_attempts, 0);
    }

    #[test]
    fn progress_persists_in_data_dir_between_runs() {
        let decks = tempfile::tempdir().unwrap();
        let data = tempfile::tempdir().unwrap();
        std::fs::write(decks.path().join("capitals.json"), CAPITALS).unwrap();

        let file_loader = || {
            DeckLoader::new(
                DirectorySource::new(decks.path()),
                FileStore::new(data.path()),
            )
        };

        run_script(&mut file_loader(), "capitals.json", "Paris\n:quit\n");
        let output = run_script(&mut file_loader(), "capitals.json", ":progress\n");

        assert!(output.contains("Q: Capital of France?\nHistory: ●\n"));
        assert!(output.contains("Total attempts: 1"));
        assert!(data.path().join("capitals.json").is_file());
    }

    #[test]
    fn empty_deck_is_reported() {
        let mut loader = loader();
        let output = run_script(&mut loader, "empty.json", "anything\n:next\n");
        assert_eq!(output.matches("No cards in this deck yet.").count(), 3);
    }

    #[test]
    fn priority_pick_returns_to_missed_card() {
        let mut loader = loader();
        let mut out = Vec::new();
        let settings = SessionSettings {
            navigation: Navigation::Priority,
            ..Default::default()
        };
        drive(
            &mut loader,
            "capitals.json",
            settings,
            Cursor::new("x\nx\nx\n\nRome\n:pick\n"),
            &mut out,
        )
        .unwrap();
        let output = String::from_utf8(out).unwrap();
        assert!(output.ends_with("Q: Capital of France?\nHistory: ○\n"));
    }

    #[test]
    fn unknown_deck_fails() {
        let mut loader = loader();
        let mut out = Vec::new();
        let result = drive(
            &mut loader,
            "missing.json",
            SessionSettings::default(),
            Cursor::new(""),
            &mut out,
        );
        assert!(result.is_err());
    }
}

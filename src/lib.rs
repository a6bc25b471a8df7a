use clap::Parser;
use std::{fmt::Display, path::PathBuf, str::FromStr};

use deck::{load_cards, Card, DeckError};
use modes::{mistakes::list_mistakes, practice::run_practice};
use progress::{JsonProgressStore, MemoryProgressStore, ProgressError, ProgressStore};
use session::{Practice, SessionError, Tally};
use terminal::TerminalWrapper;

mod cli;
pub mod deck;
mod event;
mod logging;
mod modes;
pub mod progress;
pub mod session;
mod terminal;

pub fn run() -> Result<Summary, QuizrError> {
    let cli = cli::QuizrCli::parse();
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => progress::get_home_folder()?,
    };

    if let Err(err) = logging::init_logging(&data_dir) {
        eprintln!("Unable to set up logging in {}: {err}", data_dir.display());
    }
    log::info!("quizr {} starting in {} mode", env!("CARGO_PKG_VERSION"), cli.mode);

    let cards = load_cards(cli.paths)?;

    match (cli.mode, cli.no_save) {
        (Mode::Mistakes, true) => {
            list_mistakes(&cards, &MemoryProgressStore::new(), &mut std::io::stdout())
                .map(Summary::Listed)
        }
        (Mode::Mistakes, false) => {
            list_mistakes(&cards, &JsonProgressStore::new(data_dir), &mut std::io::stdout())
                .map(Summary::Listed)
        }
        (Mode::Practice, true) => practice(cards, MemoryProgressStore::new()),
        (Mode::Practice, false) => practice(cards, progress_store(data_dir)),
    }
}

fn progress_store(data_dir: PathBuf) -> JsonProgressStore {
    log::debug!("Keeping progress in {}", data_dir.display());
    JsonProgressStore::new(data_dir)
}

fn practice<S: ProgressStore>(cards: Vec<Card>, store: S) -> Result<Summary, QuizrError> {
    let mut practice = Practice::new(cards, store)?;

    std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| -> Result<(), QuizrError> {
        //NOTE: From this point, stdout/stderr will not be usable, hence we
        //need to catch any panics, since they are not loggable. Mapping to
        //QuizrError allows us to gracefully exit and log the panic.
        let term = &mut TerminalWrapper::new()?;
        run_practice(term, &mut practice)
    }))
    .map_err(|err| {
        let message = if let Some(msg) = err.downcast_ref::<String>() {
            msg.clone()
        } else if let Some(msg) = err.downcast_ref::<&str>() {
            (*msg).to_owned()
        } else {
            "Unknown panic occurred".to_owned()
        };
        log::error!("Panicked: {message}");
        QuizrError::Panic(message)
    })??;

    let tally = practice.tally();
    log::info!(
        "Session ended: {} submitted, {} correct",
        tally.submitted,
        tally.correct
    );
    Ok(Summary::Practiced(tally))
}

pub enum Summary {
    Practiced(Tally),
    Listed(usize),
}

#[derive(Clone, Debug)]
enum Mode {
    Practice,
    Mistakes,
}

impl FromStr for Mode {
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.to_lowercase();

        if s == "practice" {
            Ok(Self::Practice)
        } else if s == "mistakes" {
            Ok(Self::Mistakes)
        } else {
            Err(format!("Mode argument not recognized: {s}"))
        }
    }

    type Err = String;
}

impl Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Mode::Practice => "practice",
            Mode::Mistakes => "mistakes",
        })
    }
}

#[derive(Debug)]
pub enum QuizrError {
    Deck(Box<DeckError>),
    Ui(UiError),
    Progress(ProgressError),
    Session(SessionError),
    Panic(String),
}

impl Display for QuizrError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Deck(err) => f.write_fmt(format_args!("Deck: {err}")),
            Self::Ui(err) => f.write_fmt(format_args!("Ui: {err}")),
            Self::Progress(err) => f.write_fmt(format_args!("Progress: {err}")),
            Self::Session(err) => f.write_fmt(format_args!("Session: {err}")),
            Self::Panic(err) => f.write_fmt(format_args!("Panicked: {err}")),
        }
    }
}

impl From<DeckError> for QuizrError {
    fn from(err: DeckError) -> Self {
        Self::Deck(Box::new(err))
    }
}

impl From<UiError> for QuizrError {
    fn from(err: UiError) -> Self {
        Self::Ui(err)
    }
}

impl From<ProgressError> for QuizrError {
    fn from(err: ProgressError) -> Self {
        Self::Progress(err)
    }
}

impl From<SessionError> for QuizrError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Persistence(err) => Self::Progress(err),
            err => Self::Session(err),
        }
    }
}

#[derive(Debug)]
pub enum UiError {
    IoError(std::io::Error),
}

impl Display for UiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(err) => f.write_fmt(format_args!("IoError: {err}")),
        }
    }
}

impl From<std::io::Error> for UiError {
    fn from(err: std::io::Error) -> Self {
        UiError::IoError(err)
    }
}

use std::path::PathBuf;

use clap::Parser;

use crate::Mode;

#[derive(Parser, Debug)]
#[command(name = "quizr", version = env!("CARGO_PKG_VERSION"))]
pub struct QuizrCli {
    #[arg(short = 'm', long = "mode", default_value_t = Mode::Practice, value_name = "MODE", help = "Program mode", long_help = MODE_HELP)]
    pub mode: Mode,
    #[arg(short = 'd', long = "data-dir", value_name = "DIR", help = "Directory to keep progress in.", long_help = DATA_DIR_HELP)]
    pub data_dir: Option<PathBuf>,
    #[arg(long = "no-save", help = "Don't persist progress", long_help = NO_SAVE_HELP, default_value_t = false)]
    pub no_save: bool,
    #[arg(required = true, help = "Question JSON file/dir paths", long_help = PATHS_HELP)]
    pub paths: Vec<String>,
}

const MODE_HELP: &str = r#"Program mode. Possible values:
    practice - Answer every question once, in a random order
    mistakes - List the questions you have missed, most missed first"#;
const DATA_DIR_HELP: &str = r#"Directory to keep progress in. Defaults to ~/.config/quizr.
Answered questions are kept in answered_questions.json and miss counts in wrong_answers.json."#;
const NO_SAVE_HELP: &str = r#"Keep progress in memory only. Nothing is read from or written to the data directory, apart from the log."#;
const PATHS_HELP: &str = r#"Paths to load questions from. Can be individual files or directories.
Question ids are assigned in load order, so keep the order stable between runs."#;

use std::{fs::OpenOptions, path::Path};

use env_logger::{Env, Target};

const LOG_ENV: &str = "QUIZR_LOG";
const LOG_FILE_NAME: &str = "quizr.log";

///The terminal belongs to the interactive screen, so log lines are appended
///to a file in the data directory instead of stderr.
pub fn init_logging(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE_NAME))?;

    env_logger::Builder::from_env(Env::new().filter_or(LOG_ENV, "info"))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_secs()
        .try_init()
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))
}

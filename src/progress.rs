use std::{
    fmt::Display,
    path::{Path, PathBuf},
};

use hashbrown::{HashMap, HashSet};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::deck::CardId;

#[derive(Debug)]
pub enum ProgressError {
    NoHomeDirError(),
    PathIsDir(PathBuf),
    IoError(PathBuf, std::io::Error),
    SerdeError(PathBuf, serde_json::Error),
}

impl Display for ProgressError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoHomeDirError() => f.write_str("Unable to find user home directory"),
            Self::PathIsDir(path) => f.write_fmt(format_args!(
                "Progress file is directory: {}",
                path.to_str().unwrap_or("unknown")
            )),
            Self::IoError(path, err) => f.write_fmt(format_args!(
                "IoError: {err}, path: {}",
                path.to_str().unwrap_or("unknown")
            )),
            Self::SerdeError(path, err) => f.write_fmt(format_args!(
                "SerdeError: {err}, path: {}",
                path.to_str().unwrap_or("unknown")
            )),
        }
    }
}

pub type AnsweredIds = HashSet<CardId>;

///Per-card count of answers that were not fully correct. Persisted with
///stringified card ids as keys.
#[derive(Serialize, Deserialize, Default, Clone, PartialEq, Eq, Debug)]
#[serde(transparent)]
pub struct WrongCounts(HashMap<CardId, u32>);

impl WrongCounts {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    pub fn get(&self, id: CardId) -> u32 {
        self.0.get(&id).copied().unwrap_or(0)
    }

    pub fn increment(&mut self, id: CardId) {
        *self.0.entry(id).or_insert(0) += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    ///Cards with a non-zero count, most missed first, ties broken by id.
    pub fn ranked(&self) -> Vec<(CardId, u32)> {
        let mut ranked = self
            .0
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(id, count)| (*id, *count))
            .collect::<Vec<_>>();
        ranked.sort_by(|(id_a, a), (id_b, b)| b.cmp(a).then(id_a.cmp(id_b)));
        ranked
    }
}

impl FromIterator<(CardId, u32)> for WrongCounts {
    fn from_iter<I: IntoIterator<Item = (CardId, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

///Durable storage for the two progress documents. Loading a record that was
///never written (or was cleared) yields the empty default.
pub trait ProgressStore {
    fn load_answered_ids(&self) -> Result<AnsweredIds, ProgressError>;

    fn save_answered_ids(&mut self, ids: &AnsweredIds) -> Result<(), ProgressError>;

    ///Deletes the answered ids record entirely.
    fn clear_answered_ids(&mut self) -> Result<(), ProgressError>;

    fn load_wrong_counts(&self) -> Result<WrongCounts, ProgressError>;

    fn save_wrong_counts(&mut self, counts: &WrongCounts) -> Result<(), ProgressError>;
}

const ANSWERED_FILE_NAME: &str = "answered_questions.json";
const WRONG_COUNTS_FILE_NAME: &str = "wrong_answers.json";
const DEFAULT_HOME_DATA_PATH: &str = ".config/quizr";

pub struct JsonProgressStore {
    answered_path: PathBuf,
    wrong_counts_path: PathBuf,
}

impl JsonProgressStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            answered_path: dir.join(ANSWERED_FILE_NAME),
            wrong_counts_path: dir.join(WRONG_COUNTS_FILE_NAME),
        }
    }

    pub fn in_user_home() -> Result<Self, ProgressError> {
        get_home_folder().map(Self::new)
    }
}

impl ProgressStore for JsonProgressStore {
    fn load_answered_ids(&self) -> Result<AnsweredIds, ProgressError> {
        load_from_file(&self.answered_path)
    }

    fn save_answered_ids(&mut self, ids: &AnsweredIds) -> Result<(), ProgressError> {
        save_to_file(&self.answered_path, ids)
    }

    fn clear_answered_ids(&mut self) -> Result<(), ProgressError> {
        match std::fs::remove_file(&self.answered_path) {
            Ok(()) => {
                log::debug!("Removed {}", self.answered_path.display());
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(ProgressError::IoError(self.answered_path.clone(), err)),
        }
    }

    fn load_wrong_counts(&self) -> Result<WrongCounts, ProgressError> {
        load_from_file(&self.wrong_counts_path)
    }

    fn save_wrong_counts(&mut self, counts: &WrongCounts) -> Result<(), ProgressError> {
        save_to_file(&self.wrong_counts_path, counts)
    }
}

pub fn get_home_folder() -> Result<PathBuf, ProgressError> {
    let path = dirs::home_dir();
    if let Some(mut path) = path {
        path.push(DEFAULT_HOME_DATA_PATH);
        Ok(path)
    } else {
        Err(ProgressError::NoHomeDirError())
    }
}

fn load_from_file<T: DeserializeOwned + Default>(path: &Path) -> Result<T, ProgressError> {
    if let Ok(metadata) = std::fs::metadata(path) {
        if metadata.is_file() {
            let json = std::fs::read_to_string(path)
                .map_err(|err| ProgressError::IoError(path.to_owned(), err))?;
            let value = serde_json::from_str(&json)
                .map_err(|err| ProgressError::SerdeError(path.to_owned(), err))?;

            log::debug!("Loaded {}", path.display());
            Ok(value)
        } else {
            Err(ProgressError::PathIsDir(path.to_owned()))
        }
    } else {
        Ok(T::default())
    }
}

fn save_to_file<T: Serialize>(path: &Path, value: &T) -> Result<(), ProgressError> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)
                .map_err(|err| ProgressError::IoError(path.to_owned(), err))?;
        }
    }

    let json = serde_json::to_string(value)
        .map_err(|err| ProgressError::SerdeError(path.to_owned(), err))?;

    //NOTE: Written to a sibling first so a failed write never leaves a
    //truncated document behind
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json).map_err(|err| ProgressError::IoError(tmp.clone(), err))?;
    std::fs::rename(&tmp, path).map_err(|err| ProgressError::IoError(path.to_owned(), err))?;

    log::debug!("Saved {}", path.display());
    Ok(())
}

///Progress kept only for the lifetime of the process.
#[derive(Default)]
pub struct MemoryProgressStore {
    answered: Option<AnsweredIds>,
    wrong_counts: Option<WrongCounts>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_answered_record(&self) -> bool {
        self.answered.is_some()
    }
}

impl ProgressStore for MemoryProgressStore {
    fn load_answered_ids(&self) -> Result<AnsweredIds, ProgressError> {
        Ok(self.answered.clone().unwrap_or_default())
    }

    fn save_answered_ids(&mut self, ids: &AnsweredIds) -> Result<(), ProgressError> {
        self.answered = Some(ids.clone());
        Ok(())
    }

    fn clear_answered_ids(&mut self) -> Result<(), ProgressError> {
        self.answered = None;
        Ok(())
    }

    fn load_wrong_counts(&self) -> Result<WrongCounts, ProgressError> {
        Ok(self.wrong_counts.clone().unwrap_or_default())
    }

    fn save_wrong_counts(&mut self, counts: &WrongCounts) -> Result<(), ProgressError> {
        self.wrong_counts = Some(counts.clone());
        Ok(())
    }
}

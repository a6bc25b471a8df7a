/*
 * Copyright (C) 2024 Clownvin <123clownvin@gmail.com>
 *
 * This file is part of Quizr.
 *
 * Quizr is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Quizr is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Quizr.  If not, see <http://www.gnu.org/licenses/>.
 */

use std::{
    collections::BTreeSet,
    ffi::OsStr,
    fmt::Display,
    fs,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub type OptionKey = String;

///A single multiple choice/multi select question. Cards are immutable once
///loaded, and are identified by their position in the loaded sequence.
///
///Example:
///```
///# use quizr::deck::Card;
///let json = r#"{
///  "question": "Which of these are prime?",
///  "instruction": "Choose two.",
///  "options": { "A": "2", "B": "4", "C": "7" },
///  "answers": ["A", "C"]
///}"#;
///assert!(serde_json::from_str::<Card>(json)
///  .is_ok_and(|card| {
///    card.options.len() == 3 && card.answers.len() == 2
///  }));
///```
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct Card {
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
    pub options: IndexMap<OptionKey, String>,
    pub answers: BTreeSet<OptionKey>,
}

impl Card {
    pub fn is_answer(&self, key: &str) -> bool {
        self.answers.contains(key)
    }

    pub fn answers_string(&self) -> String {
        self.answers
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

///Stable 0-based index into the loaded card sequence.
#[derive(Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
#[serde(transparent)]
pub struct CardId(usize);

impl CardId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for CardId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("#{}", self.0))
    }
}

#[derive(Debug)]
pub enum DeckError {
    IoError(PathBuf, std::io::Error),
    SerdeError(PathBuf, serde_json::Error),
    InvalidCard(PathBuf, usize, CardError),
}

impl Display for DeckError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(path, err) => f.write_fmt(format_args!(
                "IoError: {err}, path: {}",
                path.to_str().unwrap_or("unknown")
            )),
            Self::SerdeError(path, err) => f.write_fmt(format_args!(
                "SerdeError: {err}, path: {}",
                path.to_str().unwrap_or("unknown")
            )),
            Self::InvalidCard(path, index, err) => f.write_fmt(format_args!(
                "InvalidCard: Card {index} in \"{}\" is invalid: {err}",
                path.to_str().unwrap_or("unknown")
            )),
        }
    }
}

#[derive(Debug)]
pub enum CardError {
    NoOptions(Card),
    NoAnswers(Card),
    UnknownAnswer(Card, OptionKey),
}

impl Display for CardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoOptions(card) => f.write_fmt(format_args!(
                "\"{}\" does not have any options",
                card.question
            )),
            Self::NoAnswers(card) => f.write_fmt(format_args!(
                "\"{}\" does not have any answers",
                card.question
            )),
            Self::UnknownAnswer(card, key) => f.write_fmt(format_args!(
                "\"{}\" lists answer \"{key}\", which is not one of its options",
                card.question
            )),
        }
    }
}

///Loads every card from the given paths, in order. Card ids are assigned by
///position in the resulting sequence.
pub fn load_cards<P: Into<PathBuf>>(
    paths: impl IntoIterator<Item = P>,
) -> Result<Vec<Card>, DeckError> {
    let cards = paths.into_iter().try_fold(vec![], |mut cards, path| {
        cards.extend(load_cards_from_path(path.into())?.into_iter().flatten());
        Ok(cards)
    })?;

    log::debug!("Loaded {} cards", cards.len());

    Ok(cards)
}

fn load_cards_from_path(path: PathBuf) -> Result<Option<Vec<Card>>, DeckError> {
    let metadata = fs::metadata(&path).map_err(|err| DeckError::IoError(path.clone(), err))?;

    if metadata.is_dir() {
        load_cards_from_dir(path).map(Some)
    } else if file_extension(&path).is_some_and(|ext| ext.to_lowercase() == "json") {
        load_cards_from_file(path).map(Some)
    } else {
        Ok(None)
    }
}

fn file_extension(path: &Path) -> Option<&str> {
    path.extension().and_then(OsStr::to_str)
}

fn load_cards_from_dir(path: PathBuf) -> Result<Vec<Card>, DeckError> {
    let mut files = fs::read_dir(&path)
        .map_err(|err| DeckError::IoError(path, err))?
        .filter_map(|file| file.ok())
        .map(|file| file.path())
        .collect::<Vec<_>>();

    //NOTE: read_dir order is platform dependent, and ids must be stable
    files.sort();

    files.into_iter().try_fold(vec![], |mut cards, file| {
        cards.extend(load_cards_from_path(file)?.into_iter().flatten());
        Ok(cards)
    })
}

fn load_cards_from_file(path: PathBuf) -> Result<Vec<Card>, DeckError> {
    let json = fs::read_to_string(&path).map_err(|err| DeckError::IoError(path.clone(), err))?;
    let cards: Vec<Card> =
        serde_json::from_str(&json).map_err(|err| DeckError::SerdeError(path.clone(), err))?;

    for (index, card) in cards.iter().enumerate() {
        validate_card(card).map_err(|err| DeckError::InvalidCard(path.clone(), index, err))?;
    }

    Ok(cards)
}

fn validate_card(card: &Card) -> Result<(), CardError> {
    if card.options.is_empty() {
        return Err(CardError::NoOptions(card.clone()));
    }

    if card.answers.is_empty() {
        return Err(CardError::NoAnswers(card.clone()));
    }

    if let Some(key) = card
        .answers
        .iter()
        .find(|key| !card.options.contains_key(*key))
    {
        return Err(CardError::UnknownAnswer(card.clone(), key.clone()));
    }

    Ok(())
}

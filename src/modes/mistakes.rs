use std::io::Write;

use crate::{deck::Card, progress::ProgressStore, QuizrError, UiError};

///Writes every card that has been missed at least once, most missed first.
///Returns how many cards were listed.
pub fn list_mistakes(
    cards: &[Card],
    store: &impl ProgressStore,
    out: &mut impl Write,
) -> Result<usize, QuizrError> {
    let ranked = store.load_wrong_counts()?.ranked();
    let mut listed = 0;

    for (id, count) in ranked {
        //NOTE: Counts can outlive the card they were recorded against if the
        //question file shrinks
        let Some(card) = cards.get(id.index()) else {
            log::debug!("Skipping wrong count for missing card {id}");
            continue;
        };

        writeln!(out, "{count:>4}  {:<6} {}", id.to_string(), card.question)
            .map_err(UiError::IoError)?;
        listed += 1;
    }

    if listed == 0 {
        writeln!(out, "No mistakes recorded yet.").map_err(UiError::IoError)?;
    }

    Ok(listed)
}

use std::{collections::BTreeSet, fmt::Display};

use crate::{
    deck::{Card, CardId, OptionKey},
    progress::{AnsweredIds, ProgressError, ProgressStore},
};

use super::state::SessionState;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Verdict {
    Correct,
    PartiallyCorrect,
    Incorrect,
}

impl Verdict {
    pub fn classify(answers: &BTreeSet<OptionKey>, chosen: &BTreeSet<OptionKey>) -> Self {
        if answers == chosen {
            Self::Correct
        } else if answers.intersection(chosen).next().is_some() {
            Self::PartiallyCorrect
        } else {
            Self::Incorrect
        }
    }

    pub fn is_correct(self) -> bool {
        self == Self::Correct
    }
}

impl Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Correct => "Correct",
            Self::PartiallyCorrect => "Partially correct",
            Self::Incorrect => "Incorrect",
        })
    }
}

pub(super) enum Submission {
    NoSelection,
    AlreadySubmitted(Verdict),
    ///Card was answered earlier and is being re-asked after going back. The
    ///verdict is shown but nothing is scored again.
    Revisited {
        next: SessionState,
        verdict: Verdict,
    },
    Scored {
        next: SessionState,
        verdict: Verdict,
    },
}

pub(super) fn submit(
    state: &SessionState,
    card: &Card,
    chosen: &BTreeSet<OptionKey>,
) -> Submission {
    if chosen.is_empty() {
        return Submission::NoSelection;
    }

    if state.has_submitted {
        if let Some(verdict) = state.last_verdict {
            return Submission::AlreadySubmitted(verdict);
        }
    }

    let verdict = Verdict::classify(&card.answers, chosen);
    let id = state.current();
    let mut next = state.clone();
    next.has_submitted = true;
    next.last_verdict = Some(verdict);

    if state.answered.contains(&id) {
        Submission::Revisited { next, verdict }
    } else {
        next.answered.insert(id);
        Submission::Scored { next, verdict }
    }
}

///Persists a scored submission. Both documents are written or, on failure, the
///answered ids document is put back the way it was.
pub(super) fn record(
    store: &mut impl ProgressStore,
    id: CardId,
    verdict: Verdict,
    previous: &AnsweredIds,
    next: &AnsweredIds,
) -> Result<(), ProgressError> {
    let wrong_counts = if verdict.is_correct() {
        None
    } else {
        let mut counts = store.load_wrong_counts()?;
        counts.increment(id);
        Some(counts)
    };

    store.save_answered_ids(next)?;

    if let Some(counts) = wrong_counts {
        if let Err(err) = store.save_wrong_counts(&counts) {
            if let Err(restore_err) = store.save_answered_ids(previous) {
                log::error!("Unable to restore answered ids after failed write: {restore_err}");
            }
            return Err(err);
        }
        log::debug!("Card {id} missed {} time(s)", counts.get(id));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use crate::deck::tests::card;

    use super::Verdict;

    fn keys(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|key| (*key).to_owned()).collect()
    }

    #[test]
    fn classify_exact_partial_and_disjoint() {
        let card = card("q", &["A", "B", "C"], &["A", "C"]);

        assert_eq!(
            Verdict::classify(&card.answers, &keys(&["A", "C"])),
            Verdict::Correct
        );
        assert_eq!(
            Verdict::classify(&card.answers, &keys(&["A"])),
            Verdict::PartiallyCorrect
        );
        assert_eq!(
            Verdict::classify(&card.answers, &keys(&["A", "B", "C"])),
            Verdict::PartiallyCorrect
        );
        assert_eq!(
            Verdict::classify(&card.answers, &keys(&["B"])),
            Verdict::Incorrect
        );
    }

    #[test]
    fn verdict_display() {
        assert_eq!(Verdict::PartiallyCorrect.to_string(), "Partially correct");
        assert!(Verdict::Correct.is_correct());
        assert!(!Verdict::Incorrect.is_correct());
    }
}

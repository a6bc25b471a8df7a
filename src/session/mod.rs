use std::{collections::BTreeSet, fmt::Display};

use rand::{rngs::ThreadRng, Rng};

use crate::{
    deck::{Card, CardId, OptionKey},
    progress::{AnsweredIds, ProgressError, ProgressStore},
};

mod lifecycle;
mod navigation;
mod scoring;
mod state;

pub use scoring::Verdict;
pub use state::{History, SessionState};

use navigation::Step;
use scoring::Submission;

#[derive(Debug)]
pub enum SessionError {
    EmptyCardStore,
    AdvanceWithoutSubmission,
    Persistence(ProgressError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCardStore => f.write_str("EmptyCardStore: No cards were found to practice"),
            Self::AdvanceWithoutSubmission => {
                f.write_str("Please submit an answer before moving on")
            }
            Self::Persistence(err) => f.write_fmt(format_args!("Persistence: {err}")),
        }
    }
}

impl From<ProgressError> for SessionError {
    fn from(err: ProgressError) -> Self {
        Self::Persistence(err)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Refresh {
    Ready,
    ///Every card was answered, so progress was cleared and a new order drawn.
    Restarted,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SubmitOutcome {
    Scored(Verdict),
    ///The card was already answered before going back to it. Shown, but not
    ///scored or counted again.
    Revisited(Verdict),
    NoSelection,
    AlreadySubmitted(Verdict),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BackOutcome {
    Moved,
    AtStart,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NextOutcome {
    Moved,
    NoneRemaining,
}

///Submissions made through this `Practice`, across restarts.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct Tally {
    pub submitted: usize,
    pub correct: usize,
}

///One practice session over a fixed set of cards. The session state is
///created on first use, and dropped again by `reset`.
pub struct Practice<S, R = ThreadRng> {
    cards: Vec<Card>,
    store: S,
    rng: R,
    state: Option<SessionState>,
    tally: Tally,
}

impl<S: ProgressStore> Practice<S> {
    pub fn new(cards: Vec<Card>, store: S) -> Result<Self, SessionError> {
        Self::with_rng(cards, store, rand::thread_rng())
    }
}

impl<S: ProgressStore, R: Rng> Practice<S, R> {
    pub fn with_rng(cards: Vec<Card>, store: S, rng: R) -> Result<Self, SessionError> {
        if cards.is_empty() {
            return Err(SessionError::EmptyCardStore);
        }

        Ok(Self {
            cards,
            store,
            rng,
            state: None,
            tally: Tally::default(),
        })
    }

    ///Brings the session up to date before showing it: starts it if needed,
    ///and restarts it once every card has been answered.
    pub fn refresh(&mut self) -> Result<Refresh, SessionError> {
        let total = self.cards.len();

        match self.state.as_ref().map(lifecycle::is_complete) {
            None => {
                let (state, refresh) =
                    lifecycle::initialize(total, &mut self.store, &mut self.rng)?;
                self.state = Some(state);
                Ok(refresh)
            }
            Some(true) => {
                self.state = Some(lifecycle::restart(total, &mut self.store, &mut self.rng)?);
                log::info!("All {total} cards answered, restarted session");
                Ok(Refresh::Restarted)
            }
            Some(false) => Ok(Refresh::Ready),
        }
    }

    pub fn submit<K: Into<OptionKey>>(
        &mut self,
        keys: impl IntoIterator<Item = K>,
    ) -> Result<SubmitOutcome, SessionError> {
        let chosen = keys.into_iter().map(Into::into).collect::<BTreeSet<_>>();
        self.start_if_needed()?;
        let state = self
            .state
            .as_ref()
            .expect("Unable to find session state after starting");
        let id = state.current();
        let card = card_at(&self.cards, id);

        match scoring::submit(state, card, &chosen) {
            Submission::NoSelection => Ok(SubmitOutcome::NoSelection),
            Submission::AlreadySubmitted(verdict) => Ok(SubmitOutcome::AlreadySubmitted(verdict)),
            Submission::Revisited { next, verdict } => {
                self.state = Some(next);
                Ok(SubmitOutcome::Revisited(verdict))
            }
            Submission::Scored { next, verdict } => {
                scoring::record(&mut self.store, id, verdict, &state.answered, &next.answered)?;
                log::debug!("Card {id} scored {verdict:?}");
                self.state = Some(next);
                self.tally.submitted += 1;
                if verdict.is_correct() {
                    self.tally.correct += 1;
                }
                Ok(SubmitOutcome::Scored(verdict))
            }
        }
    }

    pub fn go_back(&mut self) -> Result<BackOutcome, SessionError> {
        match navigation::go_back(self.session()?) {
            Step::Moved(next) => {
                self.state = Some(next);
                Ok(BackOutcome::Moved)
            }
            Step::Stayed => Ok(BackOutcome::AtStart),
        }
    }

    pub fn go_next(&mut self) -> Result<NextOutcome, SessionError> {
        let state = self.session()?;

        if !state.has_submitted() {
            log::warn!("Tried to advance past card {} without submitting", state.current());
            return Err(SessionError::AdvanceWithoutSubmission);
        }

        match navigation::go_next(state) {
            Step::Moved(next) => {
                self.state = Some(next);
                Ok(NextOutcome::Moved)
            }
            Step::Stayed => Ok(NextOutcome::NoneRemaining),
        }
    }

    ///Forgets answered cards and history. Wrong counts are left alone.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        lifecycle::reset(&mut self.store)?;
        self.state = None;
        Ok(())
    }

    fn start_if_needed(&mut self) -> Result<(), SessionError> {
        if self.state.is_none() {
            self.refresh()?;
        }
        Ok(())
    }

    fn session(&mut self) -> Result<&SessionState, SessionError> {
        self.start_if_needed()?;
        Ok(self
            .state
            .as_ref()
            .expect("Unable to find session state after starting"))
    }

    pub fn state(&self) -> Option<&SessionState> {
        self.state.as_ref()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    #[cfg(test)]
    pub(crate) fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn current_id(&self) -> Option<CardId> {
        self.state.as_ref().map(SessionState::current)
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.current_id().map(|id| card_at(&self.cards, id))
    }

    ///`(history position + 1, total cards)`, or zero progress before the
    ///session has started.
    pub fn progress(&self) -> (usize, usize) {
        let total = self.cards.len();
        self.state
            .as_ref()
            .map(|state| navigation::progress(state, total))
            .unwrap_or((0, total))
    }

    ///True once every card has been answered. The next `refresh` restarts.
    pub fn is_complete(&self) -> bool {
        self.state.as_ref().is_some_and(lifecycle::is_complete)
    }

    pub fn last_verdict(&self) -> Option<Verdict> {
        self.state.as_ref().and_then(SessionState::last_verdict)
    }

    pub fn has_submitted(&self) -> bool {
        self.state
            .as_ref()
            .is_some_and(SessionState::has_submitted)
    }

    pub fn answered_ids(&self) -> AnsweredIds {
        self.state
            .as_ref()
            .map(|state| state.answered.clone())
            .unwrap_or_default()
    }

    pub fn history(&self) -> &[CardId] {
        self.state
            .as_ref()
            .map(|state| state.history.visited())
            .unwrap_or(&[])
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }
}

fn card_at(cards: &[Card], id: CardId) -> &Card {
    cards
        .get(id.index())
        .unwrap_or_else(|| panic!("Card id {id} is out of range for {} cards", cards.len()))
}

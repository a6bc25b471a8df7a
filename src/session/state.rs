use crate::{deck::CardId, progress::AnsweredIds};

use super::scoring::Verdict;

///Linear visitation sequence with a cursor. Always holds at least one id, and
///`visited[cursor]` is the card being shown.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct History {
    visited: Vec<CardId>,
    cursor: usize,
}

impl History {
    pub fn starting_at(id: CardId) -> Self {
        Self {
            visited: vec![id],
            cursor: 0,
        }
    }

    pub fn current(&self) -> CardId {
        self.visited[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn visited(&self) -> &[CardId] {
        &self.visited
    }

    pub fn back(&self) -> Option<Self> {
        (self.cursor > 0).then(|| Self {
            visited: self.visited.clone(),
            cursor: self.cursor - 1,
        })
    }

    ///Drops anything past the cursor before appending, so revisiting an old
    ///point and moving on discards the old forward branch.
    pub fn visit(&self, id: CardId) -> Self {
        let mut visited = Vec::with_capacity(self.cursor + 2);
        visited.extend_from_slice(&self.visited[..=self.cursor]);
        visited.push(id);

        Self {
            cursor: visited.len() - 1,
            visited,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SessionState {
    pub(crate) order: Vec<CardId>,
    pub(crate) answered: AnsweredIds,
    pub(crate) history: History,
    pub(crate) has_submitted: bool,
    pub(crate) last_verdict: Option<Verdict>,
}

impl SessionState {
    ///Builds a state showing the first unanswered id of `order`, or `None`
    ///when nothing in `order` is left unanswered.
    pub fn new(order: Vec<CardId>, answered: AnsweredIds) -> Option<Self> {
        let first = order.iter().copied().find(|id| !answered.contains(id))?;

        Some(Self {
            history: History::starting_at(first),
            order,
            answered,
            has_submitted: false,
            last_verdict: None,
        })
    }

    pub fn order(&self) -> &[CardId] {
        &self.order
    }

    pub fn answered(&self) -> &AnsweredIds {
        &self.answered
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn current(&self) -> CardId {
        self.history.current()
    }

    pub fn has_submitted(&self) -> bool {
        self.has_submitted
    }

    pub fn last_verdict(&self) -> Option<Verdict> {
        self.last_verdict
    }

    pub fn unanswered(&self) -> impl Iterator<Item = CardId> + '_ {
        self.order
            .iter()
            .copied()
            .filter(|id| !self.answered.contains(id))
    }
}

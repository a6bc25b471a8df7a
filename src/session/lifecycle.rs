use rand::{seq::SliceRandom, Rng};

use crate::{
    deck::CardId,
    progress::{AnsweredIds, ProgressError, ProgressStore},
};

use super::{state::SessionState, Refresh};

pub(super) fn shuffled_order(total: usize, rng: &mut impl Rng) -> Vec<CardId> {
    let mut order = (0..total).map(CardId::new).collect::<Vec<_>>();
    order.shuffle(rng);
    order
}

///Loads persisted progress and starts a freshly shuffled session. A store
///where every card is already answered is treated as a finished session and
///restarted, which is reported as `Refresh::Restarted`.
pub(super) fn initialize(
    total: usize,
    store: &mut impl ProgressStore,
    rng: &mut impl Rng,
) -> Result<(SessionState, Refresh), ProgressError> {
    assert!(total > 0, "Cannot start a session without cards");

    let mut answered = store.load_answered_ids()?;
    let stale = answered.iter().filter(|id| id.index() >= total).count();
    if stale > 0 {
        log::warn!("Ignoring {stale} answered id(s) with no matching card");
        answered.retain(|id| id.index() < total);
    }

    match SessionState::new(shuffled_order(total, rng), answered) {
        Some(state) => {
            log::info!(
                "Starting session: {} of {total} cards already answered",
                state.answered.len()
            );
            Ok((state, Refresh::Ready))
        }
        None => {
            log::info!("All {total} cards were already answered, restarting");
            Ok((restart(total, store, rng)?, Refresh::Restarted))
        }
    }
}

pub(super) fn is_complete(state: &SessionState) -> bool {
    !state.answered.is_empty() && state.unanswered().next().is_none()
}

///Clears the persisted answered ids and starts over with a new order.
pub(super) fn restart(
    total: usize,
    store: &mut impl ProgressStore,
    rng: &mut impl Rng,
) -> Result<SessionState, ProgressError> {
    store.clear_answered_ids()?;

    Ok(
        SessionState::new(shuffled_order(total, rng), AnsweredIds::new())
            .expect("Unable to find an unanswered card in a fresh session"),
    )
}

///Deletes the answered ids record. Wrong counts are kept.
pub(super) fn reset(store: &mut impl ProgressStore) -> Result<(), ProgressError> {
    store.clear_answered_ids()?;
    log::info!("Practice progress reset");
    Ok(())
}

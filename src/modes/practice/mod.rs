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

use std::collections::BTreeSet;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use rand::Rng;

use widget::{PracticeWidget, PracticeWidgetState};

use crate::{
    deck::OptionKey,
    event::next_matching_event,
    progress::ProgressStore,
    session::{BackOutcome, NextOutcome, Practice, Refresh, SessionError, SubmitOutcome},
    terminal::TerminalWrapper,
    QuizrError,
};

mod widget;

#[derive(Clone, PartialEq, Eq, Debug)]
pub(crate) enum Message {
    Info(String),
    Warning(String),
    Error(String),
}

///Everything shown on screen that is not part of the session itself.
#[derive(Default)]
struct Screen {
    selected: BTreeSet<OptionKey>,
    message: Option<Message>,
}

impl Screen {
    fn toggle(&mut self, key: OptionKey) {
        if !self.selected.remove(&key) {
            self.selected.insert(key);
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
enum UserInput {
    Toggle(OptionKey),
    Submit,
    Back,
    Next,
    Reset,
    Resize,
    Quit,
}

pub fn run_practice<S: ProgressStore, R: Rng>(
    term: &mut TerminalWrapper,
    practice: &mut Practice<S, R>,
) -> Result<(), QuizrError> {
    let screen = &mut Screen::default();
    let widget_state = &mut PracticeWidgetState::default();

    screen.message = refresh(practice, screen)?;

    loop {
        let card = practice.current_card();
        term.render_stateful_widget(
            PracticeWidget::new(
                card,
                &screen.selected,
                practice.last_verdict(),
                screen.message.as_ref(),
                practice.progress(),
            ),
            widget_state,
        )?;
        let keys = card
            .map(|card| card.options.keys().cloned().collect::<Vec<_>>())
            .unwrap_or_default();

        let input = next_matching_event(|event| match_user_input(event, &keys, widget_state))?;

        match input {
            UserInput::Quit => break,
            UserInput::Resize => continue,
            input => {
                let shown = practice.current_id();

                if let Some(message) = refresh(practice, screen)? {
                    screen.message = Some(message);
                    continue;
                }

                screen.message = handle_input(practice, screen, input)?;

                if practice.current_id() != shown {
                    screen.selected.clear();
                }
            }
        }
    }

    Ok(())
}

///Runs `refresh` ahead of the next input. A message means the input should
///be dropped, either because the session restarted or because it could not be
///brought up to date.
fn refresh<S: ProgressStore, R: Rng>(
    practice: &mut Practice<S, R>,
    screen: &mut Screen,
) -> Result<Option<Message>, QuizrError> {
    match practice.refresh() {
        Ok(Refresh::Ready) => Ok(None),
        Ok(Refresh::Restarted) => {
            screen.selected.clear();
            Ok(Some(Message::Info(
                "You've answered all questions! Restarting practice session.".to_owned(),
            )))
        }
        Err(err) => error_message(err).map(Some),
    }
}

fn handle_input<S: ProgressStore, R: Rng>(
    practice: &mut Practice<S, R>,
    screen: &mut Screen,
    input: UserInput,
) -> Result<Option<Message>, QuizrError> {
    let result = match input {
        UserInput::Toggle(key) => {
            if !practice.has_submitted() {
                screen.toggle(key);
            }
            Ok(None)
        }
        UserInput::Submit => practice
            .submit(screen.selected.iter().cloned())
            .map(|outcome| match outcome {
                SubmitOutcome::NoSelection => Some(Message::Warning(
                    "Select at least one option before submitting.".to_owned(),
                )),
                SubmitOutcome::Scored(_)
                | SubmitOutcome::Revisited(_)
                | SubmitOutcome::AlreadySubmitted(_) => None,
            }),
        UserInput::Back => practice.go_back().map(|outcome| match outcome {
            BackOutcome::Moved => None,
            BackOutcome::AtStart => {
                Some(Message::Info("This is the first question.".to_owned()))
            }
        }),
        UserInput::Next => practice.go_next().map(|outcome| match outcome {
            NextOutcome::Moved => None,
            NextOutcome::NoneRemaining => {
                Some(Message::Info("That was the last unanswered question.".to_owned()))
            }
        }),
        UserInput::Reset => practice.reset().and_then(|_| {
            screen.selected.clear();
            practice.refresh()?;
            Ok(Some(Message::Info("Practice progress has been reset.".to_owned())))
        }),
        UserInput::Resize | UserInput::Quit => Ok(None),
    };

    match result {
        Ok(message) => Ok(message),
        Err(err) => error_message(err).map(Some),
    }
}

fn error_message(err: SessionError) -> Result<Message, QuizrError> {
    match err {
        SessionError::AdvanceWithoutSubmission => Ok(Message::Warning(
            "Please submit an answer before moving on.".to_owned(),
        )),
        SessionError::Persistence(err) => {
            log::error!("Unable to update progress: {err}");
            Ok(Message::Error(format!(
                "Unable to update progress, press any key to try again. ({err})"
            )))
        }
        err => Err(err.into()),
    }
}

fn match_user_input(
    event: Event,
    keys: &[OptionKey],
    state: &PracticeWidgetState,
) -> Option<UserInput> {
    match event {
        Event::Key(KeyEvent {
            kind: KeyEventKind::Press,
            code,
            modifiers,
            ..
        }) => match code {
            KeyCode::Char('r') if modifiers.contains(KeyModifiers::CONTROL) => {
                Some(UserInput::Reset)
            }
            KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => c
                .to_digit(10)
                .and_then(|digit| keys.get(digit as usize - 1))
                .map(|key| UserInput::Toggle(key.clone())),
            KeyCode::Char(c) if option_for_char(keys, c).is_some() => {
                option_for_char(keys, c).map(|key| UserInput::Toggle(key.clone()))
            }
            KeyCode::Enter | KeyCode::Char(' ') => Some(UserInput::Submit),
            KeyCode::Left | KeyCode::Char('p') | KeyCode::Char('h') => Some(UserInput::Back),
            KeyCode::Right | KeyCode::Char('n') | KeyCode::Char('l') => Some(UserInput::Next),
            KeyCode::Esc | KeyCode::Char('q') => Some(UserInput::Quit),
            _ => None,
        },
        Event::Resize(_, _) => Some(UserInput::Resize),
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Up(MouseButton::Left),
            column,
            row,
            ..
        }) => state
            .option_areas
            .iter()
            .find(|(_, area)| area.contains((column, row).into()))
            .map(|(key, _)| UserInput::Toggle(key.clone())),
        _ => None,
    }
}

///Single character option keys can be typed directly, in either case.
fn option_for_char(keys: &[OptionKey], c: char) -> Option<&OptionKey> {
    keys.iter().find(|key| {
        let mut chars = key.chars();
        chars
            .next()
            .is_some_and(|first| first.eq_ignore_ascii_case(&c))
            && chars.next().is_none()
    })
}

#[cfg(test)]
mod tests {
    use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
    use rand::{rngs::StdRng, SeedableRng};

    use crate::{
        deck::{tests::card, Card, CardId},
        progress::{AnsweredIds, MemoryProgressStore, ProgressError, ProgressStore, WrongCounts},
        session::{Practice, Verdict},
    };

    use super::{
        handle_input, match_user_input, refresh, Message, PracticeWidgetState, Screen, UserInput,
    };

    ///Memory store that can refuse to load or clear the answered ids.
    #[derive(Default)]
    struct UnreliableStore {
        inner: MemoryProgressStore,
        fail_load: bool,
        fail_clear: bool,
    }

    fn unavailable() -> ProgressError {
        ProgressError::IoError(
            "unreliable".into(),
            std::io::Error::new(std::io::ErrorKind::Other, "device not ready"),
        )
    }

    impl ProgressStore for UnreliableStore {
        fn load_answered_ids(&self) -> Result<AnsweredIds, ProgressError> {
            if self.fail_load {
                return Err(unavailable());
            }
            self.inner.load_answered_ids()
        }

        fn save_answered_ids(&mut self, ids: &AnsweredIds) -> Result<(), ProgressError> {
            self.inner.save_answered_ids(ids)
        }

        fn clear_answered_ids(&mut self) -> Result<(), ProgressError> {
            if self.fail_clear {
                return Err(unavailable());
            }
            self.inner.clear_answered_ids()
        }

        fn load_wrong_counts(&self) -> Result<WrongCounts, ProgressError> {
            self.inner.load_wrong_counts()
        }

        fn save_wrong_counts(&mut self, counts: &WrongCounts) -> Result<(), ProgressError> {
            self.inner.save_wrong_counts(counts)
        }
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn keys() -> Vec<String> {
        vec!["A".to_owned(), "B".to_owned(), "C".to_owned()]
    }

    fn cards(count: usize) -> Vec<Card> {
        (0..count)
            .map(|i| card(&format!("Question {i}"), &["A", "B", "C"], &["A", "C"]))
            .collect()
    }

    fn practice() -> Practice<MemoryProgressStore, StdRng> {
        let mut practice =
            Practice::with_rng(cards(3), MemoryProgressStore::new(), StdRng::seed_from_u64(9))
                .expect("Unable to create practice");
        practice.refresh().expect("Unable to start practice");
        practice
    }

    #[test]
    fn keys_map_to_inputs() {
        let state = PracticeWidgetState::default();
        let keys = keys();

        assert_eq!(
            match_user_input(key(KeyCode::Char('2')), &keys, &state),
            Some(UserInput::Toggle("B".to_owned()))
        );
        assert_eq!(
            match_user_input(key(KeyCode::Char('c')), &keys, &state),
            Some(UserInput::Toggle("C".to_owned()))
        );
        assert_eq!(match_user_input(key(KeyCode::Char('9')), &keys, &state), None);
        assert_eq!(
            match_user_input(key(KeyCode::Enter), &keys, &state),
            Some(UserInput::Submit)
        );
        assert_eq!(
            match_user_input(key(KeyCode::Char('n')), &keys, &state),
            Some(UserInput::Next)
        );
        assert_eq!(
            match_user_input(key(KeyCode::Left), &keys, &state),
            Some(UserInput::Back)
        );
        assert_eq!(
            match_user_input(
                Event::Key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL)),
                &keys,
                &state
            ),
            Some(UserInput::Reset)
        );
        assert_eq!(
            match_user_input(key(KeyCode::Esc), &keys, &state),
            Some(UserInput::Quit)
        );
    }

    #[test]
    fn option_keys_take_precedence_over_shortcuts() {
        let state = PracticeWidgetState::default();
        let keys = vec!["N".to_owned(), "Y".to_owned()];

        assert_eq!(
            match_user_input(key(KeyCode::Char('n')), &keys, &state),
            Some(UserInput::Toggle("N".to_owned()))
        );
        assert_eq!(
            match_user_input(key(KeyCode::Right), &keys, &state),
            Some(UserInput::Next)
        );
    }

    #[test]
    fn next_before_submit_warns() {
        let mut practice = practice();
        let screen = &mut Screen::default();

        let message = handle_input(&mut practice, screen, UserInput::Next)
            .expect("Unable to handle input");
        assert!(matches!(message, Some(Message::Warning(_))));
        assert_eq!(practice.progress(), (1, 3));
    }

    #[test]
    fn submit_without_selection_warns() {
        let mut practice = practice();
        let screen = &mut Screen::default();

        let message = handle_input(&mut practice, screen, UserInput::Submit)
            .expect("Unable to handle input");
        assert!(matches!(message, Some(Message::Warning(_))));
        assert!(!practice.has_submitted());
    }

    #[test]
    fn toggles_then_submits_selection() {
        let mut practice = practice();
        let screen = &mut Screen::default();

        for input in [
            UserInput::Toggle("A".to_owned()),
            UserInput::Toggle("B".to_owned()),
            UserInput::Toggle("B".to_owned()),
            UserInput::Toggle("C".to_owned()),
            UserInput::Submit,
        ] {
            handle_input(&mut practice, screen, input).expect("Unable to handle input");
        }
        assert_eq!(practice.last_verdict(), Some(Verdict::Correct));

        handle_input(&mut practice, screen, UserInput::Toggle("B".to_owned()))
            .expect("Unable to handle input");
        assert!(!screen.selected.contains("B"));
    }

    #[test]
    fn reset_starts_over() {
        let mut practice = practice();
        let screen = &mut Screen::default();
        screen.toggle("B".to_owned());
        handle_input(&mut practice, screen, UserInput::Submit).expect("Unable to handle input");

        let message = handle_input(&mut practice, screen, UserInput::Reset)
            .expect("Unable to handle input");
        assert!(matches!(message, Some(Message::Info(_))));
        assert!(screen.selected.is_empty());
        assert!(practice.answered_ids().is_empty());
        assert!(practice.current_card().is_some());
        assert!(practice
            .store()
            .load_wrong_counts()
            .is_ok_and(|counts| !counts.is_empty()));
    }

    #[test]
    fn already_finished_progress_announces_restart() {
        let mut store = MemoryProgressStore::new();
        store
            .save_answered_ids(&(0..2).map(CardId::new).collect())
            .expect("Unable to save answered ids");
        let mut practice = Practice::with_rng(cards(2), store, StdRng::seed_from_u64(3))
            .expect("Unable to create practice");
        let screen = &mut Screen::default();

        let message = refresh(&mut practice, screen).expect("Unable to refresh");
        assert!(matches!(message, Some(Message::Info(_))));
        assert!(practice.answered_ids().is_empty());
    }

    #[test]
    fn failed_completion_restart_keeps_running() {
        let mut practice =
            Practice::with_rng(cards(1), UnreliableStore::default(), StdRng::seed_from_u64(4))
                .expect("Unable to create practice");
        let screen = &mut Screen::default();
        assert_eq!(refresh(&mut practice, screen).expect("Unable to refresh"), None);

        screen.toggle("A".to_owned());
        screen.toggle("C".to_owned());
        handle_input(&mut practice, screen, UserInput::Submit).expect("Unable to handle input");
        assert!(practice.is_complete());

        practice.store_mut().fail_clear = true;
        let message = refresh(&mut practice, screen).expect("Unable to refresh");
        assert!(matches!(message, Some(Message::Error(_))));
        assert!(practice.is_complete());
        assert_eq!(practice.last_verdict(), Some(Verdict::Correct));

        practice.store_mut().fail_clear = false;
        let message = refresh(&mut practice, screen).expect("Unable to refresh");
        assert!(matches!(message, Some(Message::Info(_))));
        assert!(practice.answered_ids().is_empty());
    }

    #[test]
    fn failed_reload_after_reset_is_retried() {
        let mut practice =
            Practice::with_rng(cards(2), UnreliableStore::default(), StdRng::seed_from_u64(5))
                .expect("Unable to create practice");
        let screen = &mut Screen::default();
        refresh(&mut practice, screen).expect("Unable to refresh");

        practice.store_mut().fail_load = true;
        let message = handle_input(&mut practice, screen, UserInput::Reset)
            .expect("Unable to handle input");
        assert!(matches!(message, Some(Message::Error(_))));
        assert!(practice.current_card().is_none());

        let message = refresh(&mut practice, screen).expect("Unable to refresh");
        assert!(matches!(message, Some(Message::Error(_))));

        practice.store_mut().fail_load = false;
        assert_eq!(refresh(&mut practice, screen).expect("Unable to refresh"), None);
        assert!(practice.current_card().is_some());
        assert_eq!(practice.progress(), (1, 2));
    }
}

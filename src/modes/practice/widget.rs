use std::collections::BTreeSet;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, StatefulWidget, Widget, Wrap},
};

use crate::{
    deck::{Card, OptionKey},
    session::Verdict,
};

use super::Message;

const COLOR_CORRECT: Color = Color::Green;
const COLOR_PARTIAL: Color = Color::Yellow;
const COLOR_INCORRECT: Color = Color::Red;

const OPTION_HEIGHT: u16 = 2;

const HELP: &str =
    "[1-9/key] toggle  [enter] submit  [←/p] previous  [→/n] next  [ctrl+r] reset  [q] quit";

///Draws the current card. Without a card only progress, the message and the
///help line are shown.
pub(super) struct PracticeWidget<'a> {
    card: Option<&'a Card>,
    selected: &'a BTreeSet<OptionKey>,
    verdict: Option<Verdict>,
    message: Option<&'a Message>,
    progress: (usize, usize),
}

impl<'a> PracticeWidget<'a> {
    pub(super) fn new(
        card: Option<&'a Card>,
        selected: &'a BTreeSet<OptionKey>,
        verdict: Option<Verdict>,
        message: Option<&'a Message>,
        progress: (usize, usize),
    ) -> Self {
        Self {
            card,
            selected,
            verdict,
            message,
            progress,
        }
    }

    fn verdict_line(&self, card: &Card) -> Option<Line<'static>> {
        self.verdict.map(|verdict| {
            let (text, color) = match verdict {
                Verdict::Correct => ("Correct!".to_owned(), COLOR_CORRECT),
                Verdict::PartiallyCorrect => (
                    format!(
                        "Partially correct. Correct answer(s): {}",
                        card.answers_string()
                    ),
                    COLOR_PARTIAL,
                ),
                Verdict::Incorrect => (
                    format!("Incorrect. Correct answer(s): {}", card.answers_string()),
                    COLOR_INCORRECT,
                ),
            };
            Line::from(Span::styled(text, Style::default().fg(color).add_modifier(Modifier::BOLD)))
        })
    }

    fn option_style(&self, card: &Card, key: &str) -> Style {
        let chosen = self.selected.contains(key);

        match self.verdict {
            None => Style::default(),
            Some(_) if card.is_answer(key) => Style::default().fg(COLOR_CORRECT),
            Some(_) if chosen => Style::default().fg(COLOR_INCORRECT),
            Some(_) => Style::default().add_modifier(Modifier::DIM),
        }
    }
}

#[derive(Default)]
pub(super) struct PracticeWidgetState {
    pub(super) option_areas: Vec<(OptionKey, Rect)>,
}

impl StatefulWidget for PracticeWidget<'_> {
    type State = PracticeWidgetState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State)
    where
        Self: Sized,
    {
        let option_count = self.card.map_or(0, |card| card.options.len()) as u16;

        let split = Layout::new(
            Direction::Vertical,
            [
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
                Constraint::Length(option_count.saturating_mul(OPTION_HEIGHT)),
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Length(1),
            ],
        )
        .split(area);
        let (progress_area, question_area, instruction_area, options_area) =
            (split[0], split[1], split[2], split[3]);
        let (verdict_area, message_area, help_area) = (split[4], split[5], split[6]);

        {
            let (position, total) = self.progress;
            let ratio = if total == 0 {
                0.0
            } else {
                (position as f64 / total as f64).min(1.0)
            };

            Gauge::default()
                .ratio(ratio)
                .label(format!("Question {position} of {total}"))
                .gauge_style(Style::default().fg(Color::Blue).bg(Color::DarkGray))
                .use_unicode(true)
                .render(progress_area, buf);
        }

        state.option_areas.clear();

        if let Some(card) = self.card {
            Paragraph::new(card.question.as_str())
                .wrap(Wrap { trim: false })
                .centered()
                .block(
                    Block::new()
                        .borders(Borders::BOTTOM)
                        .border_set(border::DOUBLE),
                )
                .render(question_area, buf);

            if let Some(instruction) = card.instruction.as_deref() {
                Paragraph::new(instruction)
                    .bold()
                    .centered()
                    .render(instruction_area, buf);
            }

            let option_areas = Layout::new(
                Direction::Vertical,
                vec![Constraint::Length(OPTION_HEIGHT); card.options.len()],
            )
            .split(options_area);

            for ((key, text), option_area) in card.options.iter().zip(option_areas.iter()) {
                let mark = if self.selected.contains(key) { "x" } else { " " };

                Paragraph::new(format!("[{mark}] {key}. {text}"))
                    .wrap(Wrap { trim: false })
                    .style(self.option_style(card, key))
                    .render(*option_area, buf);

                state.option_areas.push((key.clone(), *option_area));
            }

            if let Some(line) = self.verdict_line(card) {
                Paragraph::new(line)
                    .wrap(Wrap { trim: false })
                    .render(verdict_area, buf);
            }
        }

        if let Some(message) = self.message {
            let (text, color) = match message {
                Message::Info(text) => (text, Color::Cyan),
                Message::Warning(text) => (text, COLOR_PARTIAL),
                Message::Error(text) => (text, COLOR_INCORRECT),
            };
            Paragraph::new(text.as_str())
                .fg(color)
                .render(message_area, buf);
        }

        Paragraph::new(HELP).dim().centered().render(help_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use ratatui::{buffer::Buffer, layout::Rect, widgets::StatefulWidget};

    use crate::{deck::tests::card, modes::practice::Message, session::Verdict};

    use super::{PracticeWidget, PracticeWidgetState};

    fn rendered(buf: &Buffer) -> String {
        buf.content
            .chunks(buf.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn renders_card_and_progress() {
        let card = card("Which are vowels?", &["A", "B", "E"], &["A", "E"]);
        let selected: BTreeSet<String> = ["A".to_owned()].into_iter().collect();
        let message = Message::Warning("Please submit an answer before moving on.".to_owned());

        let area = Rect::new(0, 0, 100, 20);
        let mut buf = Buffer::empty(area);
        let mut state = PracticeWidgetState::default();
        PracticeWidget::new(Some(&card), &selected, None, Some(&message), (2, 5))
            .render(area, &mut buf, &mut state);

        let screen = rendered(&buf);
        assert!(screen.contains("Question 2 of 5"));
        assert!(screen.contains("Which are vowels?"));
        assert!(screen.contains("[x] A. Option A"));
        assert!(screen.contains("[ ] B. Option B"));
        assert!(screen.contains("Please submit an answer"));
        assert_eq!(
            state
                .option_areas
                .iter()
                .map(|(key, _)| key.as_str())
                .collect::<Vec<_>>(),
            vec!["A", "B", "E"]
        );
    }

    #[test]
    fn renders_verdict_with_correct_answers() {
        let card = card("Which are vowels?", &["A", "B", "E"], &["A", "E"]);
        let selected: BTreeSet<String> = ["A".to_owned()].into_iter().collect();

        let area = Rect::new(0, 0, 100, 20);
        let mut buf = Buffer::empty(area);
        let mut state = PracticeWidgetState::default();
        PracticeWidget::new(
            Some(&card),
            &selected,
            Some(Verdict::PartiallyCorrect),
            None,
            (1, 1),
        )
        .render(area, &mut buf, &mut state);

        assert!(rendered(&buf).contains("Partially correct. Correct answer(s): A, E"));
    }

    #[test]
    fn renders_message_without_a_card() {
        let selected = BTreeSet::new();
        let message = Message::Error("Unable to update progress".to_owned());

        let area = Rect::new(0, 0, 100, 10);
        let mut buf = Buffer::empty(area);
        let mut state = PracticeWidgetState::default();
        PracticeWidget::new(None, &selected, None, Some(&message), (0, 3))
            .render(area, &mut buf, &mut state);

        let screen = rendered(&buf);
        assert!(screen.contains("Question 0 of 3"));
        assert!(screen.contains("Unable to update progress"));
        assert!(state.option_areas.is_empty());
    }
}

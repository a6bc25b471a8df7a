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

use std::io::Stdout;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, widgets::StatefulWidget, Terminal};

use crate::UiError;

///Owns the terminal for the lifetime of an interactive screen. The screen is
///restored when dropped, including while unwinding from a panic.
pub struct TerminalWrapper {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    #[allow(unused)]
    guard: ScreenGuard,
}

impl TerminalWrapper {
    pub fn new() -> Result<TerminalWrapper, UiError> {
        let guard = ScreenGuard::acquire()?;
        let terminal = Terminal::new(CrosstermBackend::new(std::io::stdout()))?;

        Ok(TerminalWrapper { terminal, guard })
    }

    pub fn render_stateful_widget<W: StatefulWidget>(
        &mut self,
        widget: W,
        state: &mut W::State,
    ) -> Result<(), UiError> {
        self.terminal
            .draw(|frame| frame.render_stateful_widget(widget, frame.area(), state))?;
        Ok(())
    }
}

///Raw mode, alternate screen and mouse capture, enabled in that order.
struct ScreenGuard {
    alt_screen: bool,
    mouse_capture: bool,
}

impl ScreenGuard {
    fn acquire() -> Result<Self, std::io::Error> {
        enable_raw_mode()?;
        let mut guard = Self {
            alt_screen: false,
            mouse_capture: false,
        };

        //NOTE: On error, guard is dropped here and undoes whatever succeeded
        execute!(std::io::stdout(), EnterAlternateScreen)?;
        guard.alt_screen = true;
        execute!(std::io::stdout(), EnableMouseCapture)?;
        guard.mouse_capture = true;

        Ok(guard)
    }
}

impl Drop for ScreenGuard {
    fn drop(&mut self) {
        if self.mouse_capture {
            let _ = execute!(std::io::stdout(), DisableMouseCapture);
        }
        if self.alt_screen {
            let _ = execute!(std::io::stdout(), LeaveAlternateScreen);
        }
        let _ = disable_raw_mode();
    }
}

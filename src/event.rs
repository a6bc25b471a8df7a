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

use std::time::Duration;

use crossterm::event::{self, Event};

use crate::UiError;

///Drops any input queued while the previous screen was drawn, then blocks
///until `match_fn` accepts an event.
pub fn next_matching_event<T>(match_fn: impl Fn(Event) -> Option<T>) -> Result<T, UiError> {
    drain_pending_events()?;
    loop {
        if let Some(value) = match_fn(event::read()?) {
            return Ok(value);
        }
    }
}

fn drain_pending_events() -> Result<(), UiError> {
    while event::poll(Duration::from_millis(0))? {
        event::read()?;
    }
    Ok(())
}

//! Main event loop

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use std::time::Duration;

use crate::constants::{POLL_BUSY_MS, POLL_IDLE_MS};
use crate::input::{InputResult, handle_input};

use super::App;
use super::render_thread::RenderThread;

impl App {
    pub(crate) async fn event_loop(&mut self, render_thread: &RenderThread) -> Result<()> {
        loop {
            // Apply background results FIRST (non-blocking) - prioritize responsiveness
            self.process_events();

            // Clear expired errors
            if self.status.clear_error_if_expired() {
                self.dirty = true;
            }

            // Render only when dirty (non-blocking - sends to render thread)
            if self.dirty {
                self.prepare_preview();
                if render_thread.render(self.view_state()) {
                    self.dirty = false;
                }
            }

            // Handle input (adaptive timeout: faster while background work is pending)
            let poll_timeout = if self.events.outstanding() > 0 {
                POLL_BUSY_MS
            } else {
                POLL_IDLE_MS
            };
            let ready = event::poll(Duration::from_millis(poll_timeout))
                .context("Failed to poll terminal events")?;

            if ready {
                let evt = event::read().context("Failed to read terminal event")?;
                // Any input event (including resize) requires re-render
                self.dirty = true;
                if let Event::Resize(cols, _) = evt {
                    self.resize(cols);
                    continue;
                }
                match handle_input(evt, &self.input, &self.bindings) {
                    InputResult::Quit => break,
                    InputResult::Action(action) => {
                        self.status.acknowledge_error();
                        self.handle_action(action);
                    }
                    InputResult::Char(c) => self.handle_char(c),
                    InputResult::Backspace => self.handle_backspace(),
                    InputResult::Submit => self.submit_prompt(),
                    InputResult::Continue => {}
                }
            }

            // Load more messages if the selection is near the bottom of the list
            self.maybe_load_more();
        }

        Ok(())
    }
}

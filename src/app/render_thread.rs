//! Background render thread.
//!
//! The thread owns the terminal for the whole session and draws
//! [`ViewState`] snapshots from a one-slot channel, so the owner loop never
//! blocks on terminal I/O. Setup failures are reported back to `spawn`.

use std::io::{self, Stdout};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result, anyhow};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use super::state::ViewState;

type Tui = Terminal<CrosstermBackend<Stdout>>;

pub enum RenderCommand {
    Render(Box<ViewState>),
    Shutdown,
}

/// Raw mode and alternate screen, restored on drop (also when drawing panics)
struct TerminalGuard {
    terminal: Tui,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            disable_raw_mode().ok();
            return Err(e);
        }
        match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(e) => {
                execute!(io::stdout(), LeaveAlternateScreen).ok();
                disable_raw_mode().ok();
                Err(e)
            }
        }
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        disable_raw_mode().ok();
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen).ok();
        self.terminal.show_cursor().ok();
    }
}

pub struct RenderThread {
    cmd_tx: SyncSender<RenderCommand>,
    handle: Option<JoinHandle<()>>,
}

impl RenderThread {
    /// Take over the terminal on a new thread. Fails if the terminal cannot
    /// be prepared.
    pub fn spawn() -> Result<Self> {
        // Only the latest snapshot matters
        let (cmd_tx, cmd_rx) = mpsc::sync_channel::<RenderCommand>(1);
        let (ready_tx, ready_rx) = mpsc::channel::<io::Result<()>>();

        let handle = thread::Builder::new()
            .name("tern-render".into())
            .spawn(move || {
                let mut guard = match TerminalGuard::enter() {
                    Ok(guard) => {
                        ready_tx.send(Ok(())).ok();
                        guard
                    }
                    Err(e) => {
                        ready_tx.send(Err(e)).ok();
                        return;
                    }
                };
                draw_loop(&mut guard.terminal, &cmd_rx);
            })
            .context("Failed to spawn render thread")?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                cmd_tx,
                handle: Some(handle),
            }),
            Ok(Err(e)) => {
                handle.join().ok();
                Err(e).context("Failed to set up terminal")
            }
            Err(_) => {
                handle.join().ok();
                Err(anyhow!("Render thread exited during setup"))
            }
        }
    }

    /// Hand a snapshot to the render thread without waiting.
    ///
    /// Returns false when the previous frame is still queued; the caller
    /// stays dirty and sends a newer snapshot on its next pass.
    pub fn render(&self, state: ViewState) -> bool {
        match self.cmd_tx.try_send(RenderCommand::Render(Box::new(state))) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::trace!("Render thread busy, frame deferred");
                false
            }
            Err(TrySendError::Disconnected(_)) => {
                tracing::error!("Render thread is gone");
                true
            }
        }
    }

    /// Stop drawing, restore the terminal and join the thread
    pub fn shutdown(mut self) {
        self.cmd_tx.send(RenderCommand::Shutdown).ok();
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            tracing::error!("Render thread panicked");
        }
    }
}

fn draw_loop(terminal: &mut Tui, commands: &Receiver<RenderCommand>) {
    let mut frames: u64 = 0;
    while let Ok(command) = commands.recv() {
        let RenderCommand::Render(state) = command else {
            break;
        };
        match terminal.draw(|frame| crate::ui::render(frame, &state)) {
            Ok(_) => frames += 1,
            Err(e) => tracing::error!("Draw failed: {}", e),
        }
    }
    tracing::debug!("Render thread stopping after {} frames", frames);
}

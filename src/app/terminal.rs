use std::{
    io::{self, Stdout, Write},
    ops::{Deref, DerefMut},
    panic,
    sync::OnceLock,
};

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute, terminal,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::warn;

type Screen = Terminal<CrosstermBackend<Stdout>>;

static RESTORE_ON_PANIC: OnceLock<()> = OnceLock::new();

/// Owns the console's screen: raw mode, the alternate buffer and bracketed
/// paste are switched on in `new` and off again on drop or panic.
pub struct TerminalGuard {
    screen: Screen,
}

impl TerminalGuard {
    pub fn new() -> Result<Self> {
        RESTORE_ON_PANIC.get_or_init(|| {
            let report = panic::take_hook();
            panic::set_hook(Box::new(move |info| {
                let _ = leave(&mut io::stdout());
                report(info);
            }));
        });
        let mut stdout = io::stdout();
        if let Err(err) = enter(&mut stdout) {
            let _ = leave(&mut stdout);
            return Err(err).context("failed to prepare the terminal");
        }
        let screen = Terminal::new(CrosstermBackend::new(stdout))
            .context("failed to initialize terminal")?;
        Ok(Self { screen })
    }
}

fn enter(out: &mut impl Write) -> io::Result<()> {
    terminal::enable_raw_mode()?;
    execute!(out, terminal::EnterAlternateScreen, EnableBracketedPaste)
}

fn leave(out: &mut impl Write) -> io::Result<()> {
    let raw = terminal::disable_raw_mode();
    execute!(
        out,
        DisableBracketedPaste,
        terminal::LeaveAlternateScreen,
        cursor::Show
    )?;
    raw
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = leave(self.screen.backend_mut()) {
            warn!(error = %err, "failed to restore the terminal");
        }
    }
}

impl Deref for TerminalGuard {
    type Target = Screen;

    fn deref(&self) -> &Screen {
        &self.screen
    }
}

impl DerefMut for TerminalGuard {
    fn deref_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }
}

//! Real terminal: crossterm raw mode + alternate screen, ratatui double buffer.
//!
//! Widgets write into ratatui's pending buffer; [`Screen::show`] diffs it
//! against what is already on the terminal and emits only the changed cells.

use std::io::{self, Stdout};
use std::sync::Once;

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    style::Style,
    Terminal,
};

use super::{put_cell, Screen, ScreenEvent};

/// A [`Screen`] on the process's controlling terminal.
pub struct TerminalScreen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// `false` once the terminal has been handed back.
    active: bool,
}

impl TerminalScreen {
    /// Switch the terminal into raw mode on the alternate screen.  On failure
    /// the terminal is put back the way it was.
    pub fn init() -> io::Result<Self> {
        install_panic_hook();
        enable_raw_mode()?;
        let terminal = setup_or_restore(setup_terminal, restore_terminal)?;

        Ok(Self {
            terminal,
            active: true,
        })
    }
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    execute!(io::stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    terminal.hide_cursor()?;
    terminal.clear()?;
    Ok(terminal)
}

/// Run `setup`; if it fails, run `restore` before returning the setup error.
fn setup_or_restore<T>(
    setup: impl FnOnce() -> io::Result<T>,
    restore: impl FnOnce() -> io::Result<()>,
) -> io::Result<T> {
    setup().inspect_err(|_| {
        if let Err(err) = restore() {
            tracing::warn!("restoring terminal after failed init: {err}");
        }
    })
}

impl Screen for TerminalScreen {
    fn set_content(&mut self, x: u16, y: u16, ch: char, combining: &[char], style: Style) {
        put_cell(self.terminal.current_buffer_mut(), x, y, ch, combining, style);
    }

    fn clear(&mut self) {
        self.terminal.current_buffer_mut().reset();
    }

    fn sync(&mut self) -> io::Result<()> {
        // Forget what is on screen so the next flush rewrites every cell.
        self.terminal.clear()?;
        self.show()
    }

    fn show(&mut self) -> io::Result<()> {
        self.terminal.flush()?;
        self.terminal.swap_buffers();
        Backend::flush(self.terminal.backend_mut())
    }

    fn size(&self) -> (u16, u16) {
        match self.terminal.size() {
            Ok(size) => (size.width, size.height),
            Err(_) => (0, 0),
        }
    }

    fn poll_event(&mut self) -> Option<ScreenEvent> {
        loop {
            match event::read() {
                Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => {
                    return Some(ScreenEvent::Key(key));
                }
                Ok(Event::Resize(width, height)) => {
                    if let Err(err) = self.terminal.autoresize() {
                        tracing::warn!("resize to {width}x{height} failed: {err}");
                    }
                    return Some(ScreenEvent::Resize(width, height));
                }
                // Mouse, focus, paste and key releases are not delivered.
                Ok(_) => continue,
                Err(err) => {
                    tracing::warn!("terminal input failed: {err}");
                    return None;
                }
            }
        }
    }

    fn finalize(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;

        if let Err(err) = restore_terminal() {
            tracing::warn!("restoring terminal failed: {err}");
        }
        let _ = self.terminal.show_cursor();
    }
}

impl Drop for TerminalScreen {
    fn drop(&mut self) {
        self.finalize();
    }
}

/// Leave raw mode and the alternate screen.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Install a panic hook that restores the terminal before printing the
/// panic.  Only the first call installs it; returns whether this one did.
fn install_panic_hook() -> bool {
    static HOOK: Once = Once::new();
    let mut installed = false;
    HOOK.call_once(|| {
        installed = true;
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            // Best-effort terminal restoration
            let _ = restore_terminal();
            original_hook(panic_info);
        }));
    });
    installed
}

//! Raw terminal mode with guaranteed restoration.
//!
//! [`TerminalSession`] owns the switch into raw mode for one run. Restoring
//! goes through a single "restore once" step shared by the explicit
//! [`TerminalSession::restore`], `Drop` and the panic hook, so whichever exit
//! path fires first restores the terminal and the others do nothing.

use crossterm::{
    cursor, execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io;
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{info, warn};

/// Switches a terminal into dashboard mode and back
pub trait TerminalMode {
    fn enter(&mut self) -> io::Result<()>;
    fn leave(&mut self) -> io::Result<()>;
}

/// Raw mode on the process terminal via crossterm.
///
/// crossterm captures the original termios attributes when raw mode is
/// enabled and writes them back verbatim when it is disabled.
pub struct CrosstermMode {
    alternate_screen: bool,
}

impl CrosstermMode {
    pub fn new(alternate_screen: bool) -> Self {
        Self { alternate_screen }
    }
}

impl TerminalMode for CrosstermMode {
    fn enter(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        let screen = if self.alternate_screen {
            execute!(stdout, EnterAlternateScreen, cursor::Hide)
        } else {
            execute!(stdout, terminal::Clear(terminal::ClearType::All), cursor::Hide)
        };
        if let Err(e) = screen {
            // Do not leave the shell in raw mode if we never get to run
            let _ = disable_raw_mode();
            return Err(e);
        }
        Ok(())
    }

    fn leave(&mut self) -> io::Result<()> {
        // Mode first: a failed screen switch must not keep the shell raw
        let mode = disable_raw_mode();
        let mut stdout = io::stdout();
        let screen = if self.alternate_screen {
            execute!(stdout, LeaveAlternateScreen, cursor::Show)
        } else {
            execute!(stdout, cursor::Show)
        };
        mode.and(screen)
    }
}

struct SessionState<M> {
    mode: Mutex<M>,
    restored: AtomicBool,
}

impl<M: TerminalMode> SessionState<M> {
    /// Returns whether this call performed the restore
    fn restore_once(&self) -> io::Result<bool> {
        if self.restored.swap(true, Ordering::SeqCst) {
            return Ok(false);
        }
        let mut mode = self.mode.lock().unwrap_or_else(PoisonError::into_inner);
        mode.leave().map(|()| true)
    }
}

/// Scoped ownership of the dashboard terminal mode
pub struct TerminalSession<M: TerminalMode> {
    state: Arc<SessionState<M>>,
}

impl<M: TerminalMode> TerminalSession<M> {
    /// Capture the current mode and switch into dashboard mode
    pub fn enter(mut mode: M) -> io::Result<Self> {
        mode.enter()?;
        info!("terminal switched to raw mode");
        Ok(Self {
            state: Arc::new(SessionState {
                mode: Mutex::new(mode),
                restored: AtomicBool::new(false),
            }),
        })
    }

    /// Restore the terminal, reporting failure to the caller
    pub fn restore(self) -> io::Result<()> {
        self.state.restore_once().map(|_| ())
    }
}

impl<M: TerminalMode + Send + 'static> TerminalSession<M> {
    /// Restore the terminal before the panic message is printed
    pub fn install_panic_hook(&self) {
        let state = Arc::clone(&self.state);
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = state.restore_once();
            previous(panic_info);
        }));
    }
}

impl<M: TerminalMode> Drop for TerminalSession<M> {
    fn drop(&mut self) {
        match self.state.restore_once() {
            Ok(true) => info!("terminal restored on drop"),
            Ok(false) => {}
            Err(e) => warn!(error = %e, "failed to restore terminal"),
        }
    }
}

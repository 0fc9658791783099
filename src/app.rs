//! Dashboard loop: sample, render, poll keys, sleep

use ratatui::{backend::{Backend, CrosstermBackend}, Terminal};
use std::io;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::core::{
    CrosstermKeys, CrosstermMode, DashboardError, HostProbe, KeyPoll, MetricSource,
    ShutdownSignals, SysinfoProbe, TerminalMode, TerminalSession,
};
use crate::screens::Renderer;
use crate::utils::{AppConfig, CTRL_C, TICK_INTERVAL};

/// What the key drain decided for this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAction {
    Continue,
    Quit,
    Interrupt,
}

pub struct App<P, B: Backend, K> {
    source: MetricSource<P>,
    renderer: Renderer<B>,
    keys: K,
    running: bool,
    ticks: u64,
}

impl<P: HostProbe, B: Backend, K: KeyPoll> App<P, B, K> {
    pub fn new(source: MetricSource<P>, renderer: Renderer<B>, keys: K) -> Self {
        Self {
            source,
            renderer,
            keys,
            running: true,
            ticks: 0,
        }
    }

    /// Run ticks until the quit key. Errors from sampling or rendering end
    /// the loop immediately; the caller owns terminal restoration.
    pub async fn run(&mut self) -> Result<(), DashboardError> {
        let mut signals = ShutdownSignals::new()?;

        while self.running {
            self.ticks += 1;

            let snapshot = self.source.snapshot()?;
            self.renderer.render(&snapshot)?;
            debug!(tick = self.ticks, disks = snapshot.disks.len(), "rendered snapshot");

            match self.drain_keys()? {
                KeyAction::Quit => {
                    info!(ticks = self.ticks, "quit requested");
                    self.running = false;
                    break;
                }
                KeyAction::Interrupt => return Err(DashboardError::Interrupted("Ctrl+C")),
                KeyAction::Continue => {}
            }

            tokio::select! {
                _ = sleep(TICK_INTERVAL) => {}
                name = signals.recv() => return Err(DashboardError::Interrupted(name)),
            }
        }

        Ok(())
    }

    /// Read everything queued right now; nothing carries over to the next tick
    fn drain_keys(&mut self) -> io::Result<KeyAction> {
        while self.keys.pending()? {
            match self.keys.read_one()? {
                Some(c) if c.eq_ignore_ascii_case(&'q') => return Ok(KeyAction::Quit),
                Some(CTRL_C) => return Ok(KeyAction::Interrupt),
                _ => {}
            }
        }
        Ok(KeyAction::Continue)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn renderer(&self) -> &Renderer<B> {
        &self.renderer
    }
}

/// Run the dashboard on the process terminal until quit or failure.
///
/// The terminal is restored before this returns on every path; a panic
/// restores it through the session's hook and `Drop`.
pub async fn run(config: &AppConfig) -> Result<(), DashboardError> {
    let session = TerminalSession::enter(CrosstermMode::new(config.alternate_screen))?;
    session.install_panic_hook();

    run_in_session(session, || {
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        let renderer = Renderer::new(terminal)?;
        Ok(App::new(MetricSource::new(SysinfoProbe::new()), renderer, CrosstermKeys))
    })
    .await
}

/// Build the app inside an entered session, run it, then restore.
async fn run_in_session<M, P, B, K, F>(session: TerminalSession<M>, build: F) -> Result<(), DashboardError>
where
    M: TerminalMode,
    P: HostProbe,
    B: Backend,
    K: KeyPoll,
    F: FnOnce() -> Result<App<P, B, K>, DashboardError>,
{
    let result = match build() {
        Ok(mut app) => {
            info!("dashboard started");
            app.run().await
        }
        Err(e) => Err(e),
    };
    if let Err(ref e) = result {
        error!(error = %e, "dashboard stopped");
    }

    let restored = session.restore();
    info!("terminal restored");

    // The loop's own error wins over a restore failure
    result?;
    restored?;
    Ok(())
}

//! Error types for metric collection and the dashboard loop

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of an OS metric query
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Usage of a partition could not be read for lack of permission
    #[error("permission denied reading usage of {0}")]
    PermissionDenied(PathBuf),

    /// The host does not expose a value the dashboard cannot do without
    #[error("{0} is not available on this host")]
    Unavailable(&'static str),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ProbeError {
    /// Map an I/O error raised while querying `path`
    pub fn from_io(path: impl Into<PathBuf>, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::PermissionDenied {
            ProbeError::PermissionDenied(path.into())
        } else {
            ProbeError::Io(err)
        }
    }
}

/// Reasons the dashboard loop stops other than the quit key
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] io::Error),

    #[error("metric collection failed: {0}")]
    Probe(#[from] ProbeError),

    /// Terminated by a signal or a raw Ctrl+C byte
    #[error("interrupted by {0}")]
    Interrupted(&'static str),
}

/// Conventional status for termination by SIGINT
pub const EXIT_INTERRUPTED: u8 = 130;
pub const EXIT_FAILURE: u8 = 1;

impl DashboardError {
    /// Process exit status for a run that ended with this error
    pub fn exit_status(&self) -> u8 {
        match self {
            DashboardError::Interrupted(_) => EXIT_INTERRUPTED,
            DashboardError::Terminal(_) | DashboardError::Probe(_) => EXIT_FAILURE,
        }
    }
}

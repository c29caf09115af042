//! Error type shared by every stage of a run.

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong between building a program and writing an
/// image.
#[derive(Debug, Error)]
pub enum KerrError {
    /// The Kerr integer sets the Kerr angle as π / k, so it must be
    /// non-negative (zero means "no Kerr stage").
    #[error("invalid Kerr integer {0}: must be >= 0")]
    InvalidKerrInteger(i32),

    /// Fock cutoff dimensions start at 1 (vacuum only).
    #[error("invalid Fock cutoff dimension {0}: must be >= 1")]
    InvalidCutoff(usize),

    /// A physical parameter was NaN or infinite.
    #[error("invalid value for {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    /// Sampling requested on a simulation that carries no usable state.
    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    /// Only single-mode programs are supported.
    #[error("invalid mode index {mode} for a {modes}-mode state")]
    InvalidMode { mode: usize, modes: usize },

    /// Bad phase-space grid specification.
    #[error("invalid phase-space grid: {0}")]
    InvalidGrid(String),

    /// Bad convergence-search settings.
    #[error("invalid convergence settings: {0}")]
    InvalidConvergenceConfig(String),

    /// Two sweep points would be written to the same file.
    #[error("duplicate sweep output name {0}")]
    DuplicatePlotName(String),

    /// Failure inside the plotting backend.
    #[error("plotting failed: {0}")]
    Plot(String),

    #[error("i/o error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write arrays to {path}: {msg}")]
    Npz { path: PathBuf, msg: String },
}

impl KerrError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error)
        -> Self
    {
        Self::Io { path: path.into(), source }
    }

    pub(crate) fn plot<E>(err: E) -> Self
    where E: std::fmt::Display
    {
        Self::Plot(err.to_string())
    }
}

pub type KerrResult<T> = Result<T, KerrError>;

/// Reject NaN and infinite parameter values.
pub(crate) fn check_finite(name: &'static str, value: f64)
    -> KerrResult<f64>
{
    if value.is_finite() {
        Ok(value)
    } else {
        Err(KerrError::InvalidParameter { name, value })
    }
}

//! Search for the smallest Fock cutoff at which a sampled Wigner function stops
//! changing.
//!
//! Starting from `start_cutoff`, the program is run and sampled, and the result
//! is compared elementwise against the previous sample (initially all zeros).
//! The search stops as soon as every grid cell differs by less than
//! `tolerance`; otherwise the cutoff is raised by `cutoff_delta` and the run is
//! repeated, until raising it again would pass `max_cutoff`.
//!
//! Because the first comparison is always against the zero grid, any state with
//! appreciable Wigner support needs at least two passes to converge.

use ndarray as nd;
use crate::{
    circuit::{ kerr_displace_squeeze_on, Backend, FockBackend, SimulationParameters },
    error::{ KerrError, KerrResult },
    wigner::{ wigner_samples, GridSpec, PhaseSpaceGrid },
};

/// Settings for [`find_convergent_state`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ConvergenceConfig {
    /// Largest allowed elementwise absolute difference between passes.
    pub tolerance: f64,
    pub start_cutoff: usize,
    /// No pass is run at a cutoff above this.
    pub max_cutoff: usize,
    pub cutoff_delta: usize,
    pub grid: GridSpec,
    pub mode: usize,
}

impl Default for ConvergenceConfig {
    fn default() -> Self {
        Self {
            tolerance: 5e-4,
            start_cutoff: 20,
            max_cutoff: 54,
            cutoff_delta: 2,
            grid: GridSpec::new(14.0, 200),
            mode: 0,
        }
    }
}

impl ConvergenceConfig {
    pub fn validate(&self) -> KerrResult<()> {
        let bad = |msg: String| Err(KerrError::InvalidConvergenceConfig(msg));
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return bad(format!("tolerance must be positive, got {}", self.tolerance));
        }
        if self.start_cutoff == 0 {
            return bad("starting cutoff must be >= 1".to_string());
        }
        if self.cutoff_delta == 0 {
            return bad("cutoff increment must be >= 1".to_string());
        }
        if self.start_cutoff > self.max_cutoff {
            return bad(format!(
                "starting cutoff {} exceeds maximum {}",
                self.start_cutoff, self.max_cutoff,
            ));
        }
        self.grid.validate()
    }
}

/// Error summary for a single pass.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ConvergenceStep {
    pub cutoff: usize,
    pub mean_error: f64,
    pub max_error: f64,
}

/// Final sample and per-pass history of a search.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvergenceReport {
    /// Sample from the last pass.
    pub grid: PhaseSpaceGrid,
    /// Cutoff of the last pass.
    pub cutoff: usize,
    /// Elementwise error of the last pass against the one before it.
    pub error: nd::Array2<f64>,
    pub history: Vec<ConvergenceStep>,
}

impl ConvergenceReport {
    pub fn max_error(&self) -> f64 {
        self.history.last().map(|s| s.max_error).unwrap_or(f64::INFINITY)
    }

    pub fn passes(&self) -> usize { self.history.len() }
}

/// Outcome of a search.
///
/// Both variants carry the last computed sample; only `Converged` guarantees it
/// is within tolerance of the previous pass.
#[derive(Clone, Debug, PartialEq)]
pub enum Convergence {
    /// Every cell of the last error grid is below tolerance.
    Converged(ConvergenceReport),
    /// The cutoff ceiling was reached first.
    Exhausted(ConvergenceReport),
}

impl Convergence {
    pub fn is_converged(&self) -> bool { matches!(self, Self::Converged(..)) }

    pub fn report(&self) -> &ConvergenceReport {
        match self {
            Self::Converged(rep) | Self::Exhausted(rep) => rep,
        }
    }

    pub fn into_report(self) -> ConvergenceReport {
        match self {
            Self::Converged(rep) | Self::Exhausted(rep) => rep,
        }
    }

    pub fn grid(&self) -> &PhaseSpaceGrid { &self.report().grid }
}

/// Elementwise absolute difference between two samples.
pub fn calculate_error(previous: &nd::Array2<f64>, current: &nd::Array2<f64>)
    -> nd::Array2<f64>
{
    (previous - current).mapv(f64::abs)
}

// in-flight search bookkeeping; dropped when the loop exits
struct ConvergenceState {
    cutoff: usize,
    previous: nd::Array2<f64>,
    history: Vec<ConvergenceStep>,
}

/// Run [`find_convergent_state_on`] with a [`FockBackend`].
pub fn find_convergent_state(
    params: &SimulationParameters,
    config: &ConvergenceConfig,
) -> KerrResult<Convergence>
{
    find_convergent_state_on(&FockBackend, params, config)
}

/// Raise the cutoff until the sampled Wigner function of `params` converges.
///
/// `params.cutoff_dim` is ignored in favor of the cutoffs chosen by the
/// search.
pub fn find_convergent_state_on<B>(
    backend: &B,
    params: &SimulationParameters,
    config: &ConvergenceConfig,
) -> KerrResult<Convergence>
where B: Backend + ?Sized
{
    config.validate()?;
    let n = config.grid.points;
    let mut search = ConvergenceState {
        cutoff: config.start_cutoff,
        previous: nd::Array2::zeros((n, n)),
        history: Vec::new(),
    };
    loop {
        let sim
            = kerr_displace_squeeze_on(backend, &params.with_cutoff(search.cutoff))?;
        let grid = wigner_samples(&sim, config.mode, &config.grid)?;
        let error = calculate_error(&search.previous, &grid.z);
        let step = ConvergenceStep {
            cutoff: search.cutoff,
            mean_error: error.mean().unwrap_or(0.0),
            max_error: error.fold(0.0, |acc: f64, e| acc.max(*e)),
        };
        log::info!(
            "cutoff = {} avg err = {:.8} max err = {:.8}",
            step.cutoff, step.mean_error, step.max_error,
        );
        search.history.push(step);

        if error.iter().all(|e| *e < config.tolerance) {
            log::info!("converged at cutoff {}", search.cutoff);
            return Ok(Convergence::Converged(ConvergenceReport {
                grid,
                cutoff: search.cutoff,
                error,
                history: search.history,
            }));
        }
        let next
            = search.cutoff.checked_add(config.cutoff_delta)
            .filter(|c| *c <= config.max_cutoff);
        let Some(next) = next else {
            log::warn!(
                "no convergence below cutoff {} (max err = {:.8}, tol = {})",
                config.max_cutoff, step.max_error, config.tolerance,
            );
            return Ok(Convergence::Exhausted(ConvergenceReport {
                grid,
                cutoff: search.cutoff,
                error,
                history: search.history,
            }));
        };
        search.previous = grid.z;
        search.cutoff = next;
    }
}

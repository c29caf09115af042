//! Single-run settings: one parameterized entry point from state preparation
//! to plot.

use std::path::PathBuf;
use crate::{
    circuit::{ kerr_displace_squeeze_on, Backend, FockBackend, SimulationParameters },
    error::KerrResult,
    plot::{ plot_colormesh, PlotConfig, PlotMode },
    wigner::{ wigner_samples, GridSpec, PhaseSpaceGrid },
};

/// Everything needed to prepare, sample, and render one state.
#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    pub squeezing: f64,
    /// Radians.
    pub squeezing_phase: f64,
    pub displacement: f64,
    pub kerr_integer: i32,
    pub cutoff_dim: usize,
    /// Half-width of the sampling window and of the plot axes.
    pub x_p_limit: f64,
    pub x_p_points: usize,
    pub plot_mode: PlotMode,
    pub show: bool,
    pub save: bool,
    pub plot_name: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        let sim = SimulationParameters::default();
        let grid = GridSpec::default();
        let plot = PlotConfig::default();
        Self {
            squeezing: sim.squeezing,
            squeezing_phase: sim.squeezing_phase,
            displacement: sim.displacement,
            kerr_integer: sim.kerr_integer,
            cutoff_dim: sim.cutoff_dim,
            x_p_limit: grid.limit,
            x_p_points: grid.points,
            plot_mode: plot.mode,
            show: plot.show,
            save: plot.save,
            plot_name: plot.plot_name,
        }
    }
}

impl RunConfig {
    pub fn simulation_parameters(&self) -> SimulationParameters {
        SimulationParameters {
            squeezing: self.squeezing,
            squeezing_phase: self.squeezing_phase,
            displacement: self.displacement,
            kerr_integer: self.kerr_integer,
            cutoff_dim: self.cutoff_dim,
        }
    }

    pub fn grid_spec(&self) -> GridSpec { GridSpec::new(self.x_p_limit, self.x_p_points) }

    pub fn plot_config(&self) -> PlotConfig {
        PlotConfig {
            plot_limit: self.x_p_limit,
            mode: self.plot_mode,
            show: self.show,
            save: self.save,
            plot_name: self.plot_name.clone(),
            ..PlotConfig::default()
        }
    }
}

/// Output of [`run`].
#[derive(Clone, Debug, PartialEq)]
pub struct RunOutput {
    pub grid: PhaseSpaceGrid,
    pub saved: Option<PathBuf>,
}

/// Run [`run_on`] with a [`FockBackend`].
pub fn run(config: &RunConfig) -> KerrResult<RunOutput> {
    run_on(&FockBackend, config)
}

/// Simulate, sample, and plot according to `config`.
pub fn run_on<B>(backend: &B, config: &RunConfig) -> KerrResult<RunOutput>
where B: Backend + ?Sized
{
    let params = config.simulation_parameters();
    log::info!(
        "squeezing = {}, phase = {}, displacement = {}, kerr integer = {}, cutoff = {}",
        params.squeezing,
        params.squeezing_phase,
        params.displacement,
        params.kerr_integer,
        params.cutoff_dim,
    );
    let sim = kerr_displace_squeeze_on(backend, &params)?;
    let grid = wigner_samples(&sim, 0, &config.grid_spec())?;
    let saved = plot_colormesh(&grid, &config.plot_config())?;
    Ok(RunOutput { grid, saved })
}

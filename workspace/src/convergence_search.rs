use kerr_sim::{
    circuit::SimulationParameters,
    convergence::{ find_convergent_state, Convergence, ConvergenceConfig },
    plot::{ plot_colormesh, PlotConfig, PlotMode },
    wigner::GridSpec,
};
use lib::print_flush;

const TOLERANCE: f64 = 0.0005;
const START_CUTOFF_DIMENSION: usize = 20;
const MAX_CUTOFF_DIMENSION: usize = 54;
const CUTOFF_DIMENSION_DELTA: usize = 2;
const X_P_NUMBER_OF_POINTS: usize = 200;
const PHASE_SPACE_PLOT_LIMIT: f64 = 14.0;

// r > 1.2 needs a much higher cutoff than MAX_CUTOFF_DIMENSION
const SQUEEZING: f64 = 1.0;
const DISPLACEMENT: f64 = 3.0;
const KERR_INTEGER: i32 = 2;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    lib::init_logging();
    let outdir = lib::outdir();

    let params = SimulationParameters {
        squeezing: SQUEEZING,
        squeezing_phase: 0.0,
        displacement: DISPLACEMENT,
        kerr_integer: KERR_INTEGER,
        cutoff_dim: START_CUTOFF_DIMENSION,
    };
    let config = ConvergenceConfig {
        tolerance: TOLERANCE,
        start_cutoff: START_CUTOFF_DIMENSION,
        max_cutoff: MAX_CUTOFF_DIMENSION,
        cutoff_delta: CUTOFF_DIMENSION_DELTA,
        grid: GridSpec::new(PHASE_SPACE_PLOT_LIMIT, X_P_NUMBER_OF_POINTS),
        mode: 0,
    };
    print_flush!("searching cutoffs {}..={} ... ", START_CUTOFF_DIMENSION, MAX_CUTOFF_DIMENSION);
    let res = find_convergent_state(&params, &config)?;
    match &res {
        Convergence::Converged(rep) => {
            println!("converged at cutoff {} after {} passes", rep.cutoff, rep.passes());
        },
        Convergence::Exhausted(rep) => {
            println!(
                "NOT converged; stopped at cutoff {} with max error {:.3e}",
                rep.cutoff, rep.max_error(),
            );
        },
    }

    let rep = res.into_report();
    let stem = format!(
        "convergence-squeezing_{:.4}-displacement_{:.4}-kerr_integer_{}-fock_cutoff_dim_{}",
        SQUEEZING, DISPLACEMENT, KERR_INTEGER, rep.cutoff,
    );
    rep.grid.write_npz(&outdir.join(format!("{}.npz", stem)))?;
    let plot = PlotConfig {
        plot_limit: PHASE_SPACE_PLOT_LIMIT,
        mode: PlotMode::ColorMesh,
        show: true,
        save: true,
        plot_name: Some(outdir.join(format!("{}.png", stem))),
        ..PlotConfig::default()
    };
    plot_colormesh(&rep.grid, &plot)?;
    Ok(())
}

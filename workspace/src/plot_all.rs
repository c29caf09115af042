use kerr_sim::{
    plot::PlotMode,
    sweep::{ plot_all, SweepConfig },
    wigner::GridSpec,
};

const SQUEEZING_PHASE_PI_UNITS: f64 = 1.0;
const ALPHAS: [f64; 4] = [0.0, 1.0, 3.0, 5.0];
const SQUEEZINGS: [f64; 4] = [0.0, 0.2, 0.4, 0.6];
const FOCK_CUTOFF_DIM: usize = 70;
const PHASE_SPACE_PLOT_LIMIT: f64 = 14.0;
const X_P_NUMBER_OF_POINTS: usize = 400;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    lib::init_logging();
    let outdir = lib::outdir();

    let mut count: usize = 0;
    for kerr_integer in 2..=5 {
        log::info!("kerr integer = {}", kerr_integer);
        let config = SweepConfig {
            displacements: ALPHAS.to_vec(),
            squeezings: SQUEEZINGS.to_vec(),
            squeezing_phase_pi_units: SQUEEZING_PHASE_PI_UNITS,
            kerr_integer,
            cutoff_dim: FOCK_CUTOFF_DIM,
            grid: GridSpec::new(PHASE_SPACE_PLOT_LIMIT, X_P_NUMBER_OF_POINTS),
            mode: PlotMode::ColorMesh,
            outdir: outdir.join(format!("kerr_integer_{}", kerr_integer)),
            save_npz: false,
            ..SweepConfig::default()
        };
        count += plot_all(&config)?.len();
    }
    println!("wrote {} images to {}", count, outdir.display());
    Ok(())
}

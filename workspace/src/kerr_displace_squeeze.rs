use std::f64::consts::PI;
use kerr_sim::{
    config::{ run, RunConfig },
    plot::PlotMode,
};

const PHASE_SPACE_PLOT_LIMIT: f64 = 4.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    lib::init_logging();
    let outdir = lib::outdir();

    let config = RunConfig {
        squeezing: 0.6,
        squeezing_phase: PI,
        displacement: 5.0,
        kerr_integer: 5,
        cutoff_dim: 70,
        x_p_limit: PHASE_SPACE_PLOT_LIMIT,
        x_p_points: 400,
        plot_mode: PlotMode::ColorMesh,
        show: true,
        save: true,
        plot_name: Some(outdir.join("kerr_displace_squeeze.png")),
    };
    let out = run(&config)?;
    let (lo, hi) = out.grid.z_range();
    println!("W in [{:.5}, {:.5}]; integral over window = {:.5}",
        lo, hi, out.grid.integral());
    Ok(())
}

//! Batch rendering over a grid of displacements and squeezings.

use std::{ collections::HashSet, path::PathBuf };
use itertools::Itertools;
use crate::{
    circuit::{ kerr_displace_squeeze_on, Backend, FockBackend, SimulationParameters },
    error::{ check_finite, KerrError, KerrResult },
    plot::{ plot_colormesh, PlotConfig, PlotMode },
    wigner::{ wigner_samples, GridSpec },
};

/// Settings for [`plot_all`].
#[derive(Clone, Debug, PartialEq)]
pub struct SweepConfig {
    /// Outer loop.
    pub displacements: Vec<f64>,
    /// Inner loop.
    pub squeezings: Vec<f64>,
    /// Squeezing phase, in units of π.
    pub squeezing_phase_pi_units: f64,
    pub kerr_integer: i32,
    pub cutoff_dim: usize,
    /// Sampling window; its limit is also the plot limit.
    pub grid: GridSpec,
    pub mode: PlotMode,
    pub outdir: PathBuf,
    /// Also write the sampled arrays next to each image.
    pub save_npz: bool,
    pub size: (u32, u32),
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            displacements: vec![0.0, 1.0, 3.0, 5.0],
            squeezings: vec![0.0, 0.2, 0.4, 0.6],
            squeezing_phase_pi_units: 0.0,
            kerr_integer: 2,
            cutoff_dim: 70,
            grid: GridSpec::new(14.0, 400),
            mode: PlotMode::ColorMesh,
            outdir: PathBuf::from("output"),
            save_npz: false,
            size: (900, 760),
        }
    }
}

/// Image file name recording every parameter of a run.
pub fn sweep_plot_name(
    kerr_integer: i32,
    squeezing_phase_pi_units: f64,
    displacement: f64,
    squeezing: f64,
    cutoff_dim: usize,
    x_p_limit: f64,
    x_p_points: usize,
) -> String
{
    format!(
        "kerr_integer_{}-\
        squeezing_phase_pi_units_{:.4}-\
        displacement_{:.4}-\
        squeezing_{:.4}-\
        fock_cutoff_dim_{}-\
        x_p_limit_{}-\
        x_p_number_of_points_{}\
        .png",
        kerr_integer,
        squeezing_phase_pi_units,
        displacement,
        squeezing,
        cutoff_dim,
        x_p_limit,
        x_p_points,
    )
}

/// Run [`plot_all_on`] with a [`FockBackend`].
pub fn plot_all(config: &SweepConfig) -> KerrResult<Vec<PathBuf>> {
    plot_all_on(&FockBackend, config)
}

/// Simulate, sample, and save one image for every (displacement, squeezing)
/// pair, displacement in the outer loop.
///
/// All file names are checked up front; pairs that would format to the same
/// name (repeated values, or values equal to four decimal places) are an error
/// before anything is written. Otherwise the sweep stops at the first failing
/// combination and returns its error; images already written are left in
/// place. On success, returns the written image paths in sweep order.
pub fn plot_all_on<B>(backend: &B, config: &SweepConfig)
    -> KerrResult<Vec<PathBuf>>
where B: Backend + ?Sized
{
    check_finite("squeezing_phase_pi_units", config.squeezing_phase_pi_units)?;
    config.grid.validate()?;
    let phase = config.squeezing_phase_pi_units * std::f64::consts::PI;
    let points: Vec<(f64, f64, String)>
        = config.displacements.iter().copied()
        .cartesian_product(config.squeezings.iter().copied())
        .map(|(alpha, r)| {
            let name = sweep_plot_name(
                config.kerr_integer,
                config.squeezing_phase_pi_units,
                alpha,
                r,
                config.cutoff_dim,
                config.grid.limit,
                config.grid.points,
            );
            (alpha, r, name)
        })
        .collect();
    {
        let mut seen: HashSet<&str> = HashSet::with_capacity(points.len());
        if let Some((_, _, dup))
            = points.iter().find(|(_, _, name)| !seen.insert(name.as_str()))
        {
            return Err(KerrError::DuplicatePlotName(dup.clone()));
        }
    }

    let total = points.len();
    let mut written: Vec<PathBuf> = Vec::with_capacity(total);
    for (k, (alpha, r, name)) in points.into_iter().enumerate() {
        let params = SimulationParameters {
            squeezing: r,
            squeezing_phase: phase,
            displacement: alpha,
            kerr_integer: config.kerr_integer,
            cutoff_dim: config.cutoff_dim,
        };
        log::info!(
            "[{}/{}] displacement = {:.4}, squeezing = {:.4}",
            k + 1, total, alpha, r,
        );
        let sim = kerr_displace_squeeze_on(backend, &params)?;
        let grid = wigner_samples(&sim, 0, &config.grid)?;
        let path = config.outdir.join(&name);
        let plot_config = PlotConfig {
            plot_limit: config.grid.limit,
            mode: config.mode,
            show: false,
            save: true,
            plot_name: Some(path.clone()),
            size: config.size,
        };
        plot_colormesh(&grid, &plot_config)?;
        if config.save_npz {
            grid.write_npz(&path.with_extension("npz"))?;
        }
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod test {
    use std::fs;
    use super::*;

    fn small_sweep(outdir: PathBuf) -> SweepConfig {
        SweepConfig {
            displacements: vec![0.0, 1.0],
            squeezings: vec![0.0, 0.2, 0.4],
            squeezing_phase_pi_units: 1.0,
            kerr_integer: 3,
            cutoff_dim: 12,
            grid: GridSpec::new(3.0, 9),
            mode: PlotMode::ColorMesh,
            outdir,
            save_npz: false,
            size: (320, 240),
        }
    }

    fn tmp_dir(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("kerr_sim_sweep_{}_{}", name, std::process::id()))
    }

    #[test]
    fn name_format() {
        assert_eq!(
            sweep_plot_name(2, 1.0, 3.0, 0.2, 70, 14.0, 400),
            "kerr_integer_2-squeezing_phase_pi_units_1.0000-displacement_3.0000-\
            squeezing_0.2000-fock_cutoff_dim_70-x_p_limit_14-\
            x_p_number_of_points_400.png",
        );
        assert!(sweep_plot_name(2, 0.0, 0.0, 0.0, 20, 2.5, 10).contains("x_p_limit_2.5-"));
    }

    #[test]
    fn one_image_per_pair() {
        let dir = tmp_dir("pairs");
        let config = small_sweep(dir.clone());
        let written = plot_all(&config).unwrap();
        assert_eq!(written.len(), 6);
        let distinct: HashSet<&PathBuf> = written.iter().collect();
        assert_eq!(distinct.len(), 6);
        assert!(written.iter().all(|p| p.exists()));
        let on_disk = fs::read_dir(&dir).unwrap().count();
        assert_eq!(on_disk, 6);

        // displacement is the outer loop
        let order: Vec<String>
            = written.iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert!(order[0].contains("displacement_0.0000-squeezing_0.0000"));
        assert!(order[1].contains("displacement_0.0000-squeezing_0.2000"));
        assert!(order[3].contains("displacement_1.0000-squeezing_0.0000"));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn npz_alongside_images() {
        let dir = tmp_dir("npz");
        let mut config = small_sweep(dir.clone());
        config.displacements = vec![1.0];
        config.squeezings = vec![0.0];
        config.save_npz = true;
        let written = plot_all(&config).unwrap();
        assert_eq!(written.len(), 1);
        assert!(written[0].with_extension("npz").exists());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn colliding_names_rejected_before_writing() {
        let dir = tmp_dir("collide");
        let mut config = small_sweep(dir.clone());
        config.displacements = vec![1.00001, 1.00002];
        config.squeezings = vec![0.0];
        assert!(matches!(
            plot_all(&config),
            Err(KerrError::DuplicatePlotName(name))
                if name.contains("displacement_1.0000-"),
        ));
        assert!(!dir.exists());

        config.displacements = vec![0.0, 1.0, 0.0];
        assert!(matches!(plot_all(&config), Err(KerrError::DuplicatePlotName(_))));
        assert!(!dir.exists());
    }

    #[test]
    fn first_failure_aborts() {
        let dir = tmp_dir("abort");
        let mut config = small_sweep(dir.clone());
        config.kerr_integer = -2;
        assert!(matches!(
            plot_all(&config),
            Err(KerrError::InvalidKerrInteger(-2)),
        ));
        assert!(!dir.exists());
    }
}

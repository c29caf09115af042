//! Sampling Wigner functions over square phase-space grids.

use std::{ fs::File, path::Path };
use ndarray as nd;
use ndarray_npy::NpzWriter;
use crate::{
    circuit::{ Program, Simulation },
    error::{ KerrError, KerrResult },
};

/// Square sampling window [−`limit`, `limit`]² with `points` samples per axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridSpec {
    pub limit: f64,
    pub points: usize,
}

impl Default for GridSpec {
    fn default() -> Self { Self { limit: 10.0, points: 200 } }
}

impl GridSpec {
    pub fn new(limit: f64, points: usize) -> Self { Self { limit, points } }

    pub fn validate(&self) -> KerrResult<()> {
        if !self.limit.is_finite() || self.limit <= 0.0 {
            return Err(KerrError::InvalidGrid(
                format!("limit must be finite and positive, got {}", self.limit)));
        }
        if self.points < 2 {
            return Err(KerrError::InvalidGrid(
                format!("need at least 2 points per axis, got {}", self.points)));
        }
        Ok(())
    }

    /// Evenly spaced coordinates from −`limit` to `limit`, inclusive.
    pub fn axis(&self) -> nd::Array1<f64> {
        let mut ax = nd::Array1::linspace(-self.limit, self.limit, self.points);
        // pin the endpoint against accumulated rounding in the step
        if let Some(last) = ax.last_mut() { *last = self.limit; }
        ax
    }
}

/// Wigner function samples on a square grid.
///
/// `z[[i, j]]` is the value at (`x[j]`, `p[i]`).
#[derive(Clone, Debug, PartialEq)]
pub struct PhaseSpaceGrid {
    pub x: nd::Array1<f64>,
    pub p: nd::Array1<f64>,
    pub z: nd::Array2<f64>,
}

impl PhaseSpaceGrid {
    /// Number of points along each axis.
    pub fn points(&self) -> usize { self.x.len() }

    /// Meshed coordinate arrays, each of shape `(p.len(), x.len())`.
    pub fn meshgrid(&self) -> (nd::Array2<f64>, nd::Array2<f64>) {
        let shape = (self.p.len(), self.x.len());
        let xx = nd::Array2::from_shape_fn(shape, |(_, j)| self.x[j]);
        let pp = nd::Array2::from_shape_fn(shape, |(i, _)| self.p[i]);
        (xx, pp)
    }

    /// Smallest and largest sampled values.
    pub fn z_range(&self) -> (f64, f64) {
        self.z.iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Riemann-sum estimate of ∫∫ *W* d*x* d*p*, which should be close to 1
    /// when the grid covers the state.
    pub fn integral(&self) -> f64 {
        let n = self.points();
        if n < 2 { return 0.0; }
        let dx = (self.x[n - 1] - self.x[0]) / (n - 1) as f64;
        let dp = (self.p[n - 1] - self.p[0]) / (n - 1) as f64;
        self.z.sum() * dx * dp
    }

    /// Save the axes and samples as arrays `x`, `p`, and `w` in an `.npz`
    /// archive.
    pub fn write_npz(&self, path: &Path) -> KerrResult<()> {
        let npz_err = |e: ndarray_npy::WriteNpzError| KerrError::Npz {
            path: path.to_path_buf(),
            msg: e.to_string(),
        };
        let file = File::create(path).map_err(|e| KerrError::io(path, e))?;
        let mut npz = NpzWriter::new(file);
        npz.add_array("x", &self.x).map_err(npz_err)?;
        npz.add_array("p", &self.p).map_err(npz_err)?;
        npz.add_array("w", &self.z).map_err(npz_err)?;
        npz.finish().map_err(npz_err)?;
        Ok(())
    }
}

/// Sample the Wigner function of `mode` in `simulation` over `grid`.
///
/// Nothing is cached; every call evaluates the state again.
pub fn wigner_samples(simulation: &Simulation, mode: usize, grid: &GridSpec)
    -> KerrResult<PhaseSpaceGrid>
{
    if mode >= Program::MODES {
        return Err(KerrError::InvalidMode { mode, modes: Program::MODES });
    }
    grid.validate()?;
    let state = simulation.valid_state()?;
    let x = grid.axis();
    let p = grid.axis();
    let z = match (x.as_slice(), p.as_slice()) {
        (Some(xs), Some(ps)) => state.wigner(xs, ps),
        _ => {
            let xs: Vec<f64> = x.to_vec();
            let ps: Vec<f64> = p.to_vec();
            state.wigner(&xs, &ps)
        },
    };
    Ok(PhaseSpaceGrid { x, p, z })
}

#[cfg(test)]
mod test {
    use std::f64::consts::PI;
    use super::*;
    use crate::circuit::{ kerr_displace_squeeze, SimulationParameters };

    fn vacuum_params() -> SimulationParameters {
        SimulationParameters {
            squeezing: 0.0,
            squeezing_phase: 0.0,
            displacement: 0.0,
            kerr_integer: 2,
            cutoff_dim: 20,
        }
    }

    #[test]
    fn grid_shape_and_span() {
        let sim = kerr_displace_squeeze(&vacuum_params()).unwrap();
        for &n in [2_usize, 7, 30].iter() {
            let grid = wigner_samples(&sim, 0, &GridSpec::new(3.5, n)).unwrap();
            assert_eq!(grid.x.len(), n);
            assert_eq!(grid.p.len(), n);
            assert_eq!(grid.z.shape(), &[n, n]);
            assert_eq!(grid.x[0], -3.5);
            assert_eq!(grid.x[n - 1], 3.5);
            assert_eq!(grid.p[0], -3.5);
            assert_eq!(grid.p[n - 1], 3.5);
            let step = 7.0 / (n - 1) as f64;
            grid.x.windows(2).into_iter()
                .for_each(|w| assert!((w[1] - w[0] - step).abs() < 1e-12));
        }
    }

    #[test]
    fn vacuum_is_symmetric_nonnegative_peak() {
        let sim = kerr_displace_squeeze(&vacuum_params()).unwrap();
        let grid = wigner_samples(&sim, 0, &GridSpec::new(4.0, 41)).unwrap();
        let n = grid.points();
        let c = n / 2;
        let peak = grid.z[[c, c]];
        assert!((peak - 1.0 / (2.0 * PI)).abs() < 1e-10);
        for i in 0..n {
            for j in 0..n {
                let v = grid.z[[i, j]];
                assert!(v >= 0.0);
                assert!(v <= peak);
                assert!((v - grid.z[[j, i]]).abs() < 1e-12);
                assert!((v - grid.z[[n - 1 - i, j]]).abs() < 1e-12);
                assert!((v - grid.z[[i, n - 1 - j]]).abs() < 1e-12);
            }
        }
        assert!((grid.integral() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn displacement_moves_peak_along_x() {
        let params = SimulationParameters {
            displacement: 1.0,
            kerr_integer: 0,
            ..vacuum_params()
        };
        let sim = kerr_displace_squeeze(&params).unwrap();
        let grid = wigner_samples(&sim, 0, &GridSpec::new(4.0, 41)).unwrap();
        let (imax, jmax)
            = grid.z.indexed_iter()
            .fold(((0, 0), f64::NEG_INFINITY), |(best, bv), (ij, &v)| {
                if v > bv { (ij, v) } else { (best, bv) }
            })
            .0;
        assert!(grid.p[imax].abs() < 1e-12);
        assert!((grid.x[jmax] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn bad_requests_rejected() {
        let sim = kerr_displace_squeeze(&vacuum_params()).unwrap();
        assert!(matches!(
            wigner_samples(&sim, 1, &GridSpec::default()),
            Err(KerrError::InvalidMode { mode: 1, modes: 1 }),
        ));
        assert!(matches!(
            wigner_samples(&sim, 0, &GridSpec::new(1.0, 1)),
            Err(KerrError::InvalidGrid(_)),
        ));
        assert!(matches!(
            wigner_samples(&sim, 0, &GridSpec::new(-1.0, 10)),
            Err(KerrError::InvalidGrid(_)),
        ));
        let empty = Simulation { state: None, cutoff_dim: 20 };
        assert!(matches!(
            wigner_samples(&empty, 0, &GridSpec::default()),
            Err(KerrError::InvalidState(_)),
        ));
    }

    #[test]
    fn npz_round_trip() {
        use ndarray_npy::NpzReader;
        let sim = kerr_displace_squeeze(&vacuum_params()).unwrap();
        let grid = wigner_samples(&sim, 0, &GridSpec::new(2.0, 5)).unwrap();
        let path = std::env::temp_dir()
            .join(format!("kerr_sim_grid_{}.npz", std::process::id()));
        grid.write_npz(&path).unwrap();
        let mut npz = NpzReader::new(File::open(&path).unwrap()).unwrap();
        let names = npz.names().unwrap();
        assert_eq!(names.len(), 3);
        let name = names.iter().find(|n| n.starts_with('w')).unwrap().clone();
        let w: nd::Array2<f64> = npz.by_name(&name).unwrap();
        assert_eq!(w, grid.z);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn meshgrid_matches_axes() {
        let sim = kerr_displace_squeeze(&vacuum_params()).unwrap();
        let grid = wigner_samples(&sim, 0, &GridSpec::new(1.0, 3)).unwrap();
        let (xx, pp) = grid.meshgrid();
        assert_eq!(xx.row(2).to_vec(), grid.x.to_vec());
        assert_eq!(pp.column(1).to_vec(), grid.p.to_vec());
    }
}

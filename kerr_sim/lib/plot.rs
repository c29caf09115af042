//! Rendering sampled Wigner functions.
//!
//! Two strategies are available, selected by [`PlotMode`]: a flat pseudocolor
//! mesh and a 3D surface. Both use a red-yellow-green diverging color map
//! stretched over the sampled range, clip the phase-space axes to ±`limit`, and
//! are accompanied by a color bar. Images are written as PNGs; "showing" a
//! plot prints a shaded character preview to stdout.
//!
//! Saving needs the `fonts` feature (on by default), which pulls in system font
//! discovery for axis and color bar text.

use std::{
    fs,
    path::{ Path, PathBuf },
    time::{ SystemTime, UNIX_EPOCH },
};
use plotters::{
    coord::Shift,
    prelude::*,
};
use crate::{
    error::{ KerrError, KerrResult },
    wigner::PhaseSpaceGrid,
};

const COLORBAR_WIDTH: u32 = 110;
const COLORBAR_STEPS: usize = 128;

/// Rendering strategy.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlotMode {
    /// Pseudocolor mesh over the (X, P) plane.
    #[default]
    ColorMesh,
    /// Surface W(X, P) in three dimensions.
    Surface,
}

/// Settings for [`plot_colormesh`].
#[derive(Clone, Debug, PartialEq)]
pub struct PlotConfig {
    /// Axes span [−`plot_limit`, `plot_limit`] in both X and P.
    pub plot_limit: f64,
    pub mode: PlotMode,
    /// Print a character preview to stdout.
    pub show: bool,
    /// Write a PNG.
    pub save: bool,
    /// Output path; defaults to a timestamp when `save` is set.
    pub plot_name: Option<PathBuf>,
    /// Image size in pixels.
    pub size: (u32, u32),
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            plot_limit: 10.0,
            mode: PlotMode::ColorMesh,
            show: true,
            save: false,
            plot_name: None,
            size: (900, 760),
        }
    }
}

/// Render `grid` according to `config`, returning the path of the written
/// image, if any.
pub fn plot_colormesh(grid: &PhaseSpaceGrid, config: &PlotConfig)
    -> KerrResult<Option<PathBuf>>
{
    if !config.plot_limit.is_finite() || config.plot_limit <= 0.0 {
        return Err(KerrError::InvalidParameter {
            name: "plot_limit", value: config.plot_limit });
    }
    let mut saved: Option<PathBuf> = None;
    if config.save {
        let path
            = config.plot_name.clone()
            .unwrap_or_else(default_plot_name);
        render_png(grid, config, &path)?;
        log::info!("saved plot to {}", path.display());
        saved = Some(path);
    }
    if config.show {
        println!("{}", render_preview(grid, config.plot_limit, 72));
    }
    Ok(saved)
}

/// File name made from the current time.
pub fn default_plot_name() -> PathBuf {
    let t = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    PathBuf::from(format!("{}.{:06}.png", t.as_secs(), t.subsec_micros()))
}

/// Write `grid` as a PNG at `path`, creating parent directories as needed.
pub fn render_png(grid: &PhaseSpaceGrid, config: &PlotConfig, path: &Path)
    -> KerrResult<()>
{
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| KerrError::io(parent, e))?;
        }
    }
    let (w, h) = config.size;
    let root = BitMapBackend::new(path, (w, h)).into_drawing_area();
    root.fill(&WHITE).map_err(KerrError::plot)?;
    let (main, bar)
        = root.split_horizontally(w.saturating_sub(COLORBAR_WIDTH));
    let (lo, hi) = grid.z_range();
    let norm = ColorNorm::new(lo, hi);
    match config.mode {
        PlotMode::ColorMesh
            => draw_colormesh(&main, grid, config.plot_limit, &norm)?,
        PlotMode::Surface
            => draw_surface(&main, grid, config.plot_limit, &norm)?,
    }
    draw_colorbar(&bar, &norm)?;
    root.present().map_err(KerrError::plot)?;
    Ok(())
}

/* color map ******************************************************************/

// matplotlib's RdYlGn anchors, low to high
const RDYLGN: [(u8, u8, u8); 11] = [
    (165,   0,  38),
    (215,  48,  39),
    (244, 109,  67),
    (253, 174,  97),
    (254, 224, 139),
    (255, 255, 191),
    (217, 239, 139),
    (166, 217, 106),
    (102, 189,  99),
    ( 26, 152,  80),
    (  0, 104,  55),
];

/// Linear map from a value range onto the color map.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ColorNorm {
    pub lo: f64,
    pub hi: f64,
}

impl ColorNorm {
    pub fn new(lo: f64, hi: f64) -> Self {
        if lo.is_finite() && hi.is_finite() && lo < hi {
            Self { lo, hi }
        } else if lo.is_finite() {
            // degenerate range; widen it so the bar still has an extent
            let pad = if lo == 0.0 { 1.0 } else { lo.abs() * 0.5 };
            Self { lo: lo - pad, hi: lo + pad }
        } else {
            Self { lo: 0.0, hi: 1.0 }
        }
    }

    /// Position of `v` in the range, clamped to [0, 1].
    pub fn unit(&self, v: f64) -> f64 {
        ((v - self.lo) / (self.hi - self.lo)).clamp(0.0, 1.0)
    }

    pub fn color(&self, v: f64) -> RGBColor {
        let t = self.unit(v) * (RDYLGN.len() - 1) as f64;
        let k = (t.floor() as usize).min(RDYLGN.len() - 2);
        let f = t - k as f64;
        let (r0, g0, b0) = RDYLGN[k];
        let (r1, g1, b1) = RDYLGN[k + 1];
        let mix = |a: u8, b: u8| -> u8 {
            (a as f64 + f * (b as f64 - a as f64)).round() as u8
        };
        RGBColor(mix(r0, r1), mix(g0, g1), mix(b0, b1))
    }
}

/* strategies *****************************************************************/

// cell boundaries for samples at `centers`: midpoints between neighbors, with
// the outer edges half a step beyond the ends; needs at least two centers
fn cell_edges(centers: &[f64]) -> Vec<f64> {
    let n = centers.len();
    let mut edges: Vec<f64> = Vec::with_capacity(n + 1);
    edges.push(centers[0] - (centers[1] - centers[0]) / 2.0);
    centers.windows(2).for_each(|w| edges.push((w[0] + w[1]) / 2.0));
    edges.push(centers[n - 1] + (centers[n - 1] - centers[n - 2]) / 2.0);
    edges
}

/// Rectangular cells `(x0, x1, p0, p1, w)` of the mesh, clipped to ±`limit`.
pub fn mesh_cells(grid: &PhaseSpaceGrid, limit: f64)
    -> Vec<(f64, f64, f64, f64, f64)>
{
    let xs = grid.x.to_vec();
    let ps = grid.p.to_vec();
    if xs.len() < 2 || ps.len() < 2 { return Vec::new(); }
    let xe = cell_edges(&xs);
    let pe = cell_edges(&ps);
    let clip = |v: f64| v.clamp(-limit, limit);
    let mut cells = Vec::with_capacity(xs.len() * ps.len());
    for i in 0..ps.len() {
        let (p0, p1) = (clip(pe[i]), clip(pe[i + 1]));
        if p0 >= p1 { continue; }
        for j in 0..xs.len() {
            let (x0, x1) = (clip(xe[j]), clip(xe[j + 1]));
            if x0 >= x1 { continue; }
            cells.push((x0, x1, p0, p1, grid.z[[i, j]]));
        }
    }
    cells
}

fn draw_colormesh<DB>(
    area: &DrawingArea<DB, Shift>,
    grid: &PhaseSpaceGrid,
    limit: f64,
    norm: &ColorNorm,
) -> KerrResult<()>
where DB: DrawingBackend
{
    let mut chart
        = ChartBuilder::on(area)
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(-limit..limit, -limit..limit)
        .map_err(KerrError::plot)?;
    chart.configure_mesh()
        .disable_mesh()
        .x_desc("X")
        .y_desc("P")
        .draw()
        .map_err(KerrError::plot)?;
    chart.draw_series(
        mesh_cells(grid, limit).into_iter()
            .map(|(x0, x1, p0, p1, w)| {
                Rectangle::new([(x0, p0), (x1, p1)], norm.color(w).filled())
            })
    ).map_err(KerrError::plot)?;
    Ok(())
}

fn draw_surface<DB>(
    area: &DrawingArea<DB, Shift>,
    grid: &PhaseSpaceGrid,
    limit: f64,
    norm: &ColorNorm,
) -> KerrResult<()>
where DB: DrawingBackend
{
    let (zlo, zhi) = (norm.lo, norm.hi);
    let mut chart
        = ChartBuilder::on(area)
        .margin(15)
        .build_cartesian_3d(-limit..limit, zlo..zhi, -limit..limit)
        .map_err(KerrError::plot)?;
    chart.with_projection(|mut pb| {
        pb.pitch = 0.5;
        pb.yaw = 0.6;
        pb.scale = 0.8;
        pb.into_matrix()
    });
    chart.configure_axes()
        .max_light_lines(3)
        .draw()
        .map_err(KerrError::plot)?;

    let inside = |v: f64| (-limit..=limit).contains(&v);
    let n = grid.points();
    let mut faces = Vec::new();
    for i in 0..n.saturating_sub(1) {
        if !inside(grid.p[i]) || !inside(grid.p[i + 1]) { continue; }
        for j in 0..n.saturating_sub(1) {
            if !inside(grid.x[j]) || !inside(grid.x[j + 1]) { continue; }
            let corners = [
                (grid.x[j],     grid.z[[i,     j    ]], grid.p[i]    ),
                (grid.x[j + 1], grid.z[[i,     j + 1]], grid.p[i]    ),
                (grid.x[j + 1], grid.z[[i + 1, j + 1]], grid.p[i + 1]),
                (grid.x[j],     grid.z[[i + 1, j    ]], grid.p[i + 1]),
            ];
            let mean = corners.iter().map(|c| c.1).sum::<f64>() / 4.0;
            faces.push(Polygon::new(corners.to_vec(), norm.color(mean).filled()));
        }
    }
    chart.draw_series(faces).map_err(KerrError::plot)?;

    let labels = [
        ("X", (limit, zlo, -limit)),
        ("P", (-limit, zlo, limit)),
        ("W", (-limit, zhi, -limit)),
    ];
    chart.draw_series(
        labels.into_iter()
            .map(|(s, pos)| Text::new(s, pos, ("sans-serif", 20)))
    ).map_err(KerrError::plot)?;
    Ok(())
}

fn draw_colorbar<DB>(area: &DrawingArea<DB, Shift>, norm: &ColorNorm)
    -> KerrResult<()>
where DB: DrawingBackend
{
    let (lo, hi) = (norm.lo, norm.hi);
    let mut chart
        = ChartBuilder::on(area)
        .margin_top(20)
        .margin_bottom(55)
        .margin_right(10)
        .y_label_area_size(65)
        .build_cartesian_2d(0.0..1.0, lo..hi)
        .map_err(KerrError::plot)?;
    chart.configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_label_formatter(&|v: &f64| format!("{:.3}", v))
        .draw()
        .map_err(KerrError::plot)?;
    let dv = (hi - lo) / COLORBAR_STEPS as f64;
    chart.draw_series(
        (0..COLORBAR_STEPS).map(|k| {
            let v0 = lo + dv * k as f64;
            let v1 = v0 + dv;
            Rectangle::new(
                [(0.0, v0), (1.0, v1)],
                norm.color((v0 + v1) / 2.0).filled(),
            )
        })
    ).map_err(KerrError::plot)?;
    Ok(())
}

/* terminal preview ***********************************************************/

const SHADES: &[u8] = b" .:-=+*#%@";

/// Character rendering of the region of `grid` within ±`limit`, `cols` wide,
/// with P increasing upward.
pub fn render_preview(grid: &PhaseSpaceGrid, limit: f64, cols: usize)
    -> String
{
    let n = grid.points();
    if n == 0 || cols == 0 { return String::new(); }
    let rows = (cols / 2).max(1);
    let (lo, hi) = grid.z_range();
    let norm = ColorNorm::new(lo, hi);
    let nearest = |axis: &ndarray::Array1<f64>, v: f64| -> usize {
        axis.iter()
            .enumerate()
            .fold((0, f64::INFINITY), |(best, bd), (k, a)| {
                let d = (a - v).abs();
                if d < bd { (k, d) } else { (best, bd) }
            })
            .0
    };
    let coord = |k: usize, m: usize| -> f64 {
        if m < 2 { 0.0 } else { -limit + 2.0 * limit * k as f64 / (m - 1) as f64 }
    };
    let mut out = String::with_capacity((cols + 1) * rows);
    for r in 0..rows {
        let i = nearest(&grid.p, coord(rows - 1 - r, rows));
        for c in 0..cols {
            let j = nearest(&grid.x, coord(c, cols));
            let t = norm.unit(grid.z[[i, j]]);
            let s = ((t * (SHADES.len() - 1) as f64).round() as usize)
                .min(SHADES.len() - 1);
            out.push(SHADES[s] as char);
        }
        if r < rows - 1 { out.push('\n'); }
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        circuit::{ kerr_displace_squeeze, SimulationParameters },
        wigner::{ wigner_samples, GridSpec },
    };

    fn sample(displacement: f64, points: usize) -> PhaseSpaceGrid {
        let params = SimulationParameters {
            displacement,
            kerr_integer: 2,
            cutoff_dim: 20,
            ..SimulationParameters::default()
        };
        let sim = kerr_displace_squeeze(&params).unwrap();
        wigner_samples(&sim, 0, &GridSpec::new(3.0, points)).unwrap()
    }

    fn tmp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("kerr_sim_plot_{}_{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn colormap_endpoints() {
        let norm = ColorNorm::new(-1.0, 1.0);
        assert_eq!(norm.color(-1.0).rgb(), (165, 0, 38));
        assert_eq!(norm.color(1.0).rgb(), (0, 104, 55));
        assert_eq!(norm.color(0.0).rgb(), (255, 255, 191));
        assert_eq!(norm.color(5.0).rgb(), norm.color(1.0).rgb());
        let flat = ColorNorm::new(0.0, 0.0);
        assert!(flat.lo < flat.hi);
    }

    #[test]
    fn cells_cover_clipped_window() {
        let grid = sample(0.0, 7);
        let cells = mesh_cells(&grid, 2.0);
        let area: f64
            = cells.iter().map(|(x0, x1, p0, p1, _)| (x1 - x0) * (p1 - p0)).sum();
        assert!((area - 16.0).abs() < 1e-9);
        assert!(cells.iter().all(|c| c.0 >= -2.0 && c.1 <= 2.0));
        let full = mesh_cells(&grid, 10.0);
        assert_eq!(full.len(), 49);
    }

    #[test]
    fn saves_both_modes() {
        let dir = tmp_dir("modes");
        let grid = sample(1.0, 15);
        for (mode, name) in [
            (PlotMode::ColorMesh, "mesh.png"),
            (PlotMode::Surface, "surface.png"),
        ] {
            let config = PlotConfig {
                plot_limit: 3.0,
                mode,
                show: false,
                save: true,
                plot_name: Some(dir.join(name)),
                size: (320, 240),
            };
            let path = plot_colormesh(&grid, &config).unwrap().unwrap();
            assert_eq!(path, dir.join(name));
            assert!(fs::metadata(&path).unwrap().len() > 0);
        }
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn default_features_save_labeled_png() {
        assert!(cfg!(feature = "fonts"));
        let dir = tmp_dir("labeled");
        let path = dir.join("labeled.png");
        let config = PlotConfig {
            plot_limit: 3.0,
            show: false,
            save: true,
            plot_name: Some(path.clone()),
            ..PlotConfig::default()
        };
        let saved = plot_colormesh(&sample(0.5, 11), &config).unwrap();
        assert_eq!(saved.as_ref(), Some(&path));
        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[..4], b"\x89PNG");
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn nothing_saved_when_only_showing() {
        let grid = sample(0.0, 9);
        let config = PlotConfig { plot_limit: 3.0, ..PlotConfig::default() };
        assert_eq!(plot_colormesh(&grid, &config).unwrap(), None);
    }

    #[test]
    fn preview_peak_in_center() {
        let grid = sample(0.0, 31);
        let text = render_preview(&grid, 3.0, 21);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 10);
        assert!(lines.iter().all(|l| l.len() == 21));
        assert_eq!(lines[0].as_bytes()[0], b' ');
        // rows straddle p = 0 at ±0.4, so the densest shades sit there
        assert!(b"%@".contains(&lines[4].as_bytes()[10]));
        assert!(b"%@".contains(&lines[5].as_bytes()[10]));
        assert_eq!(lines[4].as_bytes()[0], b' ');
    }

    #[test]
    fn default_name_is_png() {
        let name = default_plot_name();
        assert_eq!(name.extension().and_then(|e| e.to_str()), Some("png"));
    }
}

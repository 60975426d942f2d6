//! Grid axes and boolean cell masks.

use hull_common::bbox::BoundingBox;

/// Relative tolerance for treating an axis as evenly spaced.
const REGULAR_TOLERANCE: f64 = 1e-6;

/// Cell-centre coordinates of a 2-D grid.
///
/// Axes may ascend or descend; `y` is the row axis.
#[derive(Debug, Clone, PartialEq)]
pub struct GridAxes {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl GridAxes {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Self {
        Self { x, y }
    }

    pub fn nx(&self) -> usize {
        self.x.len()
    }

    pub fn ny(&self) -> usize {
        self.y.len()
    }

    /// Median absolute spacing of the x axis, `None` when degenerate.
    pub fn spacing_x(&self) -> Option<f64> {
        median_spacing(&self.x)
    }

    /// Median absolute spacing of the y axis, `None` when degenerate.
    pub fn spacing_y(&self) -> Option<f64> {
        median_spacing(&self.y)
    }

    /// Signed step and origin of both axes when they are evenly spaced.
    pub fn regular_steps(&self) -> Option<RegularSteps> {
        Some(RegularSteps {
            x0: *self.x.first()?,
            y0: *self.y.first()?,
            dx: regular_step(&self.x)?,
            dy: regular_step(&self.y)?,
        })
    }

    /// Cell-edge extent: axis range padded by half a cell on each side.
    ///
    /// A degenerate axis borrows the other axis' spacing.
    pub fn extent(&self) -> Option<BoundingBox> {
        let (min_x, max_x) = min_max(&self.x)?;
        let (min_y, max_y) = min_max(&self.y)?;
        let (sx, sy) = (self.spacing_x(), self.spacing_y());
        let pad_x = sx.or(sy).unwrap_or(0.0) / 2.0;
        let pad_y = sy.or(sx).unwrap_or(0.0) / 2.0;
        Some(BoundingBox::new(min_x, min_y, max_x, max_y).expand(pad_x, pad_y))
    }

    /// Index of the axis value nearest to `v`.
    pub fn nearest_x(&self, v: f64) -> Option<usize> {
        nearest(&self.x, v)
    }

    pub fn nearest_y(&self, v: f64) -> Option<usize> {
        nearest(&self.y, v)
    }
}

/// Origin and signed step of a regular grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegularSteps {
    pub x0: f64,
    pub y0: f64,
    pub dx: f64,
    pub dy: f64,
}

impl RegularSteps {
    /// Fractional column index of `x` (cell `c` spans `c - 0.5 ..= c + 0.5`).
    pub fn col_f(&self, x: f64) -> f64 {
        (x - self.x0) / self.dx
    }

    /// Fractional row index of `y`.
    pub fn row_f(&self, y: f64) -> f64 {
        (y - self.y0) / self.dy
    }
}

fn median_spacing(axis: &[f64]) -> Option<f64> {
    if axis.len() < 2 {
        return None;
    }
    let mut diffs: Vec<f64> = axis.windows(2).map(|w| (w[1] - w[0]).abs()).collect();
    diffs.sort_by(|a, b| a.total_cmp(b));
    let median = diffs[diffs.len() / 2];
    (median.is_finite() && median > 0.0).then_some(median)
}

fn regular_step(axis: &[f64]) -> Option<f64> {
    if axis.len() < 2 {
        return None;
    }
    let step = axis[1] - axis[0];
    if !step.is_finite() || step == 0.0 {
        return None;
    }
    let uniform = axis
        .windows(2)
        .all(|w| ((w[1] - w[0]) - step).abs() <= REGULAR_TOLERANCE * step.abs());
    uniform.then_some(step)
}

fn min_max(axis: &[f64]) -> Option<(f64, f64)> {
    let first = *axis.first()?;
    Some(axis.iter().fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))))
}

fn nearest(axis: &[f64], v: f64) -> Option<usize> {
    axis.iter()
        .enumerate()
        .min_by(|a, b| (a.1 - v).abs().total_cmp(&(b.1 - v).abs()))
        .map(|(i, _)| i)
}

/// Row-major boolean mask over a grid (`ny` rows of `nx` cells).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    nx: usize,
    ny: usize,
    cells: Vec<bool>,
}

impl Mask {
    /// An all-outside mask.
    pub fn empty(ny: usize, nx: usize) -> Self {
        Self {
            nx,
            ny,
            cells: vec![false; nx * ny],
        }
    }

    /// Wrap existing cells; `None` when the length does not match the shape.
    pub fn from_cells(ny: usize, nx: usize, cells: Vec<bool>) -> Option<Self> {
        (cells.len() == nx * ny).then_some(Self { nx, ny, cells })
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [bool] {
        &mut self.cells
    }

    pub fn get(&self, row: usize, col: usize) -> bool {
        row < self.ny && col < self.nx && self.cells[row * self.nx + col]
    }

    pub fn set(&mut self, row: usize, col: usize, inside: bool) {
        if row < self.ny && col < self.nx {
            self.cells[row * self.nx + col] = inside;
        }
    }

    /// Number of inside cells.
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.cells.iter().any(|&c| c)
    }

    /// `(row, col)` of every inside cell in row-major order.
    pub fn iter_indices(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let nx = self.nx;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &c)| c)
            .map(move |(i, _)| (i / nx, i % nx))
    }
}

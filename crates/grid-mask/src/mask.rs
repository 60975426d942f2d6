//! Polygon-to-grid masking strategies.
//!
//! [`CellIntersectionMask`] is the reference behaviour: a cell is inside
//! when its rectangle intersects the polygon, with a centre-point fallback
//! for grids without a usable cell size. A polygon that reaches the grid's
//! extent but no cell (a gap in an irregular axis, a single-column grid)
//! registers the cell nearest its centroid.
//! [`ScanlineMask`] computes the same all-touched mask on regular grids by
//! scan conversion. [`PolygonGridMask`] tries a preferred strategy and falls
//! back to the reference one on any error.

use crate::config::{MaskConfig, MaskStrategyKind};
use crate::grid::{GridAxes, Mask};
use geo::{BoundingRect, Centroid, Coord, Intersects, Polygon, Rect};
use hull_common::{HullError, HullResult};
use rayon::prelude::*;
use std::fmt;
use tracing::{debug, warn};

/// A way of turning one polygon into a boolean grid mask.
///
/// Implementations are pure: the same polygon and axes always give the same
/// mask, so rows may be evaluated in parallel.
pub trait MaskStrategy: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    fn mask(&self, polygon: &Polygon<f64>, axes: &GridAxes) -> HullResult<Mask>;
}

fn check_inputs(polygon: &Polygon<f64>, axes: &GridAxes) -> HullResult<()> {
    let ring = &polygon.exterior().0;
    if ring.len() < 4 {
        return Err(HullError::input(format!(
            "polygon exterior has {} coordinates, need at least 4",
            ring.len()
        )));
    }
    let finite = std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .flat_map(|r| r.0.iter())
        .all(|c| c.x.is_finite() && c.y.is_finite());
    if !finite {
        return Err(HullError::input("polygon has non-finite coordinates"));
    }
    if axes.nx() == 0 || axes.ny() == 0 {
        return Err(HullError::input("grid has no cells"));
    }
    Ok(())
}

/// Cells whose half-spacing rectangle intersects the polygon (edges count).
pub fn cells_intersecting(polygon: &Polygon<f64>, axes: &GridAxes, dx: f64, dy: f64) -> Mask {
    let mut mask = Mask::empty(axes.ny(), axes.nx());
    let Some(bounds) = polygon.bounding_rect() else {
        return mask;
    };
    let (hx, hy) = (dx / 2.0, dy / 2.0);
    let nx = axes.nx();

    mask.cells_mut()
        .par_chunks_mut(nx)
        .enumerate()
        .for_each(|(row, out)| {
            let cy = axes.y[row];
            if cy + hy < bounds.min().y || cy - hy > bounds.max().y {
                return;
            }
            for (col, cell) in out.iter_mut().enumerate() {
                let cx = axes.x[col];
                if cx + hx < bounds.min().x || cx - hx > bounds.max().x {
                    continue;
                }
                let rect = Rect::new(
                    Coord { x: cx - hx, y: cy - hy },
                    Coord { x: cx + hx, y: cy + hy },
                );
                *cell = polygon.intersects(&rect);
            }
        });
    mask
}

/// Cells whose centre lies inside or on the polygon.
pub fn centres_inside(polygon: &Polygon<f64>, axes: &GridAxes) -> Mask {
    let mut mask = Mask::empty(axes.ny(), axes.nx());
    let nx = axes.nx();
    mask.cells_mut()
        .par_chunks_mut(nx)
        .enumerate()
        .for_each(|(row, out)| {
            let cy = axes.y[row];
            for (col, cell) in out.iter_mut().enumerate() {
                *cell = polygon.intersects(&Coord { x: axes.x[col], y: cy });
            }
        });
    mask
}

/// The single cell nearest the polygon centroid, when the polygon itself
/// reaches the grid's cell extent.
fn nearest_cell(polygon: &Polygon<f64>, axes: &GridAxes) -> Option<Mask> {
    let extent = Rect::from(axes.extent()?);
    if !polygon.intersects(&extent) {
        return None;
    }
    let centroid = polygon.centroid()?;
    let col = axes.nearest_x(centroid.x())?;
    let row = axes.nearest_y(centroid.y())?;
    let mut mask = Mask::empty(axes.ny(), axes.nx());
    mask.set(row, col, true);
    Some(mask)
}

/// Exact cell-rectangle intersection with point fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct CellIntersectionMask;

impl MaskStrategy for CellIntersectionMask {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn mask(&self, polygon: &Polygon<f64>, axes: &GridAxes) -> HullResult<Mask> {
        check_inputs(polygon, axes)?;

        if let (Some(dx), Some(dy)) = (axes.spacing_x(), axes.spacing_y()) {
            let exact = cells_intersecting(polygon, axes, dx, dy);
            if !exact.is_empty() {
                return Ok(exact);
            }
            debug!("No cell rectangle intersects polygon, testing cell centres");
        }

        let centres = centres_inside(polygon, axes);
        if !centres.is_empty() {
            return Ok(centres);
        }
        Ok(nearest_cell(polygon, axes).unwrap_or(centres))
    }
}

/// All-touched scan conversion on evenly spaced axes.
///
/// Interior cells come from even-odd crossings of each row's centre line;
/// boundary cells from clipping every edge against the cells its bounding
/// box covers. Irregular axes and empty results are errors so the caller
/// can fall back.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanlineMask;

impl MaskStrategy for ScanlineMask {
    fn name(&self) -> &'static str {
        "scanline"
    }

    fn mask(&self, polygon: &Polygon<f64>, axes: &GridAxes) -> HullResult<Mask> {
        check_inputs(polygon, axes)?;
        let steps = axes
            .regular_steps()
            .ok_or_else(|| HullError::input("scanline masking needs evenly spaced axes"))?;

        let edges: Vec<(Coord<f64>, Coord<f64>)> = std::iter::once(polygon.exterior())
            .chain(polygon.interiors())
            .flat_map(|ring| ring.lines().map(|l| (l.start, l.end)))
            .collect();

        let (nx, ny) = (axes.nx(), axes.ny());
        let mut mask = Mask::empty(ny, nx);

        mask.cells_mut()
            .par_chunks_mut(nx)
            .enumerate()
            .for_each(|(row, out)| fill_row(&edges, axes.y[row], &axes.x, out));

        let (hx, hy) = (steps.dx.abs() / 2.0, steps.dy.abs() / 2.0);
        for &(a, b) in &edges {
            let Some((c0, c1)) = index_range(steps.col_f(a.x), steps.col_f(b.x), nx) else {
                continue;
            };
            let Some((r0, r1)) = index_range(steps.row_f(a.y), steps.row_f(b.y), ny) else {
                continue;
            };
            for row in r0..=r1 {
                let cy = axes.y[row];
                for col in c0..=c1 {
                    let cx = axes.x[col];
                    if segment_hits_rect(a, b, cx - hx, cy - hy, cx + hx, cy + hy) {
                        mask.set(row, col, true);
                    }
                }
            }
        }

        if mask.is_empty() {
            return Err(HullError::empty_result("scanline selected no cells"));
        }
        Ok(mask)
    }
}

fn fill_row(edges: &[(Coord<f64>, Coord<f64>)], y: f64, xs: &[f64], out: &mut [bool]) {
    let mut crossings: Vec<f64> = edges
        .iter()
        .filter(|(a, b)| (a.y <= y) != (b.y <= y))
        .map(|(a, b)| a.x + (y - a.y) * (b.x - a.x) / (b.y - a.y))
        .collect();
    crossings.sort_by(|a, b| a.total_cmp(b));

    for span in crossings.chunks_exact(2) {
        let (lo, hi) = (span[0], span[1]);
        for (cell, &x) in out.iter_mut().zip(xs) {
            if x >= lo && x <= hi {
                *cell = true;
            }
        }
    }
}

/// Inclusive index range of cells overlapping fractional positions `f0..f1`.
fn index_range(f0: f64, f1: f64, n: usize) -> Option<(usize, usize)> {
    let lo = (f0.min(f1) - 0.5).ceil().max(0.0);
    let hi = (f0.max(f1) + 0.5).floor().min(n as f64 - 1.0);
    (lo <= hi).then(|| (lo as usize, hi as usize))
}

// Liang-Barsky: does segment a-b touch the closed rectangle?
fn segment_hits_rect(a: Coord<f64>, b: Coord<f64>, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> bool {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in [
        (-dx, a.x - min_x),
        (dx, max_x - a.x),
        (-dy, a.y - min_y),
        (dy, max_y - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return false;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return false;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return false;
                }
                t1 = t1.min(r);
            }
        }
    }
    true
}

/// Polygon masking with an optional preferred strategy.
///
/// The reference [`CellIntersectionMask`] always backs the preferred one.
#[derive(Debug)]
pub struct PolygonGridMask {
    preferred: Option<Box<dyn MaskStrategy>>,
    fallback: CellIntersectionMask,
}

impl Default for PolygonGridMask {
    fn default() -> Self {
        Self::new()
    }
}

impl PolygonGridMask {
    /// Reference strategy only.
    pub fn new() -> Self {
        Self {
            preferred: None,
            fallback: CellIntersectionMask,
        }
    }

    /// Try `strategy` first, falling back to the reference on error.
    pub fn with_strategy(strategy: Box<dyn MaskStrategy>) -> Self {
        Self {
            preferred: Some(strategy),
            fallback: CellIntersectionMask,
        }
    }

    pub fn from_config(config: &MaskConfig) -> Self {
        match config.strategy {
            MaskStrategyKind::Exact => Self::new(),
            MaskStrategyKind::Scanline => Self::with_strategy(Box::new(ScanlineMask)),
        }
    }

    /// Name of the strategy tried first.
    pub fn strategy_name(&self) -> &'static str {
        self.preferred
            .as_ref()
            .map(|s| s.name())
            .unwrap_or_else(|| self.fallback.name())
    }

    pub fn mask(&self, polygon: &Polygon<f64>, axes: &GridAxes) -> HullResult<Mask> {
        if let Some(strategy) = &self.preferred {
            match strategy.mask(polygon, axes) {
                Ok(mask) => return Ok(mask),
                Err(e) => warn!(
                    strategy = strategy.name(),
                    error = %e,
                    "Preferred mask strategy failed, using exact intersection"
                ),
            }
        }
        self.fallback.mask(polygon, axes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    fn unit_axes(n: usize) -> GridAxes {
        let centres: Vec<f64> = (0..n).map(|i| i as f64 + 0.5).collect();
        GridAxes::new(centres.clone(), centres)
    }

    #[test]
    fn test_exact_marks_touched_cells() {
        let poly = polygon![(x: 1.2, y: 1.2), (x: 2.8, y: 1.2), (x: 2.8, y: 2.8), (x: 1.2, y: 2.8)];
        let mask = CellIntersectionMask.mask(&poly, &unit_axes(5)).unwrap();
        assert_eq!(mask.count(), 4);
        assert!(mask.get(1, 1) && mask.get(1, 2) && mask.get(2, 1) && mask.get(2, 2));
    }

    #[test]
    fn test_single_column_uses_centre_fallback() {
        let axes = GridAxes::new(vec![0.0], vec![0.0, 1.0]);
        let hit = polygon![(x: -0.1, y: -0.1), (x: 0.1, y: -0.1), (x: 0.1, y: 0.1), (x: -0.1, y: 0.1)];
        let mask = CellIntersectionMask.mask(&hit, &axes).unwrap();
        assert_eq!(mask.iter_indices().collect::<Vec<_>>(), vec![(0, 0)]);
    }

    #[test]
    fn test_tiny_polygon_registers_nearest_cell() {
        let axes = GridAxes::new(vec![0.0], vec![0.0, 1.0]);
        let poly = polygon![(x: 0.04, y: 0.94), (x: 0.06, y: 0.94), (x: 0.06, y: 0.96), (x: 0.04, y: 0.96)];
        let mask = CellIntersectionMask.mask(&poly, &axes).unwrap();
        assert_eq!(mask.iter_indices().collect::<Vec<_>>(), vec![(1, 0)]);

        let far = polygon![(x: 5.0, y: 5.0), (x: 5.1, y: 5.0), (x: 5.1, y: 5.1)];
        assert!(CellIntersectionMask.mask(&far, &axes).unwrap().is_empty());
    }

    #[test]
    fn test_polygon_outside_grid_is_empty() {
        let poly = polygon![(x: 50.0, y: 50.0), (x: 51.0, y: 50.0), (x: 51.0, y: 51.0)];
        assert!(CellIntersectionMask.mask(&poly, &unit_axes(4)).unwrap().is_empty());
    }

    #[test]
    fn test_diamond_beyond_grid_corner_is_empty() {
        // Bounding box overlaps the grid corner, the diamond itself does not
        let diamond = polygon![(x: 6.2, y: 5.0), (x: 5.0, y: 6.2), (x: 3.8, y: 5.0), (x: 5.0, y: 3.8)];
        let axes = unit_axes(4);
        assert!(CellIntersectionMask.mask(&diamond, &axes).unwrap().is_empty());
        let masker = PolygonGridMask::with_strategy(Box::new(ScanlineMask));
        assert!(masker.mask(&diamond, &axes).unwrap().is_empty());
    }

    #[test]
    fn test_polygon_in_axis_gap_registers_nearest_cell() {
        let axes = GridAxes::new(vec![0.5, 1.5, 2.5, 9.5], vec![0.5, 1.5, 2.5]);
        let poly = polygon![(x: 4.9, y: 1.4), (x: 5.1, y: 1.4), (x: 5.1, y: 1.6), (x: 4.9, y: 1.6)];
        let mask = CellIntersectionMask.mask(&poly, &axes).unwrap();
        assert_eq!(mask.iter_indices().collect::<Vec<_>>(), vec![(1, 2)]);
    }

    #[test]
    fn test_covering_polygon_selects_every_cell() {
        let poly = polygon![(x: -1.0, y: -1.0), (x: 10.0, y: -1.0), (x: 10.0, y: 10.0), (x: -1.0, y: 10.0)];
        let axes = unit_axes(9);
        assert_eq!(CellIntersectionMask.mask(&poly, &axes).unwrap().count(), 81);
        assert_eq!(ScanlineMask.mask(&poly, &axes).unwrap().count(), 81);
        let masker = PolygonGridMask::from_config(&MaskConfig {
            strategy: MaskStrategyKind::Scanline,
            ..Default::default()
        });
        assert_eq!(masker.mask(&poly, &axes).unwrap().count(), 81);
    }

    #[test]
    fn test_scanline_matches_exact() {
        let poly = polygon![
            (x: 1.13, y: 0.71),
            (x: 6.37, y: 1.29),
            (x: 7.41, y: 5.83),
            (x: 3.97, y: 7.17),
            (x: 0.83, y: 4.61),
            (x: 3.05, y: 3.33),
        ];
        let axes = unit_axes(9);
        let exact = CellIntersectionMask.mask(&poly, &axes).unwrap();
        let scan = ScanlineMask.mask(&poly, &axes).unwrap();
        assert_eq!(exact, scan);
    }

    #[test]
    fn test_scanline_rejects_irregular_axes() {
        let axes = GridAxes::new(vec![0.0, 1.0, 3.0], vec![0.0, 1.0, 2.0]);
        let poly = polygon![(x: 0.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 2.0)];
        assert!(ScanlineMask.mask(&poly, &axes).is_err());

        let masker = PolygonGridMask::with_strategy(Box::new(ScanlineMask));
        assert_eq!(masker.strategy_name(), "scanline");
        let mask = masker.mask(&poly, &axes).unwrap();
        assert_eq!(mask, CellIntersectionMask.mask(&poly, &axes).unwrap());
    }

    #[test]
    fn test_invalid_polygon_rejected() {
        let poly = Polygon::new(geo::LineString::from(vec![(0.0, 0.0), (1.0, 1.0)]), vec![]);
        let err = PolygonGridMask::new().mask(&poly, &unit_axes(3)).unwrap_err();
        assert_eq!(err.error_code(), "InputError");
    }

    #[test]
    fn test_from_config() {
        let config = MaskConfig {
            strategy: MaskStrategyKind::Scanline,
            ..Default::default()
        };
        assert_eq!(PolygonGridMask::from_config(&config).strategy_name(), "scanline");
        assert_eq!(PolygonGridMask::new().strategy_name(), "exact");
    }

    #[test]
    fn test_segment_hits_rect() {
        let a = Coord { x: -1.0, y: 0.5 };
        let b = Coord { x: 2.0, y: 0.5 };
        assert!(segment_hits_rect(a, b, 0.0, 0.0, 1.0, 1.0));
        let c = Coord { x: -1.0, y: 2.0 };
        assert!(!segment_hits_rect(a, c, 0.0, 0.0, 1.0, 1.0));
    }
}

//! Equal arc-length sampling of polygon boundaries.
//!
//! Samples are placed by distance travelled along the exterior ring, so the
//! density depends only on the boundary's shape and not on how its source
//! vertices happen to be laid out.

use geo::{coord, Coord, Line, LineString, Polygon};

/// Total length of a ring, closing segment included.
pub fn ring_length(ring: &LineString<f64>) -> f64 {
    ring.lines().map(|l| l.dx().hypot(l.dy())).sum()
}

/// Walk `ring` placing `n` samples at equal arc-length steps from its first vertex.
///
/// Returns an empty vector when the ring has zero or non-finite length.
pub fn sample_ring(ring: &LineString<f64>, n: usize) -> Vec<Coord<f64>> {
    let mut segments: Vec<Line<f64>> = ring.lines().collect();
    if !ring.is_closed() {
        if let (Some(first), Some(last)) = (ring.0.first(), ring.0.last()) {
            segments.push(Line::new(*last, *first));
        }
    }
    let lengths: Vec<f64> = segments.iter().map(|l| l.dx().hypot(l.dy())).collect();
    let total: f64 = lengths.iter().sum();
    if n == 0 || segments.is_empty() || !total.is_finite() || total <= 0.0 {
        return Vec::new();
    }

    let step = total / n as f64;
    let mut samples = Vec::with_capacity(n);
    let mut seg = 0usize;
    let mut seg_start = 0.0;
    for k in 0..n {
        let target = k as f64 * step;
        while seg + 1 < segments.len() && seg_start + lengths[seg] <= target {
            seg_start += lengths[seg];
            seg += 1;
        }
        let line = segments[seg];
        let len = lengths[seg];
        let t = if len > 0.0 {
            ((target - seg_start) / len).clamp(0.0, 1.0)
        } else {
            0.0
        };
        samples.push(coord! {
            x: line.start.x + t * line.dx(),
            y: line.start.y + t * line.dy(),
        });
    }
    samples
}

/// Subtract the mean of the samples from each sample.
pub fn recenter(samples: &mut [Coord<f64>]) {
    if samples.is_empty() {
        return;
    }
    let n = samples.len() as f64;
    let (sx, sy) = samples.iter().fold((0.0, 0.0), |(sx, sy), c| (sx + c.x, sy + c.y));
    let (mx, my) = (sx / n, sy / n);
    for c in samples.iter_mut() {
        c.x -= mx;
        c.y -= my;
    }
}

/// Samples a polygon's exterior ring.
#[derive(Debug, Clone, Copy)]
pub struct RingSampler {
    samples: usize,
    recenter: bool,
}

impl RingSampler {
    pub fn new(samples: usize) -> Self {
        Self {
            samples,
            recenter: false,
        }
    }

    /// Remove net drift by centring every day's samples on their mean.
    pub fn with_recenter(mut self, recenter: bool) -> Self {
        self.recenter = recenter;
        self
    }

    pub fn sample(&self, polygon: &Polygon<f64>) -> Vec<Coord<f64>> {
        let mut samples = sample_ring(polygon.exterior(), self.samples);
        if self.recenter {
            recenter(&mut samples);
        }
        samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, Rect};

    fn chord(a: &Coord<f64>, b: &Coord<f64>) -> f64 {
        (b.x - a.x).hypot(b.y - a.y)
    }

    #[test]
    fn test_square_samples_equally_spaced() {
        let square = Rect::new((0.0, 0.0), (1.0, 1.0)).to_polygon();
        let samples = RingSampler::new(40).sample(&square);
        assert_eq!(samples.len(), 40);
        for i in 0..samples.len() {
            let next = &samples[(i + 1) % samples.len()];
            let d = chord(&samples[i], next);
            assert!((d - 0.1).abs() < 1e-9, "gap {} between samples {} and {}", d, i, i + 1);
        }
    }

    #[test]
    fn test_vertex_layout_does_not_matter() {
        let plain = polygon![(x: 0.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 2.0), (x: 0.0, y: 2.0)];
        let dense = polygon![
            (x: 0.0, y: 0.0), (x: 0.3, y: 0.0), (x: 1.7, y: 0.0), (x: 2.0, y: 0.0),
            (x: 2.0, y: 1.1), (x: 2.0, y: 2.0), (x: 0.5, y: 2.0), (x: 0.0, y: 2.0),
        ];
        let a = sample_ring(plain.exterior(), 16);
        let b = sample_ring(dense.exterior(), 16);
        for (p, q) in a.iter().zip(b.iter()) {
            assert!(chord(p, q) < 1e-9, "{:?} vs {:?}", p, q);
        }
    }

    #[test]
    fn test_degenerate_ring_is_empty() {
        let point_like = polygon![(x: 1.0, y: 1.0), (x: 1.0, y: 1.0), (x: 1.0, y: 1.0)];
        assert!(RingSampler::new(10).sample(&point_like).is_empty());

        let nan = polygon![(x: 0.0, y: 0.0), (x: f64::NAN, y: 0.0), (x: 1.0, y: 1.0)];
        assert!(RingSampler::new(10).sample(&nan).is_empty());

        let empty: Polygon<f64> = Polygon::new(LineString::new(vec![]), vec![]);
        assert!(RingSampler::new(10).sample(&empty).is_empty());
    }

    #[test]
    fn test_recenter_removes_offset() {
        let square = Rect::new((10.0, 20.0), (12.0, 22.0)).to_polygon();
        let samples = RingSampler::new(8).with_recenter(true).sample(&square);
        let (sx, sy) = samples.iter().fold((0.0, 0.0), |(sx, sy), c| (sx + c.x, sy + c.y));
        assert!(sx.abs() < 1e-9 && sy.abs() < 1e-9);
    }

    #[test]
    fn test_ring_length() {
        let square = Rect::new((0.0, 0.0), (3.0, 1.0)).to_polygon();
        assert_eq!(ring_length(square.exterior()), 8.0);
    }
}

//! Test data generators for polygons, perimeter series and cube values.
//!
//! These generators create predictable, verifiable test data patterns
//! that can be used across the test suite.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use geo::{coord, Coord, LineString, Polygon, Rect};
use std::f64::consts::TAU;

/// Midnight UTC of a calendar day.
pub fn utc_date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

/// Calendar day.
pub fn naive_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// `count` consecutive daily timestamps starting at `start`, offset by `hour`.
pub fn daily_times(start: DateTime<Utc>, count: usize, hour: i64) -> Vec<DateTime<Utc>> {
    (0..count)
        .map(|i| start + Duration::days(i as i64) + Duration::hours(hour))
        .collect()
}

/// Axis-aligned square of side `side` centred on `(cx, cy)`.
pub fn square(cx: f64, cy: f64, side: f64) -> Polygon<f64> {
    let h = side / 2.0;
    Rect::new((cx - h, cy - h), (cx + h, cy + h)).to_polygon()
}

/// Regular `n`-gon with circumradius `radius`, first vertex at angle `rotation`.
pub fn regular_polygon(cx: f64, cy: f64, radius: f64, n: usize, rotation: f64) -> Polygon<f64> {
    let coords: Vec<Coord<f64>> = (0..n)
        .map(|i| {
            let a = rotation + TAU * i as f64 / n as f64;
            coord! { x: cx + radius * a.cos(), y: cy + radius * a.sin() }
        })
        .collect();
    Polygon::new(LineString::new(coords), vec![])
}

/// One circle-like polygon per day whose radius grows linearly.
///
/// Returns `(timestamp, polygon)` pairs; radius on day `d` is `r0 + rate * d`.
pub fn growing_circles(
    start: DateTime<Utc>,
    days: usize,
    center: (f64, f64),
    r0: f64,
    rate: f64,
    segments: usize,
) -> Vec<(DateTime<Utc>, Polygon<f64>)> {
    (0..days)
        .map(|d| {
            let r = r0 + rate * d as f64;
            (
                start + Duration::days(d as i64),
                regular_polygon(center.0, center.1, r, segments, 0.0),
            )
        })
        .collect()
}

/// Evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => (0..n)
            .map(|i| start + (end - start) * i as f64 / (n - 1) as f64)
            .collect(),
    }
}

/// Creates cube values with predictable contents.
///
/// Each value is `t * 1_000_000 + row * 1000 + col`, laid out time-major
/// then row-major, so a value identifies its own position.
pub fn create_test_cube_values(nt: usize, ny: usize, nx: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(nt * ny * nx);
    for t in 0..nt {
        for row in 0..ny {
            for col in 0..nx {
                data.push((t * 1_000_000 + row * 1000 + col) as f32);
            }
        }
    }
    data
}

/// Creates a cube that is `value` everywhere.
pub fn create_constant_cube_values(nt: usize, ny: usize, nx: usize, value: f32) -> Vec<f32> {
    vec![value; nt * ny * nx]
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Area;

    #[test]
    fn test_square_area() {
        assert!((square(3.0, -2.0, 4.0).unsigned_area() - 16.0).abs() < 1e-12);
    }

    #[test]
    fn test_regular_polygon_closes() {
        let hex = regular_polygon(0.0, 0.0, 1.0, 6, 0.0);
        assert_eq!(hex.exterior().0.len(), 7);
    }

    #[test]
    fn test_linspace() {
        assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(2.0, 9.0, 1), vec![2.0]);
    }

    #[test]
    fn test_cube_values_encode_position() {
        let data = create_test_cube_values(2, 3, 4);
        assert_eq!(data.len(), 24);
        assert_eq!(data[1 * 12 + 2 * 4 + 3], 1_002_003.0);
    }

    #[test]
    fn test_growing_circles() {
        let series = growing_circles(utc_date(2024, 8, 1), 3, (0.0, 0.0), 10.0, 5.0, 32);
        assert_eq!(series.len(), 3);
        assert!(series[2].1.unsigned_area() > series[0].1.unsigned_area());
        assert_eq!(series[1].0, utc_date(2024, 8, 2));
    }
}

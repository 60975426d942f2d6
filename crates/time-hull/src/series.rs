//! Cleaning raw per-day perimeter records into a time-ordered series.

use chrono::{DateTime, NaiveDate, Utc};
use geo::{Area, BooleanOps, Centroid, Geometry, MultiPolygon, Polygon};
use hull_common::{CrsCode, HullError, HullResult, TimeSpan};
use projection::{projection_for, LocalFrame};
use std::collections::BTreeMap;

/// One raw observation of a boundary.
#[derive(Debug, Clone)]
pub struct PolygonRecord {
    pub id: String,
    pub date: DateTime<Utc>,
    pub geometry: Geometry<f64>,
}

impl PolygonRecord {
    pub fn new(id: impl Into<String>, date: DateTime<Utc>, geometry: impl Into<Geometry<f64>>) -> Self {
        Self {
            id: id.into(),
            date,
            geometry: geometry.into(),
        }
    }
}

/// A single cleaned day.
#[derive(Debug, Clone)]
pub struct SeriesEntry {
    pub date: NaiveDate,
    pub geometry: MultiPolygon<f64>,
}

impl SeriesEntry {
    /// Largest part by area. Disjoint remnants are ignored downstream.
    pub fn largest_polygon(&self) -> Option<&Polygon<f64>> {
        self.geometry
            .0
            .iter()
            .max_by(|a, b| a.unsigned_area().total_cmp(&b.unsigned_area()))
    }

    /// Area of the whole day geometry in source CRS units.
    pub fn area(&self) -> f64 {
        self.geometry.unsigned_area()
    }
}

/// Strictly increasing, change-only sequence of daily perimeters.
#[derive(Debug, Clone)]
pub struct PolygonTimeSeries {
    id: String,
    crs: CrsCode,
    entries: Vec<SeriesEntry>,
    native_centroid: (f64, f64),
    centroid: (f64, f64),
    span: TimeSpan,
}

impl PolygonTimeSeries {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn crs(&self) -> CrsCode {
        self.crs
    }

    pub fn entries(&self) -> &[SeriesEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First and last observed day.
    pub fn span(&self) -> TimeSpan {
        self.span
    }

    /// Centroid of all observed area as (lon, lat) degrees.
    pub fn centroid(&self) -> (f64, f64) {
        self.centroid
    }

    /// Centroid in the series' own CRS.
    pub fn native_centroid(&self) -> (f64, f64) {
        self.native_centroid
    }

    /// Most recent perimeter observed on or before the day of `at`.
    pub fn latest_at(&self, at: &DateTime<Utc>) -> Option<&SeriesEntry> {
        let day = at.date_naive();
        let idx = self.entries.partition_point(|e| e.date <= day);
        idx.checked_sub(1).map(|i| &self.entries[i])
    }

    /// Equal-area metric frame centred on this series.
    pub fn local_frame(&self) -> HullResult<LocalFrame> {
        LocalFrame::centered_on(self.crs, self.native_centroid)
    }
}

/// Validates, sorts, merges and de-duplicates raw records.
#[derive(Debug, Clone)]
pub struct SequenceCleaner {
    /// Relative symmetric-difference area under which two days are equal.
    pub equality_tolerance: f64,
}

impl Default for SequenceCleaner {
    fn default() -> Self {
        Self {
            equality_tolerance: 1e-9,
        }
    }
}

impl SequenceCleaner {
    pub fn new(equality_tolerance: f64) -> Self {
        Self { equality_tolerance }
    }

    /// Build a clean series from the records of a single object.
    pub fn clean(&self, records: &[PolygonRecord], crs: CrsCode) -> HullResult<PolygonTimeSeries> {
        let first = records
            .first()
            .ok_or_else(|| HullError::input("no perimeter records supplied"))?;
        let id = first.id.clone();

        let mut by_day: BTreeMap<NaiveDate, Vec<Polygon<f64>>> = BTreeMap::new();
        for record in records {
            if record.id != id {
                return Err(HullError::input(format!(
                    "records mix series ids '{}' and '{}'",
                    id, record.id
                )));
            }
            let parts = areal_parts(&record.geometry);
            if parts.is_empty() {
                tracing::debug!(id = %id, date = %record.date, "Discarding record without usable area");
                continue;
            }
            by_day.entry(record.date.date_naive()).or_default().extend(parts);
        }

        let mut entries: Vec<SeriesEntry> = Vec::with_capacity(by_day.len());
        let mut unchanged = 0usize;
        for (date, parts) in by_day {
            let geometry = union_all(parts);
            if geometry.0.is_empty() {
                continue;
            }
            if let Some(prev) = entries.last() {
                if self.geometrically_equal(&prev.geometry, &geometry) {
                    unchanged += 1;
                    continue;
                }
            }
            entries.push(SeriesEntry { date, geometry });
        }

        let (start, end) = match (entries.first(), entries.last()) {
            (Some(f), Some(l)) => (f.date, l.date),
            _ => {
                return Err(HullError::input(format!(
                    "series '{}' has no usable geometries",
                    id
                )))
            }
        };

        let footprint = union_all(entries.iter().flat_map(|e| e.geometry.0.iter().cloned()).collect());
        let native_centroid = footprint
            .centroid()
            .map(|p| (p.x(), p.y()))
            .ok_or_else(|| HullError::input(format!("series '{}' has no centroid", id)))?;
        let centroid = projection_for(crs)
            .inverse(native_centroid.0, native_centroid.1)
            .ok_or_else(|| HullError::projection(format!("centroid {:?} has no geographic position in {}", native_centroid, crs)))?;

        tracing::debug!(
            id = %id,
            records = records.len(),
            days = entries.len(),
            unchanged,
            "Cleaned perimeter series"
        );

        Ok(PolygonTimeSeries {
            id,
            crs,
            entries,
            native_centroid,
            centroid,
            span: TimeSpan::new(start, end),
        })
    }

    fn geometrically_equal(&self, a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> bool {
        let scale = a.unsigned_area().max(b.unsigned_area());
        if scale <= 0.0 {
            return true;
        }
        a.xor(b).unsigned_area() <= self.equality_tolerance * scale
    }
}

/// Polygonal content of a geometry, dropping empty or non-finite parts.
fn areal_parts(geometry: &Geometry<f64>) -> Vec<Polygon<f64>> {
    let parts = match geometry {
        Geometry::Polygon(p) => vec![p.clone()],
        Geometry::MultiPolygon(mp) => mp.0.clone(),
        Geometry::Rect(r) => vec![r.to_polygon()],
        Geometry::Triangle(t) => vec![t.to_polygon()],
        Geometry::GeometryCollection(gc) => gc.0.iter().flat_map(areal_parts).collect(),
        _ => Vec::new(),
    };
    parts.into_iter().filter(is_usable).collect()
}

fn is_usable(polygon: &Polygon<f64>) -> bool {
    let ring = polygon.exterior();
    ring.0.len() >= 4
        && ring.0.iter().all(|c| c.x.is_finite() && c.y.is_finite())
        && polygon.unsigned_area() > 0.0
}

fn union_all(parts: Vec<Polygon<f64>>) -> MultiPolygon<f64> {
    let mut iter = parts.into_iter();
    let Some(first) = iter.next() else {
        return MultiPolygon::new(Vec::new());
    };
    let mut acc = MultiPolygon::new(vec![first]);
    for part in iter {
        acc = acc.union(&MultiPolygon::new(vec![part]));
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use geo::{line_string, point, polygon, Rect};

    fn square(half: f64) -> Polygon<f64> {
        Rect::new((-half, -half), (half, half)).to_polygon()
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 8, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_sorts_and_normalizes_days() {
        let records = vec![
            PolygonRecord::new("f1", at(3, 18), square(3.0)),
            PolygonRecord::new("f1", at(1, 6), square(1.0)),
            PolygonRecord::new("f1", at(2, 23), square(2.0)),
        ];
        let series = SequenceCleaner::default().clean(&records, CrsCode::Epsg5070).unwrap();
        let dates: Vec<u32> = series.entries().iter().map(|e| chrono::Datelike::day(&e.date)).collect();
        assert_eq!(dates, vec![1, 2, 3]);
        assert_eq!(series.span().to_string(), "2024-08-01..2024-08-03");
        assert_eq!(series.id(), "f1");
    }

    #[test]
    fn test_drops_unchanged_day() {
        let records = vec![
            PolygonRecord::new("f1", at(1, 0), square(1.0)),
            PolygonRecord::new("f1", at(2, 0), square(1.0)),
            PolygonRecord::new("f1", at(3, 0), square(2.0)),
        ];
        let series = SequenceCleaner::default().clean(&records, CrsCode::Epsg5070).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(chrono::Datelike::day(&series.entries()[1].date), 3);
    }

    #[test]
    fn test_same_day_parts_are_unioned() {
        let left = Rect::new((0.0, 0.0), (2.0, 1.0)).to_polygon();
        let right = Rect::new((1.0, 0.0), (3.0, 1.0)).to_polygon();
        let records = vec![
            PolygonRecord::new("f1", at(1, 2), left),
            PolygonRecord::new("f1", at(1, 20), right),
        ];
        let series = SequenceCleaner::default().clean(&records, CrsCode::Epsg5070).unwrap();
        assert_eq!(series.len(), 1);
        assert!((series.entries()[0].area() - 3.0).abs() < 1e-9);
        let (cx, cy) = series.native_centroid();
        assert!((cx - 1.5).abs() < 1e-9 && (cy - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_largest_polygon_selected() {
        let small = Rect::new((10.0, 10.0), (11.0, 11.0)).to_polygon();
        let entry = SeriesEntry {
            date: NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
            geometry: MultiPolygon::new(vec![small, square(2.0)]),
        };
        assert!((entry.largest_polygon().unwrap().unsigned_area() - 16.0).abs() < 1e-12);
    }

    #[test]
    fn test_no_usable_geometry_is_input_error() {
        let records = vec![
            PolygonRecord::new("f1", at(1, 0), point!(x: 1.0, y: 1.0)),
            PolygonRecord::new("f1", at(2, 0), line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0)]),
            PolygonRecord::new("f1", at(3, 0), polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 2.0, y: 0.0)]),
        ];
        let err = SequenceCleaner::default().clean(&records, CrsCode::Epsg5070).unwrap_err();
        assert_eq!(err.error_code(), "InputError");

        let err = SequenceCleaner::default().clean(&[], CrsCode::Epsg5070).unwrap_err();
        assert_eq!(err.error_code(), "InputError");
    }

    #[test]
    fn test_mixed_ids_rejected() {
        let records = vec![
            PolygonRecord::new("f1", at(1, 0), square(1.0)),
            PolygonRecord::new("f2", at(2, 0), square(2.0)),
        ];
        assert!(SequenceCleaner::default().clean(&records, CrsCode::Epsg5070).is_err());
    }

    #[test]
    fn test_latest_at_carries_forward() {
        let records = vec![
            PolygonRecord::new("f1", at(2, 0), square(1.0)),
            PolygonRecord::new("f1", at(5, 0), square(2.0)),
        ];
        let series = SequenceCleaner::default().clean(&records, CrsCode::Epsg5070).unwrap();
        assert!(series.latest_at(&at(1, 12)).is_none());
        assert_eq!(chrono::Datelike::day(&series.latest_at(&at(2, 0)).unwrap().date), 2);
        assert_eq!(chrono::Datelike::day(&series.latest_at(&at(4, 23)).unwrap().date), 2);
        assert_eq!(chrono::Datelike::day(&series.latest_at(&at(9, 0)).unwrap().date), 5);
    }

    #[test]
    fn test_geographic_centroid_for_albers_origin() {
        let records = vec![PolygonRecord::new("f1", at(1, 0), square(1.0))];
        let series = SequenceCleaner::default().clean(&records, CrsCode::Epsg5070).unwrap();
        let (lon, lat) = series.centroid();
        assert!((lon + 96.0).abs() < 1e-6 && (lat - 23.0).abs() < 1e-6);
    }
}

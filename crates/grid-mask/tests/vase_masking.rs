//! Vase masks over synthetic cubes and the hull round trip.

use geo::Polygon;
use grid_mask::{
    build_panels, DataArray, InMemorySlices, Interpolation, Keyframe, Mask, VaseDefinition, VaseMask,
};
use hull_common::CrsCode;
use std::sync::Arc;
use test_utils::{create_constant_cube_values, daily_times, linspace, regular_polygon, square, utc_date};
use time_hull::{
    derivative_hull, DerivativeOrder, HullConfig, PolygonRecord, RuledMeshBuilder, SequenceCleaner, TimeHull,
};

fn unit_cube(nt: usize) -> DataArray {
    let times = daily_times(utc_date(2023, 4, 1), nt, 0);
    let axis = linspace(0.5, 9.5, 10);
    let source = Arc::new(InMemorySlices::new(nt, 10, 10, create_constant_cube_values(nt, 10, 10, 1.0)).unwrap());
    DataArray::new("ndvi", ["time", "y", "x"], times, axis.clone(), axis, source)
        .unwrap()
        .with_projection(CrsCode::Epsg5070)
}

fn masks(vase: &VaseMask, cube: &DataArray) -> Vec<Mask> {
    vase.masks(cube).unwrap().map(|m| m.unwrap().1).collect()
}

#[test]
fn test_linear_between_identical_keyframes_is_constant() {
    let poly = square(5.0, 5.0, 4.0);
    let def = VaseDefinition::new(
        vec![
            Keyframe::new(utc_date(2023, 4, 2), poly.clone()),
            Keyframe::new(utc_date(2023, 4, 5), poly),
        ],
        Interpolation::Linear,
    )
    .unwrap();
    let all = masks(&VaseMask::new(def), &unit_cube(7));
    assert_eq!(all.len(), 7);
    assert_eq!(all[0].count(), 16);
    assert!(all.iter().all(|m| *m == all[0]));
}

#[test]
fn test_linear_growth_widens_mask() {
    let def = VaseDefinition::new(
        vec![
            Keyframe::new(utc_date(2023, 4, 1), square(5.0, 5.0, 2.0)),
            Keyframe::new(utc_date(2023, 4, 5), square(5.0, 5.0, 10.0)),
        ],
        Interpolation::Linear,
    )
    .unwrap();
    let counts: Vec<usize> = masks(&VaseMask::new(def), &unit_cube(6)).iter().map(Mask::count).collect();
    // Sides 2, 4, 6, 8, 10 then clamped at 10
    assert_eq!(counts, vec![4, 16, 36, 64, 100, 100]);
}

#[test]
fn test_vase_sample_reads_slice_by_slice() {
    let def = VaseDefinition::new(
        vec![Keyframe::new(utc_date(2023, 4, 1), square(5.0, 5.0, 2.0))],
        Interpolation::Nearest,
    )
    .unwrap()
    .with_crs(CrsCode::Epsg5070);
    let summary = VaseMask::new(def).sample(&unit_cube(3)).unwrap();
    assert_eq!(summary.inside.len(), 3 * 4);
    assert_eq!(summary.outside.len(), 3 * 96);
    assert_eq!(summary.daily_mean_inside.len(), 3);
}

#[test]
fn test_vase_outside_cube_is_empty_result() {
    let def = VaseDefinition::new(
        vec![Keyframe::new(utc_date(2023, 4, 1), square(500.0, 500.0, 2.0))],
        Interpolation::Nearest,
    )
    .unwrap();
    let err = VaseMask::new(def).sample(&unit_cube(2)).unwrap_err();
    assert_eq!(err.error_code(), "EmptyResultError");
}

fn growing_hull() -> TimeHull {
    let records: Vec<PolygonRecord> = (0..5)
        .map(|d| {
            let poly: Polygon<f64> = regular_polygon(0.0, 0.0, 1000.0 + 400.0 * d as f64, 32, 0.0);
            PolygonRecord::new("fire-12", utc_date(2023, 7, 10 + d), poly)
        })
        .collect();
    let series = SequenceCleaner::default().clean(&records, CrsCode::Epsg5070).unwrap();
    let config = HullConfig {
        n_theta: 16,
        n_ring_samples: 128,
        ..HullConfig::default()
    };
    RuledMeshBuilder::new(config).unwrap().build(&series).unwrap()
}

fn assert_same_hull(a: &TimeHull, b: &TimeHull) {
    assert_eq!(a.id, b.id);
    assert_eq!(a.kind, b.kind);
    assert_eq!(a.metrics_map(), b.metrics_map());
    assert_eq!(a.times, b.times);
    assert_eq!(a.times_norm, b.times_norm);
    assert_eq!(a.vertices, b.vertices);
    assert_eq!(a.triangles, b.triangles);
    assert_eq!(a.dates, b.dates);
    assert_eq!(a.day_areas_km2, b.day_areas_km2);
}

#[test]
fn test_hull_vase_round_trip() {
    let hull = growing_hull();
    let vase = VaseDefinition::from(&hull);
    assert_eq!(vase.keyframes().len(), 5);
    assert_eq!(vase.interpolation(), Interpolation::Linear);
    assert_eq!(vase.provenance().unwrap().id, "fire-12");

    let back = TimeHull::try_from(&vase).unwrap();
    assert_same_hull(&hull, &back);
}

#[test]
fn test_derivative_hull_round_trip() {
    let speed = derivative_hull(&growing_hull(), DerivativeOrder::Speed).unwrap();
    let back = TimeHull::try_from(&VaseDefinition::from(&speed)).unwrap();
    assert_same_hull(&speed, &back);
}

#[test]
fn test_panels_from_hull_vase() {
    let vase = VaseDefinition::from(&growing_hull());
    let panels = build_panels(&vase, 12).unwrap();
    assert_eq!(panels.len(), 4 * 12);
    let last = panels.last().unwrap();
    assert_eq!(last.corners[2][2], 4.0);
}

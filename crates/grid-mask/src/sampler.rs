//! Sampling a raster cube inside and outside a perimeter series.

use crate::config::MaskConfig;
use crate::crs_probe::resolve_crs;
use crate::cube::AsDataArray;
use crate::grid::Mask;
use crate::mask::PolygonGridMask;
use chrono::NaiveDate;
use hull_common::crs::CrsCode;
use hull_common::{HullError, HullResult};
use projection::reproject_polygon;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time_hull::PolygonTimeSeries;
use tracing::{debug, warn};

/// Cube values pooled inside and outside a boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HullClimateSummary {
    /// Every inside value across all sampled timesteps.
    pub inside: Vec<f32>,
    /// Every outside value across all sampled timesteps.
    pub outside: Vec<f32>,
    /// Mean inside value per perimeter date.
    pub daily_mean_inside: BTreeMap<NaiveDate, f64>,
}

impl HullClimateSummary {
    pub fn mean_inside(&self) -> Option<f64> {
        mean(&self.inside)
    }

    pub fn mean_outside(&self) -> Option<f64> {
        mean(&self.outside)
    }

    /// Inside mean minus outside mean.
    pub fn anomaly(&self) -> Option<f64> {
        Some(self.mean_inside()? - self.mean_outside()?)
    }
}

fn mean(values: &[f32]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64)
}

/// Accumulates masked slices into a summary.
#[derive(Debug, Default)]
pub(crate) struct SummaryBuilder {
    skip_non_finite: bool,
    summary: HullClimateSummary,
    daily: BTreeMap<NaiveDate, (f64, usize)>,
}

impl SummaryBuilder {
    pub(crate) fn new(skip_non_finite: bool) -> Self {
        Self {
            skip_non_finite,
            ..Default::default()
        }
    }

    /// Split one slice by the mask, crediting inside values to `date`.
    pub(crate) fn add(&mut self, date: NaiveDate, mask: &Mask, values: &[f32]) {
        let (mut sum, mut count) = (0.0, 0usize);
        for (&inside, &v) in mask.cells().iter().zip(values) {
            if self.skip_non_finite && !v.is_finite() {
                continue;
            }
            if inside {
                self.summary.inside.push(v);
                sum += v as f64;
                count += 1;
            } else {
                self.summary.outside.push(v);
            }
        }
        if count > 0 {
            let entry = self.daily.entry(date).or_insert((0.0, 0));
            entry.0 += sum;
            entry.1 += count;
        }
    }

    pub(crate) fn finish(self) -> HullResult<HullClimateSummary> {
        if self.summary.inside.is_empty() {
            return Err(HullError::empty_result("no cube cell fell inside the boundary"));
        }
        let mut summary = self.summary;
        summary.daily_mean_inside = self
            .daily
            .into_iter()
            .map(|(date, (sum, n))| (date, sum / n as f64))
            .collect();
        Ok(summary)
    }
}

/// Result of [`ClimateSampler::sample`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClimateSampling {
    pub summary: HullClimateSummary,
    /// CRS the cube was resolved to.
    pub crs: CrsCode,
    /// Timesteps that contributed to the summary.
    pub timesteps_used: usize,
    /// Eligible timesteps dropped because their perimeter was unusable.
    pub timesteps_skipped: usize,
}

/// Masks a cube with the perimeter current at each of its timesteps.
#[derive(Debug)]
pub struct ClimateSampler {
    mask: PolygonGridMask,
    config: MaskConfig,
}

impl ClimateSampler {
    pub fn new(config: MaskConfig) -> HullResult<Self> {
        config.validate().map_err(HullError::input)?;
        Ok(Self {
            mask: PolygonGridMask::from_config(&config),
            config,
        })
    }

    /// Use a custom masker.
    pub fn with_mask(mut self, mask: PolygonGridMask) -> Self {
        self.mask = mask;
        self
    }

    /// Sample every cube timestep that falls within the series window.
    ///
    /// The perimeter for a timestep is the latest series entry on or before
    /// it. A timestep whose perimeter cannot be reprojected or masked is
    /// skipped.
    pub fn sample<C>(&self, series: &PolygonTimeSeries, cube: &C) -> HullResult<ClimateSampling>
    where
        C: AsDataArray + ?Sized,
    {
        let array = cube.data_array()?;
        let crs = resolve_crs(array)?;
        let axes = array.axes();
        let span = series.span();

        let eligible: Vec<usize> = array
            .times()
            .iter()
            .enumerate()
            .filter(|(_, t)| span.contains(t))
            .map(|(i, _)| i)
            .collect();
        if eligible.is_empty() {
            return Err(HullError::no_overlap(span.to_string(), array.time_window()));
        }

        debug!(
            series = %series.id(),
            cube = %array.name(),
            crs = %crs,
            timesteps = eligible.len(),
            strategy = self.mask.strategy_name(),
            "Sampling cube"
        );

        let mut builder = SummaryBuilder::new(self.config.skip_non_finite);
        let mut used = 0;
        let mut skipped = 0;

        for t in eligible {
            let time = array.times()[t];
            let Some(entry) = series.latest_at(&time) else {
                skipped += 1;
                continue;
            };
            let mask = match entry
                .largest_polygon()
                .ok_or_else(|| HullError::input("perimeter has no polygon"))
                .and_then(|p| reproject_polygon(p, series.crs(), crs))
                .and_then(|p| self.mask.mask(&p, &axes))
            {
                Ok(mask) => mask,
                Err(e) => {
                    warn!(time = %time, date = %entry.date, error = %e, "Skipping timestep");
                    skipped += 1;
                    continue;
                }
            };
            let values = array.slice(t)?;
            builder.add(entry.date, &mask, &values);
            used += 1;
        }

        let summary = builder.finish()?;
        Ok(ClimateSampling {
            summary,
            crs,
            timesteps_used: used,
            timesteps_skipped: skipped,
        })
    }
}

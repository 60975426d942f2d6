//! Streaming masks of a vase over a cube's time axis.

use super::definition::VaseDefinition;
use super::panel::{build_panels, VasePanel};
use crate::config::MaskConfig;
use crate::crs_probe::resolve_crs;
use crate::cube::{AsDataArray, DataArray};
use crate::grid::{GridAxes, Mask};
use crate::mask::centres_inside;
use crate::sampler::{HullClimateSummary, SummaryBuilder};
use chrono::{DateTime, Utc};
use hull_common::crs::CrsCode;
use hull_common::HullResult;
use projection::reproject_polygon;
use tracing::debug;

/// Cell-centre masks of a [`VaseDefinition`], one time slice at a time.
#[derive(Debug, Clone)]
pub struct VaseMask {
    definition: VaseDefinition,
    skip_non_finite: bool,
    panel_steps: usize,
}

impl VaseMask {
    pub fn new(definition: VaseDefinition) -> Self {
        Self::with_config(definition, &MaskConfig::default())
    }

    pub fn with_config(definition: VaseDefinition, config: &MaskConfig) -> Self {
        Self {
            definition,
            skip_non_finite: config.skip_non_finite,
            panel_steps: config.panel_steps,
        }
    }

    pub fn definition(&self) -> &VaseDefinition {
        &self.definition
    }

    /// Display panels at the configured angular resolution.
    pub fn panels(&self) -> HullResult<Vec<VasePanel>> {
        build_panels(&self.definition, self.panel_steps)
    }

    /// Mask at one instant, with the polygon already in the grid's CRS.
    pub fn mask_at(&self, t: &DateTime<Utc>, axes: &GridAxes) -> Mask {
        centres_inside(&self.definition.polygon_at(t), axes)
    }

    /// Lazily yield `(time, mask)` for every cube timestep.
    ///
    /// Cube values are never touched; only the time and spatial labels.
    pub fn masks<'a, C>(&'a self, cube: &'a C) -> HullResult<VaseMasks<'a>>
    where
        C: AsDataArray + ?Sized,
    {
        let array = cube.data_array()?;
        let transform = match self.definition.crs() {
            Some(from) => {
                let to = resolve_crs(array)?;
                (from != to).then_some((from, to))
            }
            None => None,
        };
        debug!(
            cube = %array.name(),
            keyframes = self.definition.keyframes().len(),
            timesteps = array.times().len(),
            "Streaming vase masks"
        );
        Ok(VaseMasks {
            vase: self,
            array,
            axes: array.axes(),
            transform,
            next: 0,
        })
    }

    /// Pool cube values inside and outside the vase, reading one slice at a time.
    pub fn sample<C>(&self, cube: &C) -> HullResult<HullClimateSummary>
    where
        C: AsDataArray + ?Sized,
    {
        let masks = self.masks(cube)?;
        let array = masks.array;
        let mut builder = SummaryBuilder::new(self.skip_non_finite);
        for (t, item) in masks.enumerate() {
            let (time, mask) = item?;
            let values = array.slice(t)?;
            builder.add(time.date_naive(), &mask, &values);
        }
        builder.finish()
    }
}

/// Iterator returned by [`VaseMask::masks`].
pub struct VaseMasks<'a> {
    vase: &'a VaseMask,
    array: &'a DataArray,
    axes: GridAxes,
    transform: Option<(CrsCode, CrsCode)>,
    next: usize,
}

impl Iterator for VaseMasks<'_> {
    type Item = HullResult<(DateTime<Utc>, Mask)>;

    fn next(&mut self) -> Option<Self::Item> {
        let time = *self.array.times().get(self.next)?;
        self.next += 1;

        let polygon = self.vase.definition.polygon_at(&time);
        let mask = match self.transform {
            Some((from, to)) => match reproject_polygon(&polygon, from, to) {
                Ok(p) => centres_inside(&p, &self.axes),
                Err(e) => return Some(Err(e)),
            },
            None => centres_inside(&polygon, &self.axes),
        };
        Some(Ok((time, mask)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.array.times().len().saturating_sub(self.next);
        (left, Some(left))
    }
}

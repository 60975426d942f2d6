//! Labeled (time, y, x) data cubes and the capability to view one.
//!
//! A [`DataArray`] carries axis labels and metadata eagerly but reads values
//! lazily, one time slice at a time, through a [`SliceSource`]. Anything that
//! can present itself as a data array implements [`AsDataArray`].

use crate::grid::GridAxes;
use chrono::{DateTime, Utc};
use hull_common::crs::CrsCode;
use hull_common::{HullError, HullResult};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Names accepted for the leading time dimension.
const TIME_DIMS: [&str; 3] = ["time", "t", "valid_time"];

/// Spatial dimension pairs accepted after the time dimension.
const SPATIAL_DIMS: [(&str, &str); 3] = [("y", "x"), ("lat", "lon"), ("latitude", "longitude")];

/// Scalar metadata value (attribute or scalar coordinate).
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl AttrValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttrValue::Int(v) => Some(*v),
            AttrValue::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Float(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Text(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::Text(v)
    }
}

/// Lazy access to the values of a (time, y, x) cube.
pub trait SliceSource: Send + Sync {
    /// `(nt, ny, nx)`.
    fn shape(&self) -> (usize, usize, usize);

    /// Row-major `ny * nx` values of time slice `t`.
    fn read_slice(&self, t: usize) -> HullResult<Vec<f32>>;
}

/// A fully materialized cube.
#[derive(Debug, Clone)]
pub struct InMemorySlices {
    nt: usize,
    ny: usize,
    nx: usize,
    data: Vec<f32>,
}

impl InMemorySlices {
    pub fn new(nt: usize, ny: usize, nx: usize, data: Vec<f32>) -> HullResult<Self> {
        if data.len() != nt * ny * nx {
            return Err(HullError::input(format!(
                "cube data has {} values, expected {}x{}x{}",
                data.len(),
                nt,
                ny,
                nx
            )));
        }
        Ok(Self { nt, ny, nx, data })
    }
}

impl SliceSource for InMemorySlices {
    fn shape(&self) -> (usize, usize, usize) {
        (self.nt, self.ny, self.nx)
    }

    fn read_slice(&self, t: usize) -> HullResult<Vec<f32>> {
        if t >= self.nt {
            return Err(HullError::input(format!("time index {} out of range 0..{}", t, self.nt)));
        }
        let len = self.ny * self.nx;
        Ok(self.data[t * len..(t + 1) * len].to_vec())
    }
}

/// A labeled 3-D array over (time, y, x) or (time, lat, lon).
#[derive(Clone)]
pub struct DataArray {
    name: String,
    dims: [String; 3],
    times: Vec<DateTime<Utc>>,
    y: Vec<f64>,
    x: Vec<f64>,
    attrs: BTreeMap<String, AttrValue>,
    coords: BTreeMap<String, AttrValue>,
    projection: Option<CrsCode>,
    values: Arc<dyn SliceSource>,
}

impl fmt::Debug for DataArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataArray")
            .field("name", &self.name)
            .field("dims", &self.dims)
            .field("shape", &self.shape())
            .field("attrs", &self.attrs)
            .field("coords", &self.coords)
            .field("projection", &self.projection)
            .finish()
    }
}

impl DataArray {
    /// Build a data array, checking dimension names and label lengths
    /// against the value source.
    pub fn new(
        name: impl Into<String>,
        dims: [&str; 3],
        times: Vec<DateTime<Utc>>,
        y: Vec<f64>,
        x: Vec<f64>,
        values: Arc<dyn SliceSource>,
    ) -> HullResult<Self> {
        let name = name.into();
        let [t_dim, y_dim, x_dim] = dims;

        if !TIME_DIMS.contains(&t_dim) {
            return Err(HullError::input(format!(
                "{}: leading dimension must be time, found '{}'",
                name, t_dim
            )));
        }
        if !SPATIAL_DIMS.contains(&(y_dim, x_dim)) {
            return Err(HullError::input(format!(
                "{}: cannot resolve spatial dimensions ({}, {})",
                name, y_dim, x_dim
            )));
        }

        let (nt, ny, nx) = values.shape();
        if (times.len(), y.len(), x.len()) != (nt, ny, nx) {
            return Err(HullError::input(format!(
                "{}: labels {}x{}x{} do not match values {}x{}x{}",
                name,
                times.len(),
                y.len(),
                x.len(),
                nt,
                ny,
                nx
            )));
        }

        Ok(Self {
            name,
            dims: [t_dim.to_string(), y_dim.to_string(), x_dim.to_string()],
            times,
            y,
            x,
            attrs: BTreeMap::new(),
            coords: BTreeMap::new(),
            projection: None,
            values,
        })
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Attach a scalar (0-d) coordinate.
    pub fn with_coord(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.coords.insert(key.into(), value.into());
        self
    }

    /// Declare the CRS through the projection accessor.
    pub fn with_projection(mut self, crs: CrsCode) -> Self {
        self.projection = Some(crs);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dims(&self) -> &[String; 3] {
        &self.dims
    }

    pub fn times(&self) -> &[DateTime<Utc>] {
        &self.times
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn attrs(&self) -> &BTreeMap<String, AttrValue> {
        &self.attrs
    }

    pub fn coords(&self) -> &BTreeMap<String, AttrValue> {
        &self.coords
    }

    pub fn projection(&self) -> Option<CrsCode> {
        self.projection
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        (self.times.len(), self.y.len(), self.x.len())
    }

    pub fn axes(&self) -> GridAxes {
        GridAxes::new(self.x.clone(), self.y.clone())
    }

    /// Read one time slice.
    pub fn slice(&self, t: usize) -> HullResult<Vec<f32>> {
        let values = self.values.read_slice(t)?;
        let expected = self.y.len() * self.x.len();
        if values.len() != expected {
            return Err(HullError::input(format!(
                "{}: slice {} has {} values, expected {}",
                self.name,
                t,
                values.len(),
                expected
            )));
        }
        Ok(values)
    }

    /// Display form of the time window, `"empty"` without timesteps.
    pub fn time_window(&self) -> String {
        match (self.times.first(), self.times.last()) {
            (Some(first), Some(last)) => format!("{}..{}", first.date_naive(), last.date_naive()),
            _ => "empty".to_string(),
        }
    }
}

/// A named collection of data arrays.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    variables: BTreeMap<String, DataArray>,
    default_variable: Option<String>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variable(mut self, array: DataArray) -> Self {
        self.variables.insert(array.name().to_string(), array);
        self
    }

    /// Name the variable that [`AsDataArray`] resolves to.
    pub fn with_default_variable(mut self, name: impl Into<String>) -> Self {
        self.default_variable = Some(name.into());
        self
    }

    pub fn variable(&self, name: &str) -> Option<&DataArray> {
        self.variables.get(name)
    }

    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }
}

/// Capability: present a value as a single labeled data array.
pub trait AsDataArray {
    fn data_array(&self) -> HullResult<&DataArray>;
}

impl AsDataArray for DataArray {
    fn data_array(&self) -> HullResult<&DataArray> {
        Ok(self)
    }
}

impl AsDataArray for Dataset {
    /// The default variable when named, otherwise the only variable.
    fn data_array(&self) -> HullResult<&DataArray> {
        if let Some(name) = &self.default_variable {
            return self
                .variables
                .get(name)
                .ok_or_else(|| HullError::input(format!("dataset has no variable '{}'", name)));
        }
        let mut iter = self.variables.values();
        match (iter.next(), iter.next()) {
            (Some(only), None) => Ok(only),
            (None, _) => Err(HullError::input("dataset has no variables")),
            (Some(_), Some(_)) => Err(HullError::input(format!(
                "dataset has {} variables and no default",
                self.variables.len()
            ))),
        }
    }
}

impl<T: AsDataArray + ?Sized> AsDataArray for &T {
    fn data_array(&self) -> HullResult<&DataArray> {
        (**self).data_array()
    }
}

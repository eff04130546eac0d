//! Labelled time-frequency features.
//!
//! Purpose
//! - `Feature` holds one annotated region as index-aligned `time`/`frequency`
//!   vectors and derives everything else on demand: CCW coordinates,
//!   closure, geometry type, extent, and the TFCat record.
//!
//! Conventions
//! - Numeric time is Unix seconds; calendar conversion of computed values goes
//!   through the injected `Crs`.
//! - `coordinates()` is recomputed on every call and always CCW.
//! - `crop` returns a new feature; nothing here mutates in place.
//! - A closed vertex list (first == last) exports as `Polygon`, anything else
//!   as a single-component `MultiLineString`.

mod bbox;

pub use bbox::TimeFrequencyBox;

use std::fmt;

use nalgebra::Vector2;
use serde_json::Value;

use crate::calendar::{CalendarTime, TimeError};
use crate::crs::{Crs, CrsError};
use crate::geom2::{is_closed, open_ring, ClipEngine, PlanarGeometry};
use crate::tfcat::{FeatureProperties, Geometry, GeometryKind, Position, TfcatFeature};

/// Fewest coordinates of a schema-valid closed ring.
const MIN_POLYGON_COORDS: usize = 4;
/// Fewest coordinates of a schema-valid line.
const MIN_LINE_COORDS: usize = 2;
/// Fewest distinct vertexes that enclose an area.
const MIN_RING_VERTEXES: usize = 3;

#[derive(Debug)]
pub enum FeatureError {
    /// Vertex list unusable for the requested geometry.
    InvalidGeometry(String),
    InvalidBox(String),
    /// Cropping left no area.
    CropResultEmpty { id: u64 },
    /// Schema geometry this crate does not model (holes, multi-part).
    UnsupportedGeometry(String),
    Crs(CrsError),
    Serialize(serde_json::Error),
}

impl fmt::Display for FeatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureError::InvalidGeometry(r) => write!(f, "invalid feature geometry: {r}"),
            FeatureError::InvalidBox(r) => write!(f, "invalid bounding box: {r}"),
            FeatureError::CropResultEmpty { id } => {
                write!(f, "feature {id} does not intersect the bounding box")
            }
            FeatureError::UnsupportedGeometry(r) => write!(f, "unsupported geometry: {r}"),
            FeatureError::Crs(e) => write!(f, "{e}"),
            FeatureError::Serialize(e) => write!(f, "cannot serialize feature: {e}"),
        }
    }
}

impl std::error::Error for FeatureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FeatureError::Crs(e) => Some(e),
            FeatureError::Serialize(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CrsError> for FeatureError {
    fn from(value: CrsError) -> Self {
        FeatureError::Crs(value)
    }
}

impl From<TimeError> for FeatureError {
    fn from(value: TimeError) -> Self {
        FeatureError::Crs(CrsError::Time(value))
    }
}

/// A named region on the time-frequency plane, described by its vertexes.
///
/// Invariants: `time.len() == freq.len() >= 1`; every frequency is finite.
#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
    name: String,
    id: u64,
    time: Vec<CalendarTime>,
    freq: Vec<f64>,
}

impl Feature {
    /// Build from `(time, frequency)` pairs, keeping their order.
    pub fn new(
        name: impl Into<String>,
        vertexes: &[(CalendarTime, f64)],
        feature_id: u64,
    ) -> Result<Self, FeatureError> {
        let (time, freq) = vertexes.iter().copied().unzip();
        Self::from_arrays(name, time, freq, feature_id)
    }

    /// Build from parallel arrays.
    pub fn from_arrays(
        name: impl Into<String>,
        time: Vec<CalendarTime>,
        freq: Vec<f64>,
        feature_id: u64,
    ) -> Result<Self, FeatureError> {
        if time.is_empty() {
            return Err(FeatureError::InvalidGeometry(
                "a feature needs at least one vertex".to_string(),
            ));
        }
        if time.len() != freq.len() {
            return Err(FeatureError::InvalidGeometry(format!(
                "{} times but {} frequencies",
                time.len(),
                freq.len()
            )));
        }
        if let Some(k) = freq.iter().position(|f| !f.is_finite()) {
            return Err(FeatureError::InvalidGeometry(format!(
                "frequency at vertex {k} is {}",
                freq[k]
            )));
        }
        Ok(Self {
            name: name.into(),
            id: feature_id,
            time,
            freq,
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }
    #[inline]
    pub fn len(&self) -> usize {
        self.time.len()
    }
    /// Always false for a constructed feature.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// `(time, frequency)` pairs in stored order.
    pub fn vertexes(&self) -> Vec<(CalendarTime, f64)> {
        self.time.iter().copied().zip(self.freq.iter().copied()).collect()
    }

    /// `(unix_seconds, frequency)` pairs in stored order.
    pub fn vertexes_numeric(&self) -> Vec<(f64, f64)> {
        self.time
            .iter()
            .zip(&self.freq)
            .map(|(t, &f)| (t.unix_seconds(), f))
            .collect()
    }

    /// The parallel `(time, frequency)` arrays.
    #[inline]
    pub fn arrays(&self) -> (&[CalendarTime], &[f64]) {
        (&self.time, &self.freq)
    }

    /// Numeric vertexes in CCW order (reversed if stored clockwise).
    pub fn coordinates(&self) -> Vec<Vector2<f64>> {
        self.coordinates_with(&ClipEngine::default())
    }

    fn coordinates_with<G: PlanarGeometry>(&self, engine: &G) -> Vec<Vector2<f64>> {
        let mut coords: Vec<Vector2<f64>> = self
            .vertexes_numeric()
            .into_iter()
            .map(|(t, f)| Vector2::new(t, f))
            .collect();
        if !engine.is_counter_clockwise(&coords) {
            coords.reverse();
        }
        coords
    }

    /// First coordinate equals the last.
    #[inline]
    pub fn is_closed(&self) -> bool {
        is_closed(&self.coordinates())
    }

    #[inline]
    pub fn geometry_kind(&self) -> GeometryKind {
        if self.is_closed() {
            GeometryKind::Polygon
        } else {
            GeometryKind::MultiLineString
        }
    }

    /// Earliest and latest vertex times.
    fn time_bounds(&self) -> (CalendarTime, CalendarTime) {
        let first = self.time[0];
        self.time
            .iter()
            .fold((first, first), |(lo, hi), &t| (lo.min(t), hi.max(t)))
    }

    fn freq_bounds(&self) -> (f64, f64) {
        self.freq
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &f| {
                (lo.min(f), hi.max(f))
            })
    }

    /// Bounding extent of the current vertexes.
    pub fn extent(&self) -> TimeFrequencyBox {
        let (t0, t1) = self.time_bounds();
        let (f0, f1) = self.freq_bounds();
        TimeFrequencyBox {
            time_min: t0,
            freq_min: f0,
            time_max: t1,
            freq_max: f1,
        }
    }

    /// `"<name>, <min time>, <max time>, <min frequency>, <max frequency>"`.
    pub fn to_text_summary(&self) -> String {
        let (t0, t1) = self.time_bounds();
        let (f0, f1) = self.freq_bounds();
        format!("{}, {t0}, {t1}, {f0}, {f1}", self.name)
    }

    /// Whether the earliest or the latest vertex time lies in
    /// `[time_start, time_end]`.
    ///
    /// A feature spanning past both ends of the range is not reported.
    pub fn is_in_time_range(&self, time_start: CalendarTime, time_end: CalendarTime) -> bool {
        let (t0, t1) = self.time_bounds();
        (time_start <= t0 && t0 <= time_end) || (time_start <= t1 && t1 <= time_end)
    }

    /// Intersection of this feature's ring with `bbox`, as a new closed feature.
    ///
    /// Open vertex lists are read as rings (implicitly closed). Fails with
    /// `CropResultEmpty` when nothing with area remains.
    pub fn crop(&self, bbox: &TimeFrequencyBox, crs: &Crs) -> Result<Feature, FeatureError> {
        self.crop_with(bbox, crs, &ClipEngine::default())
    }

    pub fn crop_with<G: PlanarGeometry>(
        &self,
        bbox: &TimeFrequencyBox,
        crs: &Crs,
        engine: &G,
    ) -> Result<Feature, FeatureError> {
        let coords = self.coordinates_with(engine);
        if open_ring(&coords).len() < MIN_RING_VERTEXES {
            return Err(FeatureError::InvalidGeometry(format!(
                "cropping needs at least {MIN_RING_VERTEXES} vertexes, feature {} has {}",
                self.id,
                open_ring(&coords).len()
            )));
        }
        let ring = engine
            .intersect_with_axis_aligned_box(&coords, &bbox.to_rect())
            .ok_or(FeatureError::CropResultEmpty { id: self.id })?;
        let secs: Vec<f64> = ring.iter().map(|p| p.x).collect();
        let freq: Vec<f64> = ring.iter().map(|p| p.y).collect();
        let time = crs.to_calendar_time(&secs)?;
        tracing::debug!(
            id = self.id,
            before = coords.len(),
            after = ring.len(),
            "feature_cropped"
        );
        Feature::from_arrays(self.name.clone(), time, freq, self.id)
    }

    /// TFCat record, cropped to `bbox` first when one is given.
    ///
    /// Times are emitted as Unix seconds. `self` is left unchanged.
    pub fn to_schema_feature(
        &self,
        bbox: Option<&TimeFrequencyBox>,
        crs: &Crs,
    ) -> Result<TfcatFeature, FeatureError> {
        let cropped;
        let source = match bbox {
            Some(b) => {
                cropped = self.crop(b, crs)?;
                &cropped
            }
            None => self,
        };
        let coords = source.coordinates();
        let positions: Vec<Position> = coords.iter().map(|p| [p.x, p.y]).collect();
        let geometry = if is_closed(&coords) {
            if positions.len() < MIN_POLYGON_COORDS {
                return Err(FeatureError::InvalidGeometry(format!(
                    "closed ring of feature {} has {} coordinates, need {MIN_POLYGON_COORDS}",
                    source.id,
                    positions.len()
                )));
            }
            Geometry::Polygon(vec![positions])
        } else {
            if positions.len() < MIN_LINE_COORDS {
                return Err(FeatureError::InvalidGeometry(format!(
                    "line of feature {} has {} coordinate(s), need {MIN_LINE_COORDS}",
                    source.id,
                    positions.len()
                )));
            }
            Geometry::MultiLineString(vec![positions])
        };
        Ok(TfcatFeature {
            id: source.id,
            geometry,
            properties: FeatureProperties::new(source.name.clone()),
        })
    }

    /// `to_schema_feature` as a JSON object.
    pub fn to_schema_dict(
        &self,
        bbox: Option<&TimeFrequencyBox>,
        crs: &Crs,
    ) -> Result<Value, FeatureError> {
        serde_json::to_value(self.to_schema_feature(bbox, crs)?).map_err(FeatureError::Serialize)
    }

    /// Rebuild a feature from its TFCat record.
    pub fn from_schema_feature(record: &TfcatFeature, crs: &Crs) -> Result<Feature, FeatureError> {
        let parts = record.geometry.parts();
        let [part] = parts else {
            return Err(FeatureError::UnsupportedGeometry(format!(
                "feature {} has {} {:?} components, expected exactly one",
                record.id,
                parts.len(),
                record.geometry.kind()
            )));
        };
        let secs: Vec<f64> = part.iter().map(|p| p[0]).collect();
        let freq: Vec<f64> = part.iter().map(|p| p[1]).collect();
        let time = crs.to_calendar_time(&secs)?;
        Feature::from_arrays(
            record.properties.feature_type.clone(),
            time,
            freq,
            record.id,
        )
    }
}

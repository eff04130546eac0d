//! Coordinate reference system for the time-frequency plane.
//!
//! The numeric time axis is Unix seconds. `Crs` holds the TFCat CRS document
//! that declares this axis and converts numeric results back to calendar time.
//! It is built once and then only read, so callers pass `&Crs` around.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::calendar::{CalendarTime, TimeError};

/// Schema-defining CRS shipped with the crate.
const DEFAULT_CRS_JSON: &str = include_str!("crs.json");

/// The only time axis the geometry engine works on.
pub const UNIX_TIME_COORDS_ID: &str = "unix";

#[derive(Debug)]
pub enum CrsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    /// The document declares a time axis other than Unix seconds.
    UnsupportedTimeCoords(String),
    Time(TimeError),
}

impl fmt::Display for CrsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrsError::Io(e) => write!(f, "cannot read CRS document: {e}"),
            CrsError::Parse(e) => write!(f, "invalid CRS document: {e}"),
            CrsError::UnsupportedTimeCoords(id) => write!(
                f,
                "time_coords_id {id:?} is not supported (expected {UNIX_TIME_COORDS_ID:?})"
            ),
            CrsError::Time(e) => write!(f, "time conversion failed: {e}"),
        }
    }
}

impl std::error::Error for CrsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CrsError::Io(e) => Some(e),
            CrsError::Parse(e) => Some(e),
            CrsError::Time(e) => Some(e),
            CrsError::UnsupportedTimeCoords(_) => None,
        }
    }
}

impl From<TimeError> for CrsError {
    fn from(value: TimeError) -> Self {
        CrsError::Time(value)
    }
}

/// Spectral axis declaration, e.g. `{"type": "frequency", "unit": "kHz"}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpectralCoords {
    #[serde(rename = "type")]
    pub kind: String,
    pub unit: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrsProperties {
    pub name: String,
    pub time_coords_id: String,
    pub spectral_coords: SpectralCoords,
    pub ref_position_id: String,
}

/// TFCat `crs` member, serialized verbatim into exported collections.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrsDocument {
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: CrsProperties,
}

/// Read-only mapping between Unix seconds and calendar time.
#[derive(Clone, Debug, PartialEq)]
pub struct Crs {
    doc: CrsDocument,
}

impl Crs {
    /// CRS from the embedded `crs.json`.
    pub fn tfcat_default() -> Result<Self, CrsError> {
        Self::from_json_str(DEFAULT_CRS_JSON)
    }

    pub fn from_json_str(text: &str) -> Result<Self, CrsError> {
        let doc: CrsDocument = serde_json::from_str(text).map_err(CrsError::Parse)?;
        Self::from_document(doc)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CrsError> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(CrsError::Io)?;
        Self::from_json_str(&text)
    }

    pub fn from_document(doc: CrsDocument) -> Result<Self, CrsError> {
        if doc.properties.time_coords_id != UNIX_TIME_COORDS_ID {
            return Err(CrsError::UnsupportedTimeCoords(
                doc.properties.time_coords_id.clone(),
            ));
        }
        tracing::debug!(
            name = %doc.properties.name,
            spectral_unit = %doc.properties.spectral_coords.unit,
            "crs_loaded"
        );
        Ok(Self { doc })
    }

    #[inline]
    pub fn document(&self) -> &CrsDocument {
        &self.doc
    }

    /// Numeric seconds to calendar timestamps, index-aligned with the input.
    pub fn to_calendar_time(&self, seconds: &[f64]) -> Result<Vec<CalendarTime>, CrsError> {
        seconds
            .iter()
            .map(|&s| CalendarTime::from_unix_seconds(s).map_err(CrsError::from))
            .collect()
    }

    /// Calendar timestamps to numeric seconds.
    pub fn to_numeric(&self, times: &[CalendarTime]) -> Vec<f64> {
        times.iter().map(CalendarTime::unix_seconds).collect()
    }
}

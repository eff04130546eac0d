//! TFCat interchange types (GeoJSON layout with time/frequency coordinates).
//!
//! Coordinates are `[unix_seconds, frequency]` pairs. Serialization is plain
//! serde; schema validation against the published JSON Schema happens outside
//! this crate.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::crs::CrsDocument;

/// `[time, frequency]`.
pub type Position = [f64; 2];

/// Geometry member of a TFCat feature.
///
/// Both variants wrap a list of point lists: one ring for `Polygon` (closed,
/// CCW), one open chain for `MultiLineString`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Polygon(Vec<Vec<Position>>),
    MultiLineString(Vec<Vec<Position>>),
}

impl Geometry {
    #[inline]
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Polygon(_) => GeometryKind::Polygon,
            Geometry::MultiLineString(_) => GeometryKind::MultiLineString,
        }
    }

    #[inline]
    pub fn parts(&self) -> &[Vec<Position>] {
        match self {
            Geometry::Polygon(p) | Geometry::MultiLineString(p) => p,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeometryKind {
    Polygon,
    MultiLineString,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    pub feature_type: String,
    /// Any other properties present on import, kept for re-export.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FeatureProperties {
    pub fn new(feature_type: impl Into<String>) -> Self {
        Self {
            feature_type: feature_type.into(),
            extra: Map::new(),
        }
    }
}

/// `{"type": "Feature", "id": …, "geometry": …, "properties": …}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct TfcatFeature {
    pub id: u64,
    pub geometry: Geometry,
    pub properties: FeatureProperties,
}

/// Description of one feature property in a collection's `fields` map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub info: String,
    pub datatype: String,
    pub ucd: String,
}

/// `fields` entry describing `feature_type`.
pub fn feature_type_field() -> (String, FieldDef) {
    (
        "feature_type".to_string(),
        FieldDef {
            info: "Feature Type".to_string(),
            datatype: "str".to_string(),
            ucd: "meta.id".to_string(),
        },
    )
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    pub features: Vec<TfcatFeature>,
    pub crs: CrsDocument,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, FieldDef>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub properties: Map<String, Value>,
}

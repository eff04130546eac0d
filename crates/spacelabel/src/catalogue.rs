//! A catalogue of labelled features sharing one CRS.
//!
//! Owns the features, hands out ids, and maps the whole set to and from a
//! TFCat `FeatureCollection`.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Map;

use crate::calendar::CalendarTime;
use crate::crs::{Crs, CrsError};
use crate::feature::{Feature, FeatureError, TimeFrequencyBox};
use crate::tfcat::{feature_type_field, FeatureCollection};

#[derive(Debug)]
pub enum CatalogueError {
    Feature { id: u64, source: FeatureError },
    UnknownFeature(u64),
    DuplicateId(u64),
    Json(serde_json::Error),
    Crs(CrsError),
}

impl fmt::Display for CatalogueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogueError::Feature { id, source } => write!(f, "feature {id}: {source}"),
            CatalogueError::UnknownFeature(id) => write!(f, "no feature with id {id}"),
            CatalogueError::DuplicateId(id) => write!(f, "feature id {id} is already in use"),
            CatalogueError::Json(e) => write!(f, "catalogue JSON: {e}"),
            CatalogueError::Crs(e) => write!(f, "catalogue CRS: {e}"),
        }
    }
}

impl std::error::Error for CatalogueError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogueError::Feature { source, .. } => Some(source),
            CatalogueError::Json(e) => Some(e),
            CatalogueError::Crs(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Catalogue {
    crs: Crs,
    features: Vec<Feature>,
    next_id: u64,
}

impl Catalogue {
    pub fn new(crs: Crs) -> Self {
        Self {
            crs,
            features: Vec::new(),
            next_id: 0,
        }
    }

    #[inline]
    pub fn crs(&self) -> &Crs {
        &self.crs
    }
    #[inline]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }
    #[inline]
    pub fn len(&self) -> usize {
        self.features.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Build a feature under the next free id and store it.
    pub fn add_feature(
        &mut self,
        name: impl Into<String>,
        vertexes: &[(CalendarTime, f64)],
    ) -> Result<u64, CatalogueError> {
        let id = self.next_id;
        let feature =
            Feature::new(name, vertexes, id).map_err(|source| CatalogueError::Feature { id, source })?;
        self.features.push(feature);
        self.next_id += 1;
        Ok(id)
    }

    /// Store a feature that already carries its id.
    pub fn insert(&mut self, feature: Feature) -> Result<(), CatalogueError> {
        if self.get(feature.id()).is_some() {
            return Err(CatalogueError::DuplicateId(feature.id()));
        }
        self.next_id = self.next_id.max(feature.id().saturating_add(1));
        self.features.push(feature);
        Ok(())
    }

    pub fn get(&self, id: u64) -> Option<&Feature> {
        self.features.iter().find(|f| f.id() == id)
    }

    pub fn remove(&mut self, id: u64) -> Result<Feature, CatalogueError> {
        let pos = self
            .features
            .iter()
            .position(|f| f.id() == id)
            .ok_or(CatalogueError::UnknownFeature(id))?;
        Ok(self.features.remove(pos))
    }

    /// Swap in a new version of a stored feature (same id); returns the old one.
    pub fn replace(&mut self, feature: Feature) -> Result<Feature, CatalogueError> {
        let id = feature.id();
        let slot = self
            .features
            .iter_mut()
            .find(|f| f.id() == id)
            .ok_or(CatalogueError::UnknownFeature(id))?;
        Ok(std::mem::replace(slot, feature))
    }

    /// Crop the stored feature `id` to `bbox` and keep the cropped version.
    pub fn crop_feature(&mut self, id: u64, bbox: &TimeFrequencyBox) -> Result<(), CatalogueError> {
        let cropped = self
            .get(id)
            .ok_or(CatalogueError::UnknownFeature(id))?
            .crop(bbox, &self.crs)
            .map_err(|source| CatalogueError::Feature { id, source })?;
        self.replace(cropped)?;
        Ok(())
    }

    /// Features whose earliest or latest time lies in `[start, end]`.
    pub fn in_time_range(
        &self,
        start: CalendarTime,
        end: CalendarTime,
    ) -> impl Iterator<Item = &Feature> + '_ {
        self.features
            .iter()
            .filter(move |f| f.is_in_time_range(start, end))
    }

    /// One `to_text_summary` line per feature.
    pub fn text_summary(&self) -> String {
        let mut out = String::new();
        for f in &self.features {
            out.push_str(&f.to_text_summary());
            out.push('\n');
        }
        out
    }

    /// TFCat collection of all features, each cropped to `bbox` if given.
    ///
    /// Features with nothing inside `bbox` are left out.
    pub fn to_collection(
        &self,
        bbox: Option<&TimeFrequencyBox>,
    ) -> Result<FeatureCollection, CatalogueError> {
        let mut features = Vec::with_capacity(self.features.len());
        for f in &self.features {
            match f.to_schema_feature(bbox, &self.crs) {
                Ok(rec) => features.push(rec),
                Err(FeatureError::CropResultEmpty { id }) => {
                    tracing::warn!(id, name = f.name(), "feature outside bbox; skipped");
                }
                Err(source) => return Err(CatalogueError::Feature { id: f.id(), source }),
            }
        }
        tracing::debug!(
            exported = features.len(),
            total = self.features.len(),
            "collection_built"
        );
        Ok(FeatureCollection {
            features,
            crs: self.crs.document().clone(),
            fields: BTreeMap::from([feature_type_field()]),
            properties: Map::new(),
        })
    }

    pub fn from_collection(collection: &FeatureCollection) -> Result<Self, CatalogueError> {
        let crs = Crs::from_document(collection.crs.clone()).map_err(CatalogueError::Crs)?;
        let mut cat = Self::new(crs);
        for rec in &collection.features {
            let f = Feature::from_schema_feature(rec, &cat.crs)
                .map_err(|source| CatalogueError::Feature { id: rec.id, source })?;
            cat.insert(f)?;
        }
        Ok(cat)
    }

    pub fn to_json_string(&self, bbox: Option<&TimeFrequencyBox>) -> Result<String, CatalogueError> {
        let fc = self.to_collection(bbox)?;
        serde_json::to_string_pretty(&fc).map_err(CatalogueError::Json)
    }

    pub fn from_json_str(text: &str) -> Result<Self, CatalogueError> {
        let fc: FeatureCollection = serde_json::from_str(text).map_err(CatalogueError::Json)?;
        Self::from_collection(&fc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(secs: f64) -> CalendarTime {
        CalendarTime::from_unix_seconds(secs).unwrap()
    }

    fn square(t0: f64, f0: f64, closed: bool) -> Vec<(CalendarTime, f64)> {
        let mut v = vec![
            (t(t0), f0),
            (t(t0 + 100.0), f0),
            (t(t0 + 100.0), f0 + 10.0),
            (t(t0), f0 + 10.0),
        ];
        if closed {
            v.push(v[0]);
        }
        v
    }

    fn catalogue() -> Catalogue {
        let mut cat = Catalogue::new(Crs::tfcat_default().unwrap());
        cat.add_feature("burst", &square(1000.0, 50.0, true)).unwrap();
        cat.add_feature("arc", &square(5000.0, 50.0, false)).unwrap();
        cat
    }

    #[test]
    fn ids_are_sequential_and_unique() {
        let mut cat = catalogue();
        assert_eq!(cat.features().iter().map(Feature::id).collect::<Vec<_>>(), [0, 1]);
        cat.remove(0).unwrap();
        let id = cat.add_feature("late", &square(0.0, 0.0, true)).unwrap();
        assert_eq!(id, 2);
        let dup = cat.get(1).unwrap().clone();
        assert!(matches!(cat.insert(dup), Err(CatalogueError::DuplicateId(1))));
        assert!(matches!(cat.remove(42), Err(CatalogueError::UnknownFeature(42))));
    }

    #[test]
    fn failed_add_does_not_consume_an_id() {
        let mut cat = catalogue();
        let err = cat.add_feature("empty", &[]).unwrap_err();
        assert!(matches!(err, CatalogueError::Feature { id: 2, .. }));
        assert_eq!(cat.add_feature("ok", &square(0.0, 0.0, true)).unwrap(), 2);
    }

    #[test]
    fn time_range_filter() {
        let cat = catalogue();
        let hits: Vec<_> = cat.in_time_range(t(900.0), t(1050.0)).map(Feature::name).collect();
        assert_eq!(hits, ["burst"]);
        assert_eq!(cat.in_time_range(t(0.0), t(10_000.0)).count(), 2);
    }

    #[test]
    fn collection_round_trips_through_json() {
        let cat = catalogue();
        let text = cat.to_json_string(None).unwrap();
        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["type"], "FeatureCollection");
        assert_eq!(v["features"][0]["geometry"]["type"], "Polygon");
        assert_eq!(v["features"][1]["geometry"]["type"], "MultiLineString");
        assert_eq!(v["fields"]["feature_type"]["datatype"], "str");
        let back = Catalogue::from_json_str(&text).unwrap();
        assert_eq!(back.features(), cat.features());
        assert_eq!(back.crs(), cat.crs());
    }

    #[test]
    fn bbox_export_skips_features_outside() {
        let cat = catalogue();
        let bbox = TimeFrequencyBox::new(t(950.0), 0.0, t(1050.0), 100.0).unwrap();
        let fc = cat.to_collection(Some(&bbox)).unwrap();
        assert_eq!(fc.features.len(), 1);
        assert_eq!(fc.features[0].id, 0);
        assert!(fc.features[0].geometry.parts()[0]
            .iter()
            .all(|p| p[0] <= 1050.0 && p[0] >= 1000.0));
        // stored features keep their full extent
        assert_eq!(cat.get(0).unwrap().extent().time_max(), t(1100.0));
    }

    #[test]
    fn crop_feature_replaces_the_stored_geometry() {
        let mut cat = catalogue();
        let bbox = TimeFrequencyBox::new(t(950.0), 0.0, t(1050.0), 100.0).unwrap();
        cat.crop_feature(0, &bbox).unwrap();
        assert_eq!(cat.get(0).unwrap().extent().time_max(), t(1050.0));
        assert!(matches!(
            cat.crop_feature(1, &bbox),
            Err(CatalogueError::Feature {
                id: 1,
                source: FeatureError::CropResultEmpty { .. }
            })
        ));
    }

    #[test]
    fn summary_has_one_line_per_feature() {
        let s = catalogue().text_summary();
        let lines: Vec<_> = s.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "burst, 1970-01-01T00:16:40.000, 1970-01-01T00:18:20.000, 50, 60");
    }
}

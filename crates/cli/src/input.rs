//! Annotated vertex lists read from JSON or CSV.
//!
//! JSON: `{"features": [{"name": "...", "vertexes": [[t, f], ...]}]}` with `t`
//! as Unix seconds or an ISOT string.
//! CSV: columns `id,name,time,frequency`, one row per vertex; rows sharing an
//! `id` form one feature, in file order.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use polars::prelude::*;
use serde::Deserialize;
use spacelabel::CalendarTime;

/// One drawn feature before it gets a catalogue id.
#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    pub name: String,
    pub vertexes: Vec<(CalendarTime, f64)>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TimeValue {
    Seconds(f64),
    Isot(String),
}

impl TimeValue {
    fn to_calendar(&self) -> Result<CalendarTime> {
        Ok(match self {
            TimeValue::Seconds(s) => CalendarTime::from_unix_seconds(*s)?,
            TimeValue::Isot(s) => CalendarTime::parse_isot(s)?,
        })
    }
}

#[derive(Deserialize)]
struct InputFeature {
    name: String,
    vertexes: Vec<(TimeValue, f64)>,
}

#[derive(Deserialize)]
struct InputDoc {
    features: Vec<InputFeature>,
}

/// Load annotations, choosing the reader by file extension.
pub fn load_annotations(path: &Path) -> Result<Vec<Annotation>> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => load_csv(path),
        Some("json") => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            parse_json(&text).with_context(|| format!("parsing {}", path.display()))
        }
        _ => bail!("unsupported input {} (expected .json or .csv)", path.display()),
    }
}

fn parse_json(text: &str) -> Result<Vec<Annotation>> {
    let doc: InputDoc = serde_json::from_str(text)?;
    doc.features
        .into_iter()
        .map(|f| {
            let vertexes = f
                .vertexes
                .iter()
                .map(|(t, freq)| Ok((t.to_calendar()?, *freq)))
                .collect::<Result<Vec<_>>>()
                .with_context(|| format!("feature {:?}", f.name))?;
            Ok(Annotation {
                name: f.name,
                vertexes,
            })
        })
        .collect()
}

fn load_csv(path: &Path) -> Result<Vec<Annotation>> {
    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(100))
        .finish()?
        .collect()
        .with_context(|| format!("reading {}", path.display()))?;
    tracing::debug!(rows = df.height(), cols = df.width(), "input_csv_shape");

    let ids = df.column("id")?.cast(&DataType::Int64)?;
    let names = df.column("name")?.cast(&DataType::String)?;
    let freqs = df.column("frequency")?.cast(&DataType::Float64)?;
    let time_col = df.column("time")?;
    let times: Vec<Option<CalendarTime>> = if time_col.dtype() == &DataType::String {
        time_col
            .str()?
            .into_iter()
            .map(|s| s.map(CalendarTime::parse_isot).transpose())
            .collect::<std::result::Result<_, _>>()?
    } else {
        time_col
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .map(|s| s.map(CalendarTime::from_unix_seconds).transpose())
            .collect::<std::result::Result<_, _>>()?
    };

    let mut out: Vec<(i64, Annotation)> = Vec::new();
    let mut slot: HashMap<i64, usize> = HashMap::new();
    let rows = ids
        .i64()?
        .into_iter()
        .zip(names.str()?)
        .zip(times)
        .zip(freqs.f64()?);
    for (row, (((id, name), time), freq)) in rows.enumerate() {
        let (Some(id), Some(name), Some(time), Some(freq)) = (id, name, time, freq) else {
            bail!("{}: row {row} has an empty cell", path.display());
        };
        let k = *slot.entry(id).or_insert_with(|| {
            out.push((
                id,
                Annotation {
                    name: name.to_string(),
                    vertexes: Vec::new(),
                },
            ));
            out.len() - 1
        });
        if out[k].1.name != name {
            bail!(
                "{}: row {row} names feature {id} {name:?}, earlier rows say {:?}",
                path.display(),
                out[k].1.name
            );
        }
        out[k].1.vertexes.push((time, freq));
    }
    Ok(out.into_iter().map(|(_, a)| a).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn json_accepts_seconds_and_isot() {
        let text = r#"{"features": [
            {"name": "arc", "vertexes": [[1141249646.0, 139.3], ["2006-03-02T05:54:43", 43.9]]}
        ]}"#;
        let a = parse_json(text).unwrap();
        assert_eq!(a.len(), 1);
        assert_eq!(a[0].name, "arc");
        assert_eq!(a[0].vertexes[1].0.unix_seconds(), 1141278883.0);
        assert_eq!(a[0].vertexes[1].1, 43.9);
    }

    #[test]
    fn json_reports_bad_times() {
        let text = r#"{"features": [{"name": "x", "vertexes": [["soon", 1.0]]}]}"#;
        let err = parse_json(text).unwrap_err();
        assert!(format!("{err:#}").contains("soon"));
    }

    #[test]
    fn csv_rows_group_by_id_in_file_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vertexes.csv");
        fs::write(
            &path,
            "id,name,time,frequency\n\
             7,burst,1000,50.0\n\
             3,arc,2000,10.0\n\
             7,burst,1100,50.0\n\
             7,burst,1100,60.0\n\
             3,arc,2100,20.0\n",
        )
        .unwrap();
        let a = load_annotations(&path).unwrap();
        assert_eq!(a.len(), 2);
        assert_eq!(a[0].name, "burst");
        assert_eq!(a[0].vertexes.len(), 3);
        assert_eq!(a[0].vertexes[2].1, 60.0);
        assert_eq!(a[1].name, "arc");
        assert_eq!(a[1].vertexes[1].0.unix_seconds(), 2100.0);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        assert!(load_annotations(Path::new("labels.txt")).is_err());
    }
}

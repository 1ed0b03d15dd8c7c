use std::{collections::HashSet, fs, path::Path};

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{geometry::primitives::LatLon, matching::status::RecordAnnotation};

/// One uploaded facility/activity entry, after its sheet-specific keys have been resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationRecord {
    pub id: String,
    pub name: String,
    /// Municipality/palika as typed by the uploader, empty when absent.
    pub municipality_text: String,
    pub district_text: Option<String>,
    /// Exact position; records carrying one bypass name matching.
    pub coordinates: Option<LatLon>,
}

impl LocationRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            municipality_text: String::new(),
            district_text: None,
            coordinates: None,
        }
    }

    pub fn with_municipality(mut self, municipality_text: impl Into<String>) -> Self {
        self.municipality_text = municipality_text.into();
        self
    }

    pub fn with_district(mut self, district_text: impl Into<String>) -> Self {
        self.district_text = Some(district_text.into());
        self
    }

    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.coordinates = Some(LatLon::new(latitude, longitude));
        self
    }

    pub fn has_coordinates(&self) -> bool {
        self.coordinates.is_some()
    }

    /// Adapt one raw uploaded object. `index` is the position in the upload and names records that
    /// arrive without an id.
    pub fn from_json(index: usize, object: &Value, keys: &RecordKeys) -> Self {
        let id = first_text(object, &keys.id).unwrap_or_else(|| {
            log::warn!("Record at position {} has no id, naming it row-{}", index, index);
            format!("row-{}", index)
        });
        let name = first_text(object, &keys.name).unwrap_or_else(|| id.clone());
        let coordinates = match (
            first_number(object, &keys.latitude),
            first_number(object, &keys.longitude),
        ) {
            (Some(latitude), Some(longitude)) => {
                let position = LatLon::new(latitude, longitude);
                // A zero in either coordinate means "not geocoded" on the uploading side.
                if position.is_valid_wgs84() && latitude != 0.0 && longitude != 0.0 {
                    Some(position)
                } else {
                    log::warn!("Ignoring invalid coordinates {:?} of record {}", position, id);
                    None
                }
            }
            _ => None,
        };
        Self {
            municipality_text: first_text(object, &keys.municipality).unwrap_or_default(),
            district_text: first_text(object, &keys.district),
            coordinates,
            id,
            name,
        }
    }
}

/// Ordered key aliases under which uploaded sheets store each record field. The first alias that
/// holds a usable value wins. A dotted alias such as `extra_data.District` addresses a nested object.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RecordKeys {
    pub id: Vec<String>,
    pub name: Vec<String>,
    pub municipality: Vec<String>,
    pub district: Vec<String>,
    pub latitude: Vec<String>,
    pub longitude: Vec<String>,
}

pub(crate) fn aliases(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|key| key.to_string()).collect()
}

impl Default for RecordKeys {
    fn default() -> Self {
        Self {
            id: aliases(&["id", "ID", "pk"]),
            name: aliases(&["name", "Name", "facility_name", "extra_data.Name"]),
            municipality: aliases(&[
                "municipality",
                "Municipality",
                "palika",
                "Palika",
                "extra_data.Municipality",
                "extra_data.municipality",
            ]),
            district: aliases(&[
                "district",
                "District",
                "extra_data.District",
                "extra_data.district",
                "district_name",
            ]),
            latitude: aliases(&["latitude", "Latitude", "lat", "extra_data.Latitude"]),
            longitude: aliases(&[
                "longitude",
                "Longitude",
                "lng",
                "lon",
                "extra_data.Longitude",
            ]),
        }
    }
}

/// Follow a dotted key path into nested JSON objects.
pub(crate) fn resolve_path<'a>(object: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(object, |value, segment| value.as_object()?.get(segment))
}

fn value_as_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn value_as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// First alias holding a non-empty string or a number, as trimmed text.
pub(crate) fn first_text(object: &Value, keys: &[String]) -> Option<String> {
    keys.iter()
        .filter_map(|key| resolve_path(object, key))
        .find_map(value_as_text)
}

fn first_number(object: &Value, keys: &[String]) -> Option<f64> {
    keys.iter()
        .filter_map(|key| resolve_path(object, key))
        .find_map(value_as_number)
}

/// Adapt a JSON array of uploaded objects into records, in upload order. A repeated id gets
/// `#<position>` appended.
pub fn parse_location_records(
    contents: &str,
    keys: &RecordKeys,
) -> anyhow::Result<Vec<LocationRecord>> {
    let value: Value = serde_json::from_str(contents).context("Parsing location records")?;
    let entries = value
        .as_array()
        .ok_or_else(|| anyhow!("Expected a JSON array of location records"))?;

    let mut seen_ids = HashSet::new();
    let mut records = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        if !entry.is_object() {
            log::warn!("Skipping record at position {}, it is not an object", index);
            continue;
        }
        let mut record = LocationRecord::from_json(index, entry, keys);
        if !seen_ids.insert(record.id.clone()) {
            let unique_id = format!("{}#{}", record.id, index);
            log::warn!(
                "Record id {} appears more than once, renaming the one at position {} to {}",
                record.id,
                index,
                unique_id
            );
            record.id = unique_id;
            seen_ids.insert(record.id.clone());
        }
        records.push(record);
    }
    if records.len() != entries.len() {
        log::warn!(
            "Out of {} entries read, only {} were records.",
            entries.len(),
            records.len()
        )
    }
    Ok(records)
}

pub fn read_location_records(
    filepath: &Path,
    keys: &RecordKeys,
) -> anyhow::Result<Vec<LocationRecord>> {
    let contents = fs::read_to_string(filepath)
        .with_context(|| format!("Reading location records from {:?}", filepath))?;
    parse_location_records(&contents, keys)
}

pub fn write_record_status(
    annotations: &[RecordAnnotation],
    output_filepath: &Path,
) -> anyhow::Result<()> {
    let contents = serde_json::to_string_pretty(annotations)?;
    fs::write(output_filepath, contents)
        .with_context(|| format!("Writing record status to {:?}", output_filepath))
}

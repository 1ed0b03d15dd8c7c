use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::matching::aggregate::Marker;

use super::{
    feature::{BoundaryFeature, BoundaryLevel},
    records::{aliases, first_text},
};

/// Ordered property names under which boundary datasets store each feature attribute.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BoundaryKeys {
    pub id: Vec<String>,
    pub district: Vec<String>,
    pub local_name: Vec<String>,
}

impl Default for BoundaryKeys {
    fn default() -> Self {
        Self {
            id: aliases(&["id", "OBJECTID", "FID"]),
            district: aliases(&["DISTRICT", "DIST_EN", "District", "district", "DIST_NAME"]),
            local_name: aliases(&[
                "NAME",
                "PALIKA",
                "GaPa_NaPa",
                "LOCAL",
                "Municipality",
                "municipality",
                "local_name",
            ]),
        }
    }
}

/// One boundary file to load. Without `level`, features with a local name are municipalities and
/// the rest are districts.
#[derive(Debug, Clone, Deserialize)]
pub struct BoundarySource {
    pub filepath: PathBuf,
    pub level: Option<BoundaryLevel>,
}

fn ring_from_positions(positions: &[geojson::Position]) -> geo::LineString {
    positions
        .iter()
        .filter(|position| position.len() >= 2)
        .map(|position| geo::Coord {
            x: position[0],
            y: position[1],
        })
        .collect()
}

fn polygon_from_rings(rings: &geojson::PolygonType) -> Option<geo::Polygon> {
    let (exterior, interiors) = rings.split_first()?;
    let exterior = ring_from_positions(exterior);
    if exterior.0.is_empty() {
        return None;
    }
    let interiors = interiors
        .iter()
        .map(|ring| ring_from_positions(ring))
        .filter(|ring| !ring.0.is_empty())
        .collect();
    Some(geo::Polygon::new(exterior, interiors))
}

/// Convert (multi-)polygon GeoJSON geometry. Positions with fewer than two numbers are dropped;
/// other geometry types, and polygons left without an exterior ring, give `None`.
pub fn geometry_from_geojson(value: &geojson::Value) -> Option<geo::Geometry> {
    match value {
        geojson::Value::Polygon(rings) => polygon_from_rings(rings).map(geo::Geometry::Polygon),
        geojson::Value::MultiPolygon(polygons) => {
            let polygons: Vec<geo::Polygon> =
                polygons.iter().filter_map(polygon_from_rings).collect();
            if polygons.is_empty() {
                return None;
            }
            Some(geo::Geometry::MultiPolygon(geo::MultiPolygon(polygons)))
        }
        _ => None,
    }
}

fn feature_id(
    feature: &geojson::Feature,
    properties: &Value,
    keys: &BoundaryKeys,
) -> Option<String> {
    match &feature.id {
        Some(geojson::feature::Id::String(id)) => Some(id.clone()),
        Some(geojson::feature::Id::Number(id)) => Some(id.to_string()),
        None => first_text(properties, &keys.id),
    }
}

/// Adapt the features of a GeoJSON document. Features without a district name are skipped.
pub fn parse_boundary_features(
    contents: &str,
    level: Option<BoundaryLevel>,
    keys: &BoundaryKeys,
) -> anyhow::Result<Vec<BoundaryFeature>> {
    let document: geojson::GeoJson = contents.parse().context("Parsing boundary GeoJSON")?;
    let features = match document {
        geojson::GeoJson::FeatureCollection(collection) => collection.features,
        geojson::GeoJson::Feature(feature) => vec![feature],
        geojson::GeoJson::Geometry(_) => {
            return Err(anyhow!("Expected boundary features, found a bare geometry"))
        }
    };

    let num_features = features.len();
    let mut boundary_features = Vec::with_capacity(num_features);
    let mut num_without_geometry = 0;
    for (index, mut feature) in features.into_iter().enumerate() {
        let properties = Value::Object(feature.properties.take().unwrap_or_default());
        let district_name = match first_text(&properties, &keys.district) {
            Some(district_name) => district_name,
            None => continue,
        };
        let local_name = match level {
            Some(BoundaryLevel::District) => None,
            _ => first_text(&properties, &keys.local_name),
        };
        let level = match (level, &local_name) {
            (Some(level), _) => level,
            (None, Some(_)) => BoundaryLevel::Municipality,
            (None, None) => BoundaryLevel::District,
        };
        let geometry = feature
            .geometry
            .as_ref()
            .and_then(|geometry| geometry_from_geojson(&geometry.value));
        if geometry.is_none() {
            num_without_geometry += 1;
        }
        boundary_features.push(BoundaryFeature {
            id: feature_id(&feature, &properties, keys).unwrap_or_else(|| index.to_string()),
            level,
            district_name,
            local_name,
            geometry,
        });
    }

    if boundary_features.len() != num_features {
        log::warn!(
            "Out of {} features read, only {} had a district name.",
            num_features,
            boundary_features.len()
        )
    }
    if num_without_geometry > 0 {
        log::warn!(
            "{} boundary features have no usable polygon geometry, their centroid falls back to the default point.",
            num_without_geometry
        )
    }
    Ok(boundary_features)
}

pub fn read_boundary_features(
    filepath: &Path,
    level: Option<BoundaryLevel>,
    keys: &BoundaryKeys,
) -> anyhow::Result<Vec<BoundaryFeature>> {
    let contents = fs::read_to_string(filepath)
        .with_context(|| format!("Reading boundary features from {:?}", filepath))?;
    parse_boundary_features(&contents, level, keys)
}

/// Load every source in order. A source that cannot be read is logged and skipped.
pub fn read_boundary_sources(
    sources: &[BoundarySource],
    keys: &BoundaryKeys,
) -> Vec<BoundaryFeature> {
    let mut features = Vec::new();
    for source in sources {
        match read_boundary_features(&source.filepath, source.level, keys) {
            Ok(source_features) => {
                log::info!(
                    "Read {} boundary features from {:?}",
                    source_features.len(),
                    source.filepath
                );
                features.extend(source_features);
            }
            Err(err) => log::warn!("Skipping boundary source: {:?}", err),
        }
    }
    features
}

fn marker_to_feature(marker: &Marker) -> geojson::Feature {
    let point = geo::Point::from(marker.coordinates);
    let mut feature = geojson::Feature::from(geojson::Geometry::from(&point));
    feature.id = Some(geojson::feature::Id::String(marker.id.clone()));
    feature.set_property("label", marker.label.clone());
    feature.set_property("tier", marker.tier.name());
    feature.set_property("count", marker.count);
    feature.set_property("member_ids", json!(marker.member_ids()));
    feature
}

pub fn write_markers_to_geojson(markers: &[Marker], output_filepath: &Path) -> io::Result<()> {
    let feature_collection: geojson::FeatureCollection =
        markers.iter().map(marker_to_feature).collect();
    let geojson_contents: geojson::GeoJson = geojson::GeoJson::from(feature_collection);
    fs::write(output_filepath, geojson_contents.to_string())
}

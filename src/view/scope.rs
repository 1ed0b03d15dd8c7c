use geo::BoundingRect;
use serde::Deserialize;

use crate::{
    geofile::feature::{BoundaryFeature, BoundaryLevel},
    geometry::primitives::LatLonBounds,
    matching::{filter::RecordFilter, normalize::normalize_strict},
};

/// Drill-down level of the map.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub enum ViewScope {
    /// Whole country, district polygons shown.
    #[default]
    National,
    /// One district, its municipality polygons shown.
    District { district: String },
    /// One municipality highlighted within its district.
    Municipality {
        district: String,
        municipality: String,
    },
}

impl ViewScope {
    pub fn district(&self) -> Option<&str> {
        match self {
            ViewScope::National => None,
            ViewScope::District { district } | ViewScope::Municipality { district, .. } => {
                Some(district)
            }
        }
    }

    pub fn municipality(&self) -> Option<&str> {
        match self {
            ViewScope::Municipality { municipality, .. } => Some(municipality),
            _ => None,
        }
    }

    /// Record criteria implied by the scope, so that listed records agree with the map.
    pub fn record_filter(&self) -> RecordFilter {
        RecordFilter {
            district: self.district().map(str::to_string),
            municipality: self.municipality().map(str::to_string),
            search: None,
        }
    }
}

fn in_district(feature: &BoundaryFeature, district_key: &str) -> bool {
    normalize_strict(&feature.district_name) == district_key
}

/// Boundary polygons drawn for `scope`: districts nationally, otherwise the municipalities of the
/// selected district.
pub fn displayed_features<'a>(
    scope: &ViewScope,
    features: &'a [BoundaryFeature],
) -> Vec<&'a BoundaryFeature> {
    match scope.district().map(normalize_strict) {
        None => features
            .iter()
            .filter(|feature| feature.level == BoundaryLevel::District)
            .collect(),
        Some(district_key) => features
            .iter()
            .filter(|feature| {
                feature.level == BoundaryLevel::Municipality && in_district(feature, &district_key)
            })
            .collect(),
    }
}

fn bounds_of<'a>(features: impl IntoIterator<Item = &'a BoundaryFeature>) -> Option<LatLonBounds> {
    features
        .into_iter()
        .filter_map(|feature| feature.geometry.as_ref()?.bounding_rect())
        .map(LatLonBounds::from)
        .reduce(|acc, bounds| acc.union(&bounds))
}

/// Viewport to fit for `scope`, widening to the district and then `national_bounds` when nothing
/// with geometry matches.
pub fn scope_bounds(
    scope: &ViewScope,
    features: &[BoundaryFeature],
    national_bounds: LatLonBounds,
) -> LatLonBounds {
    let displayed = displayed_features(scope, features);
    let municipality_bounds = scope.municipality().map(normalize_strict).and_then(|key| {
        bounds_of(displayed.iter().copied().filter(|feature| {
            feature
                .local_name
                .as_deref()
                .map_or(false, |local_name| normalize_strict(local_name) == key)
        }))
    });
    let district_bounds = || match scope {
        ViewScope::National => None,
        _ => bounds_of(displayed.iter().copied()),
    };
    municipality_bounds
        .or_else(district_bounds)
        .unwrap_or(national_bounds)
}

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    geofile::{
        feature::{BoundaryFeature, BoundaryLevel},
        records::LocationRecord,
    },
    geometry::{centroid::centroid, district_index::DistrictIndex, primitives::LatLon},
};

use super::normalize::{names_overlap, normalize_place};

/// Priority of a match, from most to least precise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum MatchTier {
    ExactCoordinate,
    MunicipalityMatch,
    DistrictFallback,
}

impl MatchTier {
    pub fn name(&self) -> &'static str {
        match self {
            MatchTier::ExactCoordinate => "exact",
            MatchTier::MunicipalityMatch => "municipality",
            MatchTier::DistrictFallback => "district",
        }
    }
}

/// Records that share one map position.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchGroup {
    /// `<tier>:<record id | feature id | district key>`, unique within one match result.
    pub id: String,
    pub label: String,
    pub coordinates: LatLon,
    pub tier: MatchTier,
    pub members: Vec<LocationRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MatchParams {
    /// District assumed for records that carry no district text.
    pub default_district: Option<String>,
    /// Position used when a boundary geometry is missing or degenerate.
    pub fallback_point: LatLon,
}

impl Default for MatchParams {
    fn default() -> Self {
        Self {
            default_district: None,
            fallback_point: LatLon::new(28.39, 84.12),
        }
    }
}

/// Outcome of [`match_records`]. Every input record is in exactly one group or in `unmapped`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchResult {
    /// Exact groups, then municipality groups, then district groups.
    pub groups: Vec<MatchGroup>,
    pub unmapped: Vec<LocationRecord>,
}

impl MatchResult {
    pub fn groups_with_tier(&self, tier: MatchTier) -> impl Iterator<Item = &MatchGroup> {
        self.groups.iter().filter(move |group| group.tier == tier)
    }

    /// Number of records placed with `tier`.
    pub fn record_count(&self, tier: MatchTier) -> usize {
        self.groups_with_tier(tier)
            .map(|group| group.members.len())
            .sum()
    }
}

/// Resolve every record to a map position. The first municipality feature to claim a record
/// keeps it.
pub fn match_records(
    records: &[LocationRecord],
    features: &[BoundaryFeature],
    districts: &DistrictIndex,
    params: &MatchParams,
) -> MatchResult {
    let mut result = MatchResult::default();
    let mut pending: Vec<&LocationRecord> = Vec::new();
    for record in records {
        match record.coordinates {
            Some(coordinates) => result.groups.push(MatchGroup {
                id: format!("{}:{}", MatchTier::ExactCoordinate.name(), record.id),
                label: record.name.clone(),
                coordinates,
                tier: MatchTier::ExactCoordinate,
                members: vec![record.clone()],
            }),
            None => pending.push(record),
        }
    }

    let pending = match_municipalities(pending, features, params, &mut result.groups);
    let unmapped = match_districts(pending, districts, params, &mut result.groups);
    result.unmapped = unmapped.into_iter().cloned().collect();

    log::debug!(
        "Matched {} exact, {} by municipality, {} by district, {} unmapped",
        result.record_count(MatchTier::ExactCoordinate),
        result.record_count(MatchTier::MunicipalityMatch),
        result.record_count(MatchTier::DistrictFallback),
        result.unmapped.len()
    );
    result
}

/// Tier 1. Returns the records no feature claimed, in input order.
fn match_municipalities<'a>(
    pending: Vec<&'a LocationRecord>,
    features: &[BoundaryFeature],
    params: &MatchParams,
    groups: &mut Vec<MatchGroup>,
) -> Vec<&'a LocationRecord> {
    let mut candidates: Vec<(&LocationRecord, String)> = pending
        .into_iter()
        .map(|record| (record, normalize_place(&record.municipality_text)))
        .collect();

    for feature in features {
        if candidates.is_empty() {
            break;
        }
        if feature.level != BoundaryLevel::Municipality {
            continue;
        }
        let local_key = match feature.local_name.as_deref().map(normalize_place) {
            Some(local_key) if !local_key.is_empty() => local_key,
            _ => continue,
        };

        let (claimed, remaining): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(|(_, municipality_key)| names_overlap(municipality_key, &local_key));
        candidates = remaining;
        if claimed.is_empty() {
            continue;
        }
        groups.push(MatchGroup {
            id: format!("{}:{}", MatchTier::MunicipalityMatch.name(), feature.id),
            label: feature.display_name().to_string(),
            coordinates: centroid(feature.geometry.as_ref(), params.fallback_point),
            tier: MatchTier::MunicipalityMatch,
            members: claimed.into_iter().map(|(record, _)| record.clone()).collect(),
        });
    }

    candidates.into_iter().map(|(record, _)| record).collect()
}

/// Tier 2. Returns the records whose district could not be resolved, in input order.
fn match_districts<'a>(
    pending: Vec<&'a LocationRecord>,
    districts: &DistrictIndex,
    params: &MatchParams,
    groups: &mut Vec<MatchGroup>,
) -> Vec<&'a LocationRecord> {
    let mut group_index_by_key: HashMap<String, usize> = HashMap::new();
    let mut unmapped = Vec::new();
    for record in pending {
        let district_text = record
            .district_text
            .as_deref()
            .filter(|text| !text.trim().is_empty())
            .or(params.default_district.as_deref());
        let center = match district_text.and_then(|text| districts.lookup(text)) {
            Some(center) => center,
            None => {
                unmapped.push(record);
                continue;
            }
        };
        match group_index_by_key.get(&center.district_key) {
            Some(&index) => groups[index].members.push(record.clone()),
            None => {
                group_index_by_key.insert(center.district_key.clone(), groups.len());
                groups.push(MatchGroup {
                    id: format!("{}:{}", MatchTier::DistrictFallback.name(), center.district_key),
                    label: format!("{} (General Area)", center.display_name),
                    coordinates: center.center,
                    tier: MatchTier::DistrictFallback,
                    members: vec![record.clone()],
                });
            }
        }
    }
    unmapped
}

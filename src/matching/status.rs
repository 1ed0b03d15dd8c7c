use std::collections::HashMap;

use serde::Serialize;

use crate::geofile::records::LocationRecord;

use super::tiered_matcher::{MatchGroup, MatchTier};

/// How a record is placed on the map, for list annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecordStatus {
    Exact,
    MunicipalityMatched,
    DistrictFallback,
    Unmapped,
}

impl From<MatchTier> for RecordStatus {
    fn from(tier: MatchTier) -> Self {
        match tier {
            MatchTier::ExactCoordinate => RecordStatus::Exact,
            MatchTier::MunicipalityMatch => RecordStatus::MunicipalityMatched,
            MatchTier::DistrictFallback => RecordStatus::DistrictFallback,
        }
    }
}

/// Status of `record` given the groups of one match result. Records carrying coordinates are
/// `Exact` whatever the groups say.
pub fn status_of(record: &LocationRecord, groups: &[MatchGroup]) -> RecordStatus {
    if record.has_coordinates() {
        return RecordStatus::Exact;
    }
    groups
        .iter()
        .find(|group| group.members.iter().any(|member| member.id == record.id))
        .map_or(RecordStatus::Unmapped, |group| group.tier.into())
}

pub struct StatusIndex {
    tier_by_id: HashMap<String, MatchTier>,
}

impl StatusIndex {
    pub fn new(groups: &[MatchGroup]) -> Self {
        let tier_by_id = groups
            .iter()
            .flat_map(|group| {
                group
                    .members
                    .iter()
                    .map(move |member| (member.id.clone(), group.tier))
            })
            .collect();
        Self { tier_by_id }
    }

    pub fn status_of(&self, record: &LocationRecord) -> RecordStatus {
        if record.has_coordinates() {
            return RecordStatus::Exact;
        }
        self.tier_by_id
            .get(&record.id)
            .map_or(RecordStatus::Unmapped, |tier| (*tier).into())
    }
}

/// One line of the annotated record list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordAnnotation {
    pub id: String,
    pub name: String,
    pub status: RecordStatus,
}

pub fn annotate_records(
    records: &[LocationRecord],
    groups: &[MatchGroup],
) -> Vec<RecordAnnotation> {
    let index = StatusIndex::new(groups);
    records
        .iter()
        .map(|record| RecordAnnotation {
            id: record.id.clone(),
            name: record.name.clone(),
            status: index.status_of(record),
        })
        .collect()
}

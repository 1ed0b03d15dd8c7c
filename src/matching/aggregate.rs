use serde::Serialize;

use crate::{geofile::records::LocationRecord, geometry::primitives::LatLon};

use super::tiered_matcher::{MatchGroup, MatchTier};

/// Render unit handed to the map: one per match group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub id: String,
    pub label: String,
    pub tier: MatchTier,
    pub coordinates: LatLon,
    pub count: usize,
    /// Records listed in the marker's popup, in group order.
    pub members: Vec<LocationRecord>,
}

impl From<&MatchGroup> for Marker {
    fn from(group: &MatchGroup) -> Self {
        Self {
            id: group.id.clone(),
            label: group.label.clone(),
            tier: group.tier,
            coordinates: group.coordinates,
            count: group.members.len(),
            members: group.members.clone(),
        }
    }
}

impl Marker {
    pub fn member_ids(&self) -> Vec<&str> {
        self.members.iter().map(|member| member.id.as_str()).collect()
    }
}

pub fn to_markers(groups: &[MatchGroup]) -> Vec<Marker> {
    groups.iter().map(Marker::from).collect()
}

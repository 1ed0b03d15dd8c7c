use serde::{Deserialize, Serialize};

/// Granularity of an administrative boundary polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoundaryLevel {
    District,
    /// Municipality (palika) or ward, the finest unit used for matching.
    Municipality,
}

/// One polygon of the administrative boundary dataset.
#[derive(Debug, Clone)]
pub struct BoundaryFeature {
    pub id: String,
    pub level: BoundaryLevel,
    pub district_name: String,
    /// Municipality/ward name, only present on municipality-level features.
    pub local_name: Option<String>,
    /// `None` when the source geometry was missing or not a (multi-)polygon.
    pub geometry: Option<geo::Geometry>,
}

impl BoundaryFeature {
    pub fn district(id: impl Into<String>, district_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            level: BoundaryLevel::District,
            district_name: district_name.into(),
            local_name: None,
            geometry: None,
        }
    }

    pub fn municipality(
        id: impl Into<String>,
        district_name: impl Into<String>,
        local_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            level: BoundaryLevel::Municipality,
            district_name: district_name.into(),
            local_name: Some(local_name.into()),
            geometry: None,
        }
    }

    pub fn with_geometry(mut self, geometry: impl Into<geo::Geometry>) -> Self {
        self.geometry = Some(geometry.into());
        self
    }

    /// Name used as the label of a marker placed on this feature.
    pub fn display_name(&self) -> &str {
        match &self.local_name {
            Some(local_name) if !local_name.trim().is_empty() => local_name,
            _ => &self.district_name,
        }
    }
}

use serde::Deserialize;

use crate::geofile::records::LocationRecord;

use super::normalize::normalize_strict;

/// Narrowing of the record list, as driven by map drill-down and the search box. Every criterion
/// that is set must hold.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RecordFilter {
    pub district: Option<String>,
    pub municipality: Option<String>,
    pub search: Option<String>,
}

impl RecordFilter {
    pub fn is_empty(&self) -> bool {
        self.district.is_none() && self.municipality.is_none() && self.search.is_none()
    }

    pub fn matches(&self, record: &LocationRecord) -> bool {
        self.matches_district(record)
            && self.matches_municipality(record)
            && self.matches_search(record)
    }

    fn matches_district(&self, record: &LocationRecord) -> bool {
        let selected = match self.district.as_deref().map(normalize_strict) {
            Some(selected) if !selected.is_empty() => selected,
            _ => return true,
        };
        record
            .district_text
            .as_deref()
            .map(normalize_strict)
            .map_or(false, |district| !district.is_empty() && district.contains(&selected))
    }

    fn matches_municipality(&self, record: &LocationRecord) -> bool {
        let selected = match self.municipality.as_deref().map(normalize_strict) {
            Some(selected) if !selected.is_empty() => selected,
            _ => return true,
        };
        normalize_strict(&record.municipality_text).contains(&selected)
    }

    fn matches_search(&self, record: &LocationRecord) -> bool {
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                record.name.to_lowercase().contains(&term.to_lowercase())
            }
            _ => true,
        }
    }

    /// `self` with the criteria of `other` filled in where `self` has none.
    pub fn or(self, other: RecordFilter) -> RecordFilter {
        RecordFilter {
            district: self.district.or(other.district),
            municipality: self.municipality.or(other.municipality),
            search: self.search.or(other.search),
        }
    }
}

/// Records passing `filter`, in input order.
pub fn filter_records(records: &[LocationRecord], filter: &RecordFilter) -> Vec<LocationRecord> {
    if filter.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|record| filter.matches(record))
        .cloned()
        .collect()
}

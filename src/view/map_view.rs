use serde::Serialize;

use crate::{
    geofile::{feature::BoundaryFeature, records::LocationRecord},
    geometry::{district_index::DistrictIndex, primitives::LatLonBounds},
    matching::{
        aggregate::{to_markers, Marker},
        filter::{filter_records, RecordFilter},
        status::{annotate_records, RecordAnnotation},
        tiered_matcher::{match_records, MatchParams, MatchResult, MatchTier},
    },
};

use super::scope::{scope_bounds, ViewScope};

/// Record counts per placement, over the records shown in the current view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchSummary {
    pub total: usize,
    pub exact: usize,
    pub municipality: usize,
    pub district: usize,
    pub unmapped: usize,
}

impl From<&MatchResult> for MatchSummary {
    fn from(result: &MatchResult) -> Self {
        let exact = result.record_count(MatchTier::ExactCoordinate);
        let municipality = result.record_count(MatchTier::MunicipalityMatch);
        let district = result.record_count(MatchTier::DistrictFallback);
        let unmapped = result.unmapped.len();
        Self {
            total: exact + municipality + district + unmapped,
            exact,
            municipality,
            district,
            unmapped,
        }
    }
}

/// Everything the map and list renderers need for one view.
#[derive(Debug, Clone)]
pub struct MapView {
    pub markers: Vec<Marker>,
    /// Shown records in list order, each with its placement.
    pub annotations: Vec<RecordAnnotation>,
    pub summary: MatchSummary,
    pub bounds: LatLonBounds,
}

/// Compute a view from scratch. The scope's district and municipality override those of `filter`.
pub fn build_map_view(
    records: &[LocationRecord],
    features: &[BoundaryFeature],
    scope: &ViewScope,
    filter: &RecordFilter,
    params: &MatchParams,
    national_bounds: LatLonBounds,
) -> MapView {
    let filter = scope.record_filter().or(filter.clone());
    let shown = filter_records(records, &filter);
    log::info!("Showing {} of {} records", shown.len(), records.len());

    let districts = DistrictIndex::build(features, params.fallback_point);
    let result = match_records(&shown, features, &districts, params);
    let summary = MatchSummary::from(&result);
    log::info!(
        "Placed {} records exactly, {} by municipality, {} by district; {} unmapped",
        summary.exact,
        summary.municipality,
        summary.district,
        summary.unmapped
    );

    MapView {
        markers: to_markers(&result.groups),
        annotations: annotate_records(&shown, &result.groups),
        summary,
        bounds: scope_bounds(scope, features, national_bounds),
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        geofile::{feature::BoundaryFeature, records::LocationRecord},
        geometry::primitives::LatLonBounds,
        matching::{filter::RecordFilter, status::RecordStatus, tiered_matcher::MatchParams},
        view::scope::ViewScope,
    };

    use super::{build_map_view, MatchSummary};

    fn test_features() -> Vec<BoundaryFeature> {
        vec![
            BoundaryFeature::district("d1", "Morang"),
            BoundaryFeature::district("d2", "Sunsari"),
            BoundaryFeature::municipality("m1", "Morang", "Biratnagar"),
            BoundaryFeature::municipality("m2", "Sunsari", "Dharan"),
        ]
    }

    fn test_records() -> Vec<LocationRecord> {
        vec![
            LocationRecord::new("1", "School")
                .with_municipality("Biratnagar")
                .with_district("Morang"),
            LocationRecord::new("2", "Clinic")
                .with_municipality("Biratnagar")
                .with_district("Morang"),
            LocationRecord::new("3", "Gauge")
                .with_coordinates(26.45, 87.27)
                .with_district("Morang"),
            LocationRecord::new("4", "Camp")
                .with_municipality("Letang")
                .with_district("Morang"),
            LocationRecord::new("5", "Depot")
                .with_municipality("Dharan")
                .with_district("Sunsari"),
            LocationRecord::new("6", "Lost")
                .with_municipality("Zzznonexistentplace"),
        ]
    }

    #[test]
    fn test_national_view_places_every_record() {
        let view = build_map_view(
            &test_records(),
            &test_features(),
            &ViewScope::National,
            &RecordFilter::default(),
            &MatchParams::default(),
            LatLonBounds::nepal(),
        );
        assert_eq!(
            MatchSummary {
                total: 6,
                exact: 1,
                municipality: 3,
                district: 1,
                unmapped: 1
            },
            view.summary
        );
        assert_eq!(4, view.markers.len());
        let biratnagar = view
            .markers
            .iter()
            .find(|marker| marker.label == "Biratnagar")
            .unwrap();
        assert_eq!(2, biratnagar.count);
        assert_eq!(vec!["1", "2"], biratnagar.member_ids());
        assert!(view
            .markers
            .iter()
            .any(|marker| marker.label == "Morang (General Area)"));

        assert_eq!(6, view.annotations.len());
        assert_eq!(RecordStatus::Unmapped, view.annotations[5].status);
        assert_eq!(LatLonBounds::nepal(), view.bounds);
    }

    #[test]
    fn test_district_scope_limits_records() {
        let scope = ViewScope::District {
            district: "Sunsari".to_string(),
        };
        let view = build_map_view(
            &test_records(),
            &test_features(),
            &scope,
            &RecordFilter::default(),
            &MatchParams::default(),
            LatLonBounds::nepal(),
        );
        assert_eq!(1, view.summary.total);
        assert_eq!(1, view.markers.len());
        assert_eq!("Dharan", view.markers[0].label);
    }

    #[test]
    fn test_search_combines_with_scope() {
        let scope = ViewScope::District {
            district: "Morang".to_string(),
        };
        let filter = RecordFilter {
            search: Some("clinic".to_string()),
            ..RecordFilter::default()
        };
        let view = build_map_view(
            &test_records(),
            &test_features(),
            &scope,
            &filter,
            &MatchParams::default(),
            LatLonBounds::nepal(),
        );
        assert_eq!(1, view.annotations.len());
        assert_eq!("2", view.annotations[0].id);
        assert_eq!(RecordStatus::MunicipalityMatched, view.annotations[0].status);
    }

    #[test]
    fn test_scope_overrides_conflicting_filter_district() {
        let scope = ViewScope::District {
            district: "Sunsari".to_string(),
        };
        let filter = RecordFilter {
            district: Some("Morang".to_string()),
            search: Some("depot".to_string()),
            ..RecordFilter::default()
        };
        let view = build_map_view(
            &test_records(),
            &test_features(),
            &scope,
            &filter,
            &MatchParams::default(),
            LatLonBounds::nepal(),
        );
        let ids: Vec<&str> = view
            .annotations
            .iter()
            .map(|annotation| annotation.id.as_str())
            .collect();
        assert_eq!(vec!["5"], ids);
        assert_eq!("Dharan", view.markers[0].label);
    }

    #[test]
    fn test_without_boundaries_only_exact_records_are_placed() {
        let view = build_map_view(
            &test_records(),
            &[],
            &ViewScope::National,
            &RecordFilter::default(),
            &MatchParams::default(),
            LatLonBounds::nepal(),
        );
        assert_eq!(1, view.markers.len());
        assert_eq!(1, view.summary.exact);
        assert_eq!(5, view.summary.unmapped);
        assert_eq!(LatLonBounds::nepal(), view.bounds);
    }
}

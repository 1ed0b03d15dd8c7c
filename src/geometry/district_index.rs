use std::collections::HashMap;

use crate::{
    geofile::feature::BoundaryFeature,
    matching::normalize::{normalize_place, normalize_strict},
};

use super::{
    centroid::{centroid, mean_point},
    primitives::LatLon,
};

/// Aggregate position of all boundary features sharing a district.
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictCenter {
    /// Strict-normalized district name.
    pub district_key: String,
    /// Unweighted mean of the member features' centroids.
    pub center: LatLon,
    /// District name as spelled by the first member feature.
    pub display_name: String,
}

/// District centers keyed by strict-normalized district name. Entries keep the order in which
/// their district first appeared in the boundary dataset.
#[derive(Debug, Clone, Default)]
pub struct DistrictIndex {
    centers: Vec<DistrictCenter>,
    by_key: HashMap<String, usize>,
}

impl DistrictIndex {
    /// Group `features` by strict-normalized district name and average each group's centroids.
    /// Features whose district name normalizes to nothing are ignored.
    pub fn build(features: &[BoundaryFeature], fallback_point: LatLon) -> Self {
        let mut members: Vec<(String, String, Vec<LatLon>)> = Vec::new();
        let mut by_key: HashMap<String, usize> = HashMap::new();
        for feature in features {
            let district_key = normalize_strict(&feature.district_name);
            if district_key.is_empty() {
                continue;
            }
            let point = centroid(feature.geometry.as_ref(), fallback_point);
            match by_key.get(&district_key) {
                Some(&index) => members[index].2.push(point),
                None => {
                    by_key.insert(district_key.clone(), members.len());
                    members.push((
                        district_key,
                        feature.district_name.trim().to_string(),
                        vec![point],
                    ));
                }
            }
        }

        let centers: Vec<DistrictCenter> = members
            .into_iter()
            .map(|(district_key, display_name, points)| DistrictCenter {
                center: mean_point(&points).unwrap_or(fallback_point),
                district_key,
                display_name,
            })
            .collect();
        log::debug!("Built {} district centers", centers.len());
        Self { centers, by_key }
    }

    pub fn len(&self) -> usize {
        self.centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    pub fn centers(&self) -> &[DistrictCenter] {
        &self.centers
    }

    /// Exact lookup by an already strict-normalized key.
    pub fn get(&self, district_key: &str) -> Option<&DistrictCenter> {
        self.by_key
            .get(district_key)
            .map(|&index| &self.centers[index])
    }

    /// Resolve free district text. The strict-normalized text is looked up exactly first; when
    /// that misses, the suffix-stripped text is compared against suffix-stripped district keys so
    /// that "Kathmandu District" still finds "Kathmandu".
    pub fn lookup(&self, district_text: &str) -> Option<&DistrictCenter> {
        let strict_key = normalize_strict(district_text);
        if strict_key.is_empty() {
            return None;
        }
        if let Some(center) = self.get(&strict_key) {
            return Some(center);
        }
        let place_key = normalize_place(district_text);
        if place_key.is_empty() {
            return None;
        }
        self.centers
            .iter()
            .find(|center| normalize_place(&center.district_key) == place_key)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    use crate::{geofile::feature::BoundaryFeature, geometry::primitives::LatLon};

    use super::DistrictIndex;

    const FALLBACK: LatLon = LatLon {
        latitude: 28.39,
        longitude: 84.12,
    };

    /// Closed triangle whose vertex mean is exactly `(lon, lat)`.
    fn triangle_around(lon: f64, lat: f64) -> geo::Polygon {
        geo::Polygon::new(
            vec![(lon, lat), (lon - 0.1, lat - 0.1), (lon + 0.1, lat - 0.1), (lon, lat + 0.2)]
                .into(),
            vec![],
        )
    }

    fn test_features() -> Vec<BoundaryFeature> {
        vec![
            BoundaryFeature::municipality("1", "Kathmandu", "Kathmandu Metropolitan City")
                .with_geometry(triangle_around(85.3, 27.7)),
            BoundaryFeature::municipality("2", "Lalitpur", "Lalitpur Metropolitan City")
                .with_geometry(triangle_around(85.32, 27.67)),
            BoundaryFeature::municipality("3", "KATHMANDU ", "Kirtipur Municipality")
                .with_geometry(triangle_around(85.28, 27.66)),
            BoundaryFeature::district("4", "Morang"),
        ]
    }

    #[test]
    fn test_build_groups_by_strict_district_name() {
        let index = DistrictIndex::build(&test_features(), FALLBACK);
        assert_eq!(3, index.len());
        let keys: Vec<&str> = index
            .centers()
            .iter()
            .map(|center| center.district_key.as_str())
            .collect();
        assert_eq!(vec!["kathmandu", "lalitpur", "morang"], keys);

        let kathmandu = index.get("kathmandu").unwrap();
        assert_eq!("Kathmandu", kathmandu.display_name);
        assert_abs_diff_eq!(kathmandu.center.latitude, (27.7 + 27.66) / 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(kathmandu.center.longitude, (85.3 + 85.28) / 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_feature_without_geometry_contributes_fallback_point() {
        let index = DistrictIndex::build(&test_features(), FALLBACK);
        assert_eq!(FALLBACK, index.get("morang").unwrap().center);
    }

    #[rstest]
    #[case("Kathmandu", Some("kathmandu"))]
    #[case("kathmandu district", Some("kathmandu"))]
    #[case("LALIT-PUR", Some("lalitpur"))]
    #[case("Jhapa", None)]
    #[case("", None)]
    #[case("District", None)]
    fn test_lookup(#[case] district_text: &str, #[case] expected_key: Option<&str>) {
        let index = DistrictIndex::build(&test_features(), FALLBACK);
        assert_eq!(
            expected_key,
            index
                .lookup(district_text)
                .map(|center| center.district_key.as_str())
        );
    }

    #[test]
    fn test_empty_dataset_builds_empty_index() {
        let index = DistrictIndex::build(&[], FALLBACK);
        assert!(index.is_empty());
        assert!(index.lookup("Kathmandu").is_none());
    }
}

use super::primitives::LatLon;

/// Mean of the exterior ring vertices (closing vertex included) of a polygon, or of the first
/// polygon of a multipolygon. Anything else yields `fallback`.
pub fn centroid(geometry: Option<&geo::Geometry>, fallback: LatLon) -> LatLon {
    let exterior = match geometry {
        Some(geo::Geometry::Polygon(polygon)) => Some(polygon.exterior()),
        Some(geo::Geometry::MultiPolygon(multi_polygon)) => {
            multi_polygon.0.first().map(|polygon| polygon.exterior())
        }
        _ => None,
    };
    exterior
        .and_then(ring_mean)
        .filter(LatLon::is_finite)
        .unwrap_or(fallback)
}

fn ring_mean(ring: &geo::LineString) -> Option<LatLon> {
    let count = ring.0.len();
    if count == 0 {
        return None;
    }
    let (sum_x, sum_y) = ring
        .coords()
        .fold((0.0, 0.0), |(x, y), coord| (x + coord.x, y + coord.y));
    Some(LatLon::from(geo::Coord {
        x: sum_x / count as f64,
        y: sum_y / count as f64,
    }))
}

/// Arithmetic mean of a set of points, `None` when empty.
pub fn mean_point<'a>(points: impl IntoIterator<Item = &'a LatLon>) -> Option<LatLon> {
    let mut count = 0usize;
    let mut latitude = 0.0;
    let mut longitude = 0.0;
    for point in points {
        count += 1;
        latitude += point.latitude;
        longitude += point.longitude;
    }
    if count == 0 {
        return None;
    }
    Some(LatLon::new(latitude / count as f64, longitude / count as f64))
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    use super::{centroid, mean_point, LatLon};

    const FALLBACK: LatLon = LatLon {
        latitude: 28.39,
        longitude: 84.12,
    };

    fn square(min_x: f64, min_y: f64, size: f64) -> geo::Polygon {
        geo::Polygon::new(
            vec![
                (min_x, min_y),
                (min_x + size, min_y),
                (min_x + size, min_y + size),
                (min_x, min_y + size),
                (min_x, min_y),
            ]
            .into(),
            vec![],
        )
    }

    #[test]
    fn test_centroid_swaps_lon_lat_to_lat_lon() {
        // GeoJSON order: x = longitude, y = latitude.
        let polygon = geo::Polygon::new(
            vec![(85.2, 27.6), (85.4, 27.6), (85.4, 27.8), (85.2, 27.8), (85.3, 27.7)].into(),
            vec![],
        );
        // The ring is not closed, geo closes it by repeating (85.2, 27.6).
        let result = centroid(Some(&geo::Geometry::Polygon(polygon)), FALLBACK);
        assert_abs_diff_eq!(result.latitude, (27.6 * 3.0 + 27.8 * 2.0 + 27.7) / 6.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.longitude, (85.2 * 3.0 + 85.4 * 2.0 + 85.3) / 6.0, epsilon = 1e-9);
        assert!(result.latitude < 30.0 && result.longitude > 80.0);
    }

    #[test]
    fn test_centroid_of_closed_square_includes_closing_vertex() {
        let result = centroid(Some(&square(85.0, 27.0, 1.0).into()), FALLBACK);
        assert_abs_diff_eq!(result.latitude, 27.4, epsilon = 1e-9);
        assert_abs_diff_eq!(result.longitude, 85.4, epsilon = 1e-9);
    }

    #[test]
    fn test_centroid_ignores_interior_rings() {
        let outer = square(85.0, 27.0, 1.0);
        let with_hole = geo::Polygon::new(
            outer.exterior().clone(),
            vec![square(85.1, 27.1, 0.1).exterior().clone()],
        );
        assert_eq!(
            centroid(Some(&outer.into()), FALLBACK),
            centroid(Some(&with_hole.into()), FALLBACK)
        );
    }

    #[test]
    fn test_centroid_of_multi_polygon_uses_first_polygon_only() {
        let multi_polygon =
            geo::MultiPolygon(vec![square(85.0, 27.0, 1.0), square(87.0, 26.0, 1.0)]);
        let result = centroid(Some(&multi_polygon.into()), FALLBACK);
        assert_abs_diff_eq!(result.latitude, 27.4, epsilon = 1e-9);
        assert_abs_diff_eq!(result.longitude, 85.4, epsilon = 1e-9);
    }

    #[rstest]
    #[case(None)]
    #[case(Some(geo::Geometry::MultiPolygon(geo::MultiPolygon(vec![]))))]
    #[case(Some(geo::Geometry::Polygon(geo::Polygon::new(geo::LineString(vec![]), vec![]))))]
    #[case(Some(geo::Geometry::Point(geo::Point::new(85.3, 27.7))))]
    #[case(Some(geo::Geometry::Polygon(geo::Polygon::new(
        vec![(f64::NAN, 27.7), (85.3, 27.7), (85.4, 27.8)].into(),
        vec![],
    ))))]
    fn test_centroid_falls_back_on_degenerate_geometry(#[case] geometry: Option<geo::Geometry>) {
        assert_eq!(FALLBACK, centroid(geometry.as_ref(), FALLBACK));
    }

    #[test]
    fn test_mean_point() {
        let points = [LatLon::new(27.0, 85.0), LatLon::new(28.0, 86.0)];
        let mean = mean_point(&points).unwrap();
        assert_abs_diff_eq!(mean.latitude, 27.5);
        assert_abs_diff_eq!(mean.longitude, 85.5);
        assert_eq!(None, mean_point(&[]));
    }
}

use serde::{Deserialize, Serialize};

/// WGS84 position, latitude first. `geo` coordinates are `x = longitude`, `y = latitude`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatLon {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// Whether the position lies within the WGS84 degree ranges.
    pub fn is_valid_wgs84(&self) -> bool {
        self.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl From<geo::Coord> for LatLon {
    fn from(coord: geo::Coord) -> Self {
        Self::new(coord.y, coord.x)
    }
}

impl From<LatLon> for geo::Point {
    fn from(value: LatLon) -> Self {
        geo::Point::new(value.longitude, value.latitude)
    }
}

/// Axis-aligned viewport, given by its south-west and north-east corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLonBounds {
    pub south_west: LatLon,
    pub north_east: LatLon,
}

impl LatLonBounds {
    /// Default viewport covering Nepal.
    pub fn nepal() -> Self {
        Self {
            south_west: LatLon::new(26.347, 80.058),
            north_east: LatLon::new(30.447, 88.201),
        }
    }

    /// Smallest bounds containing both `self` and `other`.
    pub fn union(&self, other: &LatLonBounds) -> Self {
        Self {
            south_west: LatLon::new(
                self.south_west.latitude.min(other.south_west.latitude),
                self.south_west.longitude.min(other.south_west.longitude),
            ),
            north_east: LatLon::new(
                self.north_east.latitude.max(other.north_east.latitude),
                self.north_east.longitude.max(other.north_east.longitude),
            ),
        }
    }
}

impl Default for LatLonBounds {
    fn default() -> Self {
        Self::nepal()
    }
}

impl From<geo::Rect> for LatLonBounds {
    fn from(rect: geo::Rect) -> Self {
        Self {
            south_west: rect.min().into(),
            north_east: rect.max().into(),
        }
    }
}

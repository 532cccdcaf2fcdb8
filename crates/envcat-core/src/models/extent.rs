use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::{LATITUDE_RANGE, LONGITUDE_RANGE};

/// Geographic bounding box in decimal degrees.
///
/// `west > east` is legal and means the box crosses the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpatialExtent {
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
}

impl SpatialExtent {
    pub fn new(west: f64, east: f64, south: f64, north: f64) -> Self {
        Self {
            west,
            east,
            south,
            north,
        }
    }

    /// Validate and normalize a candidate extent.
    ///
    /// Longitudes must be finite and inside [-180, 180]; latitudes must be
    /// finite and are clamped to [-90, 90]. Returns `None` when the extent
    /// cannot be represented.
    pub fn validated(self) -> Option<Self> {
        let (lon_min, lon_max) = LONGITUDE_RANGE;
        let (lat_min, lat_max) = LATITUDE_RANGE;
        let lon_ok = |v: f64| v.is_finite() && (lon_min..=lon_max).contains(&v);
        if !lon_ok(self.west) || !lon_ok(self.east) {
            return None;
        }
        if !self.south.is_finite() || !self.north.is_finite() {
            return None;
        }
        Some(Self {
            south: self.south.clamp(lat_min, lat_max),
            north: self.north.clamp(lat_min, lat_max),
            ..self
        })
    }

    pub fn crosses_antimeridian(&self) -> bool {
        self.west > self.east
    }

    /// Longitude spans covered by this box, split at the antimeridian.
    fn longitude_spans(&self) -> Vec<(f64, f64)> {
        if self.crosses_antimeridian() {
            vec![(self.west, LONGITUDE_RANGE.1), (LONGITUDE_RANGE.0, self.east)]
        } else {
            vec![(self.west, self.east)]
        }
    }

    /// Closed-interval intersection test, antimeridian aware.
    pub fn intersects(&self, other: &SpatialExtent) -> bool {
        let (s_lo, s_hi) = (self.south.min(self.north), self.south.max(self.north));
        let (o_lo, o_hi) = (other.south.min(other.north), other.south.max(other.north));
        if s_hi < o_lo || o_hi < s_lo {
            return false;
        }
        self.longitude_spans().iter().any(|&(a_lo, a_hi)| {
            other
                .longitude_spans()
                .iter()
                .any(|&(b_lo, b_hi)| a_lo <= b_hi && b_lo <= a_hi)
        })
    }
}

/// Temporal coverage. Either end may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalExtent {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl TemporalExtent {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Start after end. A data-quality problem, not a rejection reason.
    pub fn is_inverted(&self) -> bool {
        matches!((self.start, self.end), (Some(s), Some(e)) if s > e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latitudes_are_clamped() {
        let e = SpatialExtent::new(-8.0, 2.0, -95.0, 91.5).validated().unwrap();
        assert_eq!(e.south, -90.0);
        assert_eq!(e.north, 90.0);
    }

    #[test]
    fn out_of_range_longitude_is_rejected() {
        assert!(SpatialExtent::new(-190.0, 2.0, 50.0, 60.0).validated().is_none());
        assert!(SpatialExtent::new(f64::NAN, 2.0, 50.0, 60.0).validated().is_none());
    }

    #[test]
    fn west_greater_than_east_is_kept() {
        let e = SpatialExtent::new(170.0, -170.0, -20.0, 20.0).validated().unwrap();
        assert!(e.crosses_antimeridian());
    }

    #[test]
    fn antimeridian_box_intersects_both_sides() {
        let pacific = SpatialExtent::new(170.0, -170.0, -20.0, 20.0);
        let east_side = SpatialExtent::new(175.0, 179.0, 0.0, 5.0);
        let west_side = SpatialExtent::new(-179.0, -175.0, 0.0, 5.0);
        let atlantic = SpatialExtent::new(-40.0, -20.0, 0.0, 5.0);
        assert!(pacific.intersects(&east_side));
        assert!(pacific.intersects(&west_side));
        assert!(!pacific.intersects(&atlantic));
    }

    #[test]
    fn touching_edges_intersect() {
        let a = SpatialExtent::new(0.0, 1.0, 50.0, 51.0);
        let b = SpatialExtent::new(1.0, 2.0, 51.0, 52.0);
        assert!(a.intersects(&b));
    }

    #[test]
    fn disjoint_latitudes_do_not_intersect() {
        let a = SpatialExtent::new(-8.0, 2.0, 49.0, 61.0);
        let b = SpatialExtent::new(-8.0, 2.0, -10.0, 0.0);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn inverted_temporal_extent_is_detected() {
        let d = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok();
        assert!(TemporalExtent::new(d("2020-01-01"), d("2019-01-01")).is_inverted());
        assert!(!TemporalExtent::new(d("2019-01-01"), None).is_inverted());
    }
}

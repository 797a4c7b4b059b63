use std::{fmt, str::FromStr};

use itertools::Itertools;
use thiserror::Error;

const LAT_DEG_MIN: f64 = -90.0;
const LAT_DEG_MAX: f64 = 90.0;
const LNG_DEG_MIN: f64 = -180.0;
const LNG_DEG_MAX: f64 = 180.0;

/// A geographical position in WGS84 degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MapPoint {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapPointError {
    #[error("latitude out of range")]
    Latitude,
    #[error("longitude out of range")]
    Longitude,
    #[error("unparsable coordinate")]
    Parse,
}

impl MapPoint {
    pub fn from_lat_lng_deg<LAT: Into<f64>, LNG: Into<f64>>(lat: LAT, lng: LNG) -> Self {
        let res = Self {
            lat: lat.into(),
            lng: lng.into(),
        };
        debug_assert!(res.is_valid());
        res
    }

    pub fn try_from_lat_lng_deg<LAT: Into<f64>, LNG: Into<f64>>(
        lat: LAT,
        lng: LNG,
    ) -> Result<Self, MapPointError> {
        let lat = lat.into();
        let lng = lng.into();
        if !is_valid_lat(lat) {
            return Err(MapPointError::Latitude);
        }
        if !is_valid_lng(lng) {
            return Err(MapPointError::Longitude);
        }
        Ok(Self { lat, lng })
    }

    pub const fn lat(self) -> f64 {
        self.lat
    }

    pub const fn lng(self) -> f64 {
        self.lng
    }

    pub fn is_valid(self) -> bool {
        is_valid_lat(self.lat) && is_valid_lng(self.lng)
    }

    pub fn to_lat_lng_deg(self) -> (f64, f64) {
        (self.lat, self.lng)
    }

    pub fn to_lat_lng_rad(self) -> (f64, f64) {
        (self.lat.to_radians(), self.lng.to_radians())
    }
}

fn is_valid_lat(lat: f64) -> bool {
    (LAT_DEG_MIN..=LAT_DEG_MAX).contains(&lat)
}

fn is_valid_lng(lng: f64) -> bool {
    (LNG_DEG_MIN..=LNG_DEG_MAX).contains(&lng)
}

impl fmt::Display for MapPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

impl FromStr for MapPoint {
    type Err = MapPointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = s
            .split(',')
            .map(str::trim)
            .collect_tuple()
            .ok_or(MapPointError::Parse)?;
        let lat = lat.parse::<f64>().map_err(|_| MapPointError::Parse)?;
        let lng = lng.parse::<f64>().map_err(|_| MapPointError::Parse)?;
        Self::try_from_lat_lng_deg(lat, lng)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Distance(pub f64);

impl Distance {
    pub const fn infinite() -> Self {
        Self(f64::INFINITY)
    }

    pub const fn from_meters(meters: f64) -> Self {
        Self(meters)
    }

    pub const fn to_meters(self) -> f64 {
        self.0
    }

    pub fn is_valid(self) -> bool {
        self.0 >= 0.0
    }
}

pub const MEAN_EARTH_RADIUS: Distance = Distance::from_meters(6_371_200.0);

impl MapPoint {
    /// Calculate the great-circle distance on the surface
    /// of the earth using a special case of the Vincenty
    /// formula for numerical accuracy.
    /// Reference: https://en.wikipedia.org/wiki/Great-circle_distance
    pub fn distance(p1: MapPoint, p2: MapPoint) -> Option<Distance> {
        if !p1.is_valid() || !p2.is_valid() {
            return None;
        }
        Some(Distance::from_meters(great_circle_distance_m(
            p1.lat, p1.lng, p2.lat, p2.lng,
        )))
    }
}

/// Great-circle distance in meters between two positions given in degrees.
///
/// Also registered as a scalar SQL function by the storage layer, so both
/// sides always agree on the exact value.
pub fn great_circle_distance_m(lat1_deg: f64, lng1_deg: f64, lat2_deg: f64, lng2_deg: f64) -> f64 {
    // Canonical argument order keeps the result bit-for-bit symmetric
    let ((lat1_deg, lng1_deg), (lat2_deg, lng2_deg)) =
        if (lat1_deg, lng1_deg) <= (lat2_deg, lng2_deg) {
            ((lat1_deg, lng1_deg), (lat2_deg, lng2_deg))
        } else {
            ((lat2_deg, lng2_deg), (lat1_deg, lng1_deg))
        };
    let (lat1_rad, lng1_rad) = (lat1_deg.to_radians(), lng1_deg.to_radians());
    let (lat2_rad, lng2_rad) = (lat2_deg.to_radians(), lng2_deg.to_radians());

    let (lat1_sin, lat1_cos) = (lat1_rad.sin(), lat1_rad.cos());
    let (lat2_sin, lat2_cos) = (lat2_rad.sin(), lat2_rad.cos());

    let dlng = (lng1_rad - lng2_rad).abs();
    let (dlng_sin, dlng_cos) = (dlng.sin(), dlng.cos());

    let nom1 = lat2_cos * dlng_sin;
    let nom2 = lat1_cos * lat2_sin - lat1_sin * lat2_cos * dlng_cos;

    let nom = (nom1 * nom1 + nom2 * nom2).sqrt();
    let denom = lat1_sin * lat2_sin + lat1_cos * lat2_cos * dlng_cos;

    MEAN_EARTH_RADIUS.to_meters() * nom.atan2(denom)
}

/// An axis-aligned bounding box.
///
/// If the south-west longitude is greater than the north-east
/// longitude the box wraps around the antimeridian.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MapBbox {
    sw: MapPoint,
    ne: MapPoint,
}

impl MapBbox {
    pub const fn new(sw: MapPoint, ne: MapPoint) -> Self {
        Self { sw, ne }
    }

    /// The smallest box that encloses the circle with the given
    /// radius around `center`.
    pub fn around(center: MapPoint, radius: Distance) -> Self {
        debug_assert!(center.is_valid());
        debug_assert!(radius.is_valid());
        // Angular radius
        let delta = radius.to_meters() / MEAN_EARTH_RADIUS.to_meters();
        let dlat_deg = delta.to_degrees();
        let sw_lat = (center.lat - dlat_deg).max(LAT_DEG_MIN);
        let ne_lat = (center.lat + dlat_deg).min(LAT_DEG_MAX);
        let touches_pole = sw_lat <= LAT_DEG_MIN || ne_lat >= LAT_DEG_MAX;
        let lat_cos = center.lat.to_radians().cos();
        let delta_sin = delta.min(std::f64::consts::FRAC_PI_2).sin();
        // The meridians tangent to the circle are at asin(sin δ / cos φ),
        // which is wider than δ / cos φ.
        let dlng_deg = if touches_pole || delta_sin >= lat_cos {
            LNG_DEG_MAX
        } else {
            (delta_sin / lat_cos).asin().to_degrees()
        };
        let (sw_lng, ne_lng) = if dlng_deg >= LNG_DEG_MAX {
            (LNG_DEG_MIN, LNG_DEG_MAX)
        } else {
            let mut sw_lng = center.lng - dlng_deg;
            if sw_lng < LNG_DEG_MIN {
                // wrap around
                sw_lng += LNG_DEG_MAX - LNG_DEG_MIN;
            }
            let mut ne_lng = center.lng + dlng_deg;
            if ne_lng > LNG_DEG_MAX {
                // wrap around
                ne_lng -= LNG_DEG_MAX - LNG_DEG_MIN;
            }
            (sw_lng, ne_lng)
        };
        let bbox = Self::new(
            MapPoint::from_lat_lng_deg(sw_lat, sw_lng),
            MapPoint::from_lat_lng_deg(ne_lat, ne_lng),
        );
        debug_assert!(bbox.is_valid());
        bbox
    }

    pub const fn south_west(&self) -> MapPoint {
        self.sw
    }

    pub const fn north_east(&self) -> MapPoint {
        self.ne
    }

    pub fn is_valid(&self) -> bool {
        self.sw.is_valid() && self.ne.is_valid() && self.sw.lat <= self.ne.lat
    }

    pub fn wraps_antimeridian(&self) -> bool {
        self.sw.lng > self.ne.lng
    }

    pub fn spans_all_longitudes(&self) -> bool {
        self.sw.lng <= LNG_DEG_MIN && self.ne.lng >= LNG_DEG_MAX
    }

    pub fn contains_point(&self, pt: MapPoint) -> bool {
        debug_assert!(self.is_valid());
        debug_assert!(pt.is_valid());
        if pt.lat < self.sw.lat || pt.lat > self.ne.lat {
            return false;
        }
        if self.wraps_antimeridian() {
            // inverse (exclusive)
            !(pt.lng > self.ne.lng && pt.lng < self.sw.lng)
        } else {
            // regular (inclusive)
            pt.lng >= self.sw.lng && pt.lng <= self.ne.lng
        }
    }
}

impl fmt::Display for MapBbox {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{},{}", self.sw, self.ne)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reject_out_of_range_coordinates() {
        assert_eq!(
            Err(MapPointError::Latitude),
            MapPoint::try_from_lat_lng_deg(90.5, 0.0)
        );
        assert_eq!(
            Err(MapPointError::Longitude),
            MapPoint::try_from_lat_lng_deg(0.0, -180.1)
        );
        assert!(MapPoint::try_from_lat_lng_deg(-90.0, 180.0).is_ok());
    }

    #[test]
    fn parse_map_point() {
        let pt: MapPoint = "35.6812, 139.7671".parse().unwrap();
        assert_eq!((35.6812, 139.7671), pt.to_lat_lng_deg());
        assert_eq!(Err(MapPointError::Parse), "35.6".parse::<MapPoint>());
    }

    #[test]
    fn no_distance() {
        let p1 = MapPoint::from_lat_lng_deg(0.0, 0.0);
        assert!(MapPoint::distance(p1, p1).unwrap().to_meters() < 0.000001);

        let p1 = MapPoint::from_lat_lng_deg(-15.0, -180.0);
        let p2 = MapPoint::from_lat_lng_deg(-15.0, 180.0);
        assert!(MapPoint::distance(p1, p2).unwrap().to_meters() < 0.000001);
    }

    #[test]
    fn real_distance() {
        let tokyo_station = MapPoint::from_lat_lng_deg(35.6812, 139.7671);
        let shinjuku_station = MapPoint::from_lat_lng_deg(35.6896, 139.7006);
        let d = MapPoint::distance(tokyo_station, shinjuku_station).unwrap();
        assert!(d > Distance::from_meters(6_000.0));
        assert!(d < Distance::from_meters(6_200.0));

        let new_york = MapPoint::from_lat_lng_deg(40.714268, -74.005974);
        let sidney = MapPoint::from_lat_lng_deg(-33.867138, 151.207108);
        let d = MapPoint::distance(new_york, sidney).unwrap();
        assert!(d > Distance::from_meters(15_985_000.0));
        assert!(d < Distance::from_meters(15_995_000.0));
    }

    #[test]
    fn symmetric_distance() {
        let a = MapPoint::from_lat_lng_deg(80.0, 0.0);
        let b = MapPoint::from_lat_lng_deg(90.0, 20.0);
        assert_eq!(
            MapPoint::distance(a, b).unwrap(),
            MapPoint::distance(b, a).unwrap()
        );
    }

    #[test]
    fn bbox_around_encloses_circle() {
        let center = MapPoint::from_lat_lng_deg(35.6812, 139.7671);
        let radius = Distance::from_meters(3_000.0);
        let bbox = MapBbox::around(center, radius);
        assert!(!bbox.wraps_antimeridian());
        assert!(bbox.contains_point(center));
        // Points exactly on the circle in all four directions
        let north = MapPoint::from_lat_lng_deg(35.6812 + 0.0269, 139.7671);
        assert!(MapPoint::distance(center, north).unwrap() < radius);
        assert!(bbox.contains_point(north));
        let east = MapPoint::from_lat_lng_deg(35.6812, 139.7671 + 0.0330);
        assert!(MapPoint::distance(center, east).unwrap() < radius);
        assert!(bbox.contains_point(east));
        let far = MapPoint::from_lat_lng_deg(35.6812, 139.7671 + 0.05);
        assert!(!bbox.contains_point(far));
    }

    #[test]
    fn bbox_around_wraps_antimeridian() {
        let center = MapPoint::from_lat_lng_deg(-17.0, 179.99);
        let bbox = MapBbox::around(center, Distance::from_meters(10_000.0));
        assert!(bbox.wraps_antimeridian());
        assert!(bbox.contains_point(MapPoint::from_lat_lng_deg(-17.0, -179.98)));
        assert!(bbox.contains_point(MapPoint::from_lat_lng_deg(-17.0, 179.95)));
        assert!(!bbox.contains_point(MapPoint::from_lat_lng_deg(-17.0, 0.0)));
    }

    #[test]
    fn bbox_around_high_latitude_encloses_circle() {
        let center = MapPoint::from_lat_lng_deg(89.5, 0.0);
        let radius = Distance::from_meters(30_000.0);
        let bbox = MapBbox::around(center, radius);
        assert!(!bbox.spans_all_longitudes());
        let edge = MapPoint::from_lat_lng_deg(89.58, 32.0);
        assert!(MapPoint::distance(center, edge).unwrap() < radius);
        assert!(bbox.contains_point(edge));
        assert!(!bbox.contains_point(MapPoint::from_lat_lng_deg(89.58, 40.0)));
    }

    #[test]
    fn bbox_around_pole_spans_all_longitudes() {
        let center = MapPoint::from_lat_lng_deg(89.99, 10.0);
        let bbox = MapBbox::around(center, Distance::from_meters(30_000.0));
        assert!(bbox.spans_all_longitudes());
        assert!(bbox.contains_point(MapPoint::from_lat_lng_deg(89.9, -170.0)));
    }
}

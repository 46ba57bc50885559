use itertools::Itertools;
use std::{fmt, num::ParseFloatError, str::FromStr};
use thiserror::Error;

const LAT_DEG_MAX: f64 = 90.0;
const LAT_DEG_MIN: f64 = -90.0;
const LNG_DEG_MAX: f64 = 180.0;
const LNG_DEG_MIN: f64 = -180.0;

/// A geographical position in decimal degrees (WGS84).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

impl Coordinate {
    pub fn from_lat_lng_deg<LAT: Into<f64>, LNG: Into<f64>>(lat: LAT, lng: LNG) -> Self {
        let (lat, lng) = (lat.into(), lng.into());
        debug_assert!((LAT_DEG_MIN..=LAT_DEG_MAX).contains(&lat));
        debug_assert!((LNG_DEG_MIN..=LNG_DEG_MAX).contains(&lng));
        Self { lat, lng }
    }

    pub fn try_from_lat_lng_deg<LAT: Into<f64>, LNG: Into<f64>>(
        lat: LAT,
        lng: LNG,
    ) -> Option<Self> {
        let (lat, lng) = (lat.into(), lng.into());
        if (LAT_DEG_MIN..=LAT_DEG_MAX).contains(&lat) && (LNG_DEG_MIN..=LNG_DEG_MAX).contains(&lng)
        {
            Some(Self { lat, lng })
        } else {
            None
        }
    }

    pub const fn lat(self) -> f64 {
        self.lat
    }

    pub const fn lng(self) -> f64 {
        self.lng
    }

    pub const fn to_lat_lng_deg(self) -> (f64, f64) {
        (self.lat, self.lng)
    }

    pub fn to_lat_lng_rad(self) -> (f64, f64) {
        (self.lat.to_radians(), self.lng.to_radians())
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseCoordinateError {
    #[error("Expected 'lat,lng' but got '{0}'")]
    Format(String),
    #[error("Invalid number: {0}")]
    Number(#[from] ParseFloatError),
    #[error("Invalid latitude degrees: {0}")]
    Latitude(f64),
    #[error("Invalid longitude degrees: {0}")]
    Longitude(f64),
}

impl FromStr for Coordinate {
    type Err = ParseCoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((lat_deg_str, lng_deg_str)) = s.split(',').collect_tuple() else {
            return Err(ParseCoordinateError::Format(s.to_string()));
        };
        let lat_deg = lat_deg_str.trim().parse::<f64>()?;
        let lng_deg = lng_deg_str.trim().parse::<f64>()?;
        if !(LAT_DEG_MIN..=LAT_DEG_MAX).contains(&lat_deg) {
            return Err(ParseCoordinateError::Latitude(lat_deg));
        }
        if !(LNG_DEG_MIN..=LNG_DEG_MAX).contains(&lng_deg) {
            return Err(ParseCoordinateError::Longitude(lng_deg));
        }
        Ok(Self::from_lat_lng_deg(lat_deg, lng_deg))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Distance(pub f64);

impl Distance {
    pub const fn from_meters(meters: f64) -> Self {
        Self(meters)
    }

    pub const fn to_meters(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:.0} m", self.0)
    }
}

const MEAN_EARTH_RADIUS: Distance = Distance::from_meters(6_371_200.0);

impl Coordinate {
    /// Calculate the great-circle distance on the surface
    /// of the earth using a special case of the Vincenty
    /// formula for numerical accuracy.
    /// Reference: https://en.wikipedia.org/wiki/Great-circle_distance
    ///
    /// The result does not depend on the order of the arguments.
    pub fn distance(p1: Coordinate, p2: Coordinate) -> Distance {
        let (p1, p2) = if (p1.lat, p1.lng) <= (p2.lat, p2.lng) {
            (p1, p2)
        } else {
            (p2, p1)
        };
        let (lat1_rad, lng1_rad) = p1.to_lat_lng_rad();
        let (lat2_rad, lng2_rad) = p2.to_lat_lng_rad();

        let (lat1_sin, lat1_cos) = (lat1_rad.sin(), lat1_rad.cos());
        let (lat2_sin, lat2_cos) = (lat2_rad.sin(), lat2_rad.cos());

        let dlng = (lng1_rad - lng2_rad).abs();
        let (dlng_sin, dlng_cos) = (dlng.sin(), dlng.cos());

        let nom1 = lat2_cos * dlng_sin;
        let nom2 = lat1_cos * lat2_sin - lat1_sin * lat2_cos * dlng_cos;

        let nom = (nom1 * nom1 + nom2 * nom2).sqrt();
        let denom = lat1_sin * lat2_sin + lat1_cos * lat2_cos * dlng_cos;

        Distance::from_meters(MEAN_EARTH_RADIUS.to_meters() * nom.atan2(denom))
    }
}

/// Extent of a map region in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateSpan {
    pub lat_delta: f64,
    pub lng_delta: f64,
}

impl CoordinateSpan {
    pub const fn new(lat_delta: f64, lng_delta: f64) -> Self {
        Self {
            lat_delta,
            lng_delta,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapRegion {
    pub center: Coordinate,
    pub span: CoordinateSpan,
}

impl MapRegion {
    pub const fn new(center: Coordinate, span: CoordinateSpan) -> Self {
        Self { center, span }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapBbox {
    sw: Coordinate,
    ne: Coordinate,
}

impl MapBbox {
    pub const fn new(sw: Coordinate, ne: Coordinate) -> Self {
        Self { sw, ne }
    }

    /// The smallest box enclosing all points, `None` if there are none.
    ///
    /// Boxes crossing the antimeridian are not detected.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coordinate>,
    {
        points.into_iter().fold(None, |bbox, pt| {
            let bbox = bbox.unwrap_or(Self::new(pt, pt));
            Some(Self::new(
                Coordinate::from_lat_lng_deg(bbox.sw.lat.min(pt.lat), bbox.sw.lng.min(pt.lng)),
                Coordinate::from_lat_lng_deg(bbox.ne.lat.max(pt.lat), bbox.ne.lng.max(pt.lng)),
            ))
        })
    }

    pub const fn south_west(&self) -> Coordinate {
        self.sw
    }

    pub const fn north_east(&self) -> Coordinate {
        self.ne
    }

    pub fn center(&self) -> Coordinate {
        let lat = (self.sw.lat + self.ne.lat) / 2.0;
        let lng = if self.sw.lng <= self.ne.lng {
            (self.sw.lng + self.ne.lng) / 2.0
        } else {
            // wrap around
            let lng = (self.sw.lng + self.ne.lng + 360.0) / 2.0;
            if lng > LNG_DEG_MAX {
                lng - 360.0
            } else {
                lng
            }
        };
        Coordinate::from_lat_lng_deg(lat, lng)
    }

    pub fn span(&self) -> CoordinateSpan {
        let lat_delta = self.ne.lat - self.sw.lat;
        let lng_delta = if self.sw.lng <= self.ne.lng {
            self.ne.lng - self.sw.lng
        } else {
            self.ne.lng - self.sw.lng + 360.0
        };
        CoordinateSpan::new(lat_delta, lng_delta)
    }
}

impl fmt::Display for MapBbox {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}", self.sw, self.ne)
    }
}

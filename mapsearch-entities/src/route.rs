use crate::geo::*;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportMode {
    #[default]
    Automobile,
    Walking,
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Self::Automobile => "automobile",
            Self::Walking => "walking",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub transport_mode: TransportMode,
    pub requests_alternate_routes: bool,
}

/// A single route alternative reported by a directions provider.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteCandidate {
    pub polyline: Vec<Coordinate>,
    pub distance: Distance,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
    pub polyline: Vec<Coordinate>,
    pub distance: Distance,
    pub bounding_region: MapBbox,
}

impl RouteResult {
    /// Returns `None` if the polyline is empty.
    pub fn from_candidate(candidate: RouteCandidate) -> Option<Self> {
        let RouteCandidate { polyline, distance } = candidate;
        let bounding_region = MapBbox::from_points(polyline.iter().copied())?;
        Some(Self {
            polyline,
            distance,
            bounding_region,
        })
    }

    /// The middle vertex of the polyline.
    pub fn label_anchor(&self) -> Coordinate {
        debug_assert!(!self.polyline.is_empty());
        self.polyline[self.polyline.len() / 2]
    }
}

use crate::{geo::*, time::*};

/// A single location reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationFix {
    pub coordinate: Coordinate,
    pub timestamp: Timestamp,
}

impl LocationFix {
    pub fn now(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            timestamp: Timestamp::now(),
        }
    }
}

/// Desired accuracy of location updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Accuracy {
    #[default]
    Best,
    NearestTenMeters,
    HundredMeters,
    Kilometer,
}

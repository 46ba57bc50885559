//! Concrete providers behind the gateway traits of `mapsearch-core`.

pub mod directions;
pub mod geocoding;
pub mod location;
pub mod map;

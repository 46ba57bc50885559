mod osrm;

pub use self::osrm::*;

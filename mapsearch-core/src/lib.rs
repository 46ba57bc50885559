pub mod gateways;
pub mod usecases;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

pub mod entities {
    pub use mapsearch_entities::{geo::*, location::*, map::*, route::*, search::*, time::*};
}

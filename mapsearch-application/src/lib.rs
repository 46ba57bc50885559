#[macro_use]
extern crate log;

mod controller;

pub mod prelude {
    pub use super::controller::*;
}

pub type Result<T> = std::result::Result<T, usecases::Error>;

pub(crate) use mapsearch_core::{entities::*, gateways, usecases};

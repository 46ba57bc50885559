mod compose_scene;
mod error;
mod plan_route;
mod resolve_address;
mod track_location;

pub use self::{
    compose_scene::*, error::Error, plan_route::*, resolve_address::*, track_location::*,
};

mod prelude {
    pub use super::error::Error;
    pub type Result<T> = std::result::Result<T, Error>;
    pub use crate::entities::*;
}

pub type Result<T> = std::result::Result<T, Error>;

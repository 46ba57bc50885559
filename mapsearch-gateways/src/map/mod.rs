mod console;
mod geojson;

pub use self::{console::*, geojson::*};

mod disabled;
mod fixed;
mod replay;

pub use self::{disabled::*, fixed::*, replay::*};

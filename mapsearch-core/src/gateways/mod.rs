use thiserror::Error;

pub mod directions;
pub mod geocode;
pub mod location;
pub mod map;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Permission denied")]
    PermissionDenied,
    #[error("{0}")]
    Provider(String),
}

use crate::gateways;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Access to the current location was denied")]
    PermissionDenied,
    #[error("No matching place found")]
    NotFound,
    #[error("The current location is not yet known")]
    PreconditionFailed,
    #[error("No route found")]
    NoRouteFound,
    #[error("Provider error: {0}")]
    ProviderError(String),
}

impl From<gateways::Error> for Error {
    fn from(err: gateways::Error) -> Self {
        match err {
            gateways::Error::PermissionDenied => Self::PermissionDenied,
            gateways::Error::Provider(msg) => Self::ProviderError(msg),
        }
    }
}

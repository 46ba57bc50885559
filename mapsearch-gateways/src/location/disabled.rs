use mapsearch_core::{
    entities::Accuracy,
    gateways::{
        location::{LocationService, LocationUpdates},
        Error,
    },
};

/// A location service that never grants access.
#[derive(Debug, Clone, Copy, Default)]
pub struct Disabled;

impl LocationService for Disabled {
    async fn request_authorization(&self) -> Result<(), Error> {
        log::debug!("Location services are disabled");
        Err(Error::PermissionDenied)
    }

    fn start_updating(&self, _: Accuracy) -> Result<LocationUpdates, Error> {
        Err(Error::PermissionDenied)
    }
}

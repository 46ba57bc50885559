use mapsearch_core::{
    entities::*,
    gateways::{
        location::{LocationService, LocationUpdates},
        Error,
    },
};
use tokio::sync::mpsc;

/// Reports a single, preconfigured position.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition {
    coordinate: Coordinate,
}

impl FixedPosition {
    pub const fn new(coordinate: Coordinate) -> Self {
        Self { coordinate }
    }
}

impl LocationService for FixedPosition {
    async fn request_authorization(&self) -> Result<(), Error> {
        Ok(())
    }

    fn start_updating(&self, _: Accuracy) -> Result<LocationUpdates, Error> {
        let (tx, rx) = mpsc::unbounded_channel();
        log::info!("Using fixed position {}", self.coordinate);
        // The receiver is still in scope
        let _ = tx.send(Ok(LocationFix::now(self.coordinate)));
        Ok(rx)
    }
}

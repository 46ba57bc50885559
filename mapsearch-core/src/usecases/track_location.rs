use std::sync::Arc;

use parking_lot::Mutex;
use tokio::{sync::watch, task::JoinHandle};

use super::prelude::*;
use crate::gateways::location::{LocationService, LocationUpdates};

type FixCell = watch::Sender<Option<LocationFix>>;

/// Keeps the most recent location fix.
///
/// The fix is only ever written by the update handler that is spawned
/// in [`LocationTracker::start`]; everybody else gets read access.
#[derive(Debug)]
pub struct LocationTracker {
    fix: Arc<FixCell>,
    accuracy: Accuracy,
    handler: Mutex<Option<JoinHandle<()>>>,
}

impl Default for LocationTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationTracker {
    pub fn new() -> Self {
        let (fix, _) = watch::channel(None);
        Self {
            fix: Arc::new(fix),
            accuracy: Accuracy::Best,
            handler: Mutex::new(None),
        }
    }

    /// Request a coarser accuracy than [`Accuracy::Best`].
    pub fn with_accuracy(mut self, accuracy: Accuracy) -> Self {
        self.accuracy = accuracy;
        self
    }

    /// Requests authorization and starts continuous updates.
    ///
    /// A previously started update handler is replaced.
    pub async fn start<S>(&self, service: &S) -> Result<()>
    where
        S: LocationService,
    {
        service.request_authorization().await.map_err(|err| {
            log::warn!("Location authorization failed: {err}");
            Error::from(err)
        })?;
        let updates = service.start_updating(self.accuracy).map_err(|err| {
            log::warn!("Could not start location updates: {err}");
            Error::from(err)
        })?;
        log::info!("Started location updates ({:?})", self.accuracy);
        let handler = tokio::spawn(handle_updates(Arc::clone(&self.fix), updates));
        if let Some(previous) = self.handler.lock().replace(handler) {
            previous.abort();
        }
        Ok(())
    }

    pub fn stop(&self) {
        if let Some(handler) = self.handler.lock().take() {
            log::info!("Stopped location updates");
            handler.abort();
        }
    }

    /// The last known fix or `None` before the first update arrived.
    pub fn current_fix(&self) -> Option<LocationFix> {
        *self.fix.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<LocationFix>> {
        self.fix.subscribe()
    }
}

impl Drop for LocationTracker {
    fn drop(&mut self) {
        if let Some(handler) = self.handler.get_mut().take() {
            handler.abort();
        }
    }
}

async fn handle_updates(fix: Arc<FixCell>, mut updates: LocationUpdates) {
    while let Some(event) = updates.recv().await {
        match event {
            Ok(new_fix) => {
                log::debug!(
                    "Location update at {}: {}",
                    new_fix.timestamp,
                    new_fix.coordinate
                );
                fix.send_replace(Some(new_fix));
            }
            Err(err) => {
                log::warn!("Location update failed: {err}");
            }
        }
    }
    log::debug!("Location updates ended");
}

use std::future::Future;

use tokio::sync::mpsc;

use super::Error;
use crate::entities::{Accuracy, LocationFix};

pub type LocationEvent = Result<LocationFix, Error>;

/// Unbounded stream of location events that lasts as long as the sender side.
pub type LocationUpdates = mpsc::UnboundedReceiver<LocationEvent>;

pub trait LocationService {
    fn request_authorization(&self) -> impl Future<Output = Result<(), Error>> + Send;

    /// Must be called from within a tokio runtime.
    fn start_updating(&self, accuracy: Accuracy) -> Result<LocationUpdates, Error>;
}

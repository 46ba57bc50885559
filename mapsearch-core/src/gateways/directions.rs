use std::future::Future;

use super::Error;
use crate::entities::{RouteCandidate, RouteRequest};

pub trait DirectionsGateway {
    /// Route alternatives in the order reported by the provider.
    ///
    /// An empty list means that the provider could not find any route.
    fn calculate(
        &self,
        request: &RouteRequest,
    ) -> impl Future<Output = Result<Vec<RouteCandidate>, Error>> + Send;
}

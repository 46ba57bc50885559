use std::future::Future;

use super::Error;
use crate::entities::PlaceCandidate;

pub trait GeoCodingGateway {
    /// Candidates in the order reported by the provider.
    fn forward(&self, query: &str)
        -> impl Future<Output = Result<Vec<PlaceCandidate>, Error>> + Send;
}

use super::prelude::*;
use crate::gateways::geocode::GeoCodingGateway;

/// Turns free-text queries into places.
///
/// If the provider reports several candidates the first one wins.
#[derive(Debug)]
pub struct AddressResolver<G> {
    gateway: G,
}

impl<G> AddressResolver<G>
where
    G: GeoCodingGateway,
{
    pub const fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub const fn gateway(&self) -> &G {
        &self.gateway
    }

    pub async fn resolve(&self, query: &SearchQuery) -> Result<ResolvedPlace> {
        if query.is_empty() {
            return Err(Error::NotFound);
        }
        let text = query.trimmed();
        let candidates = self.gateway.forward(text).await.map_err(|err| {
            log::warn!("Failed to resolve '{text}': {err}");
            Error::from(err)
        })?;
        let Some(PlaceCandidate { coordinate, label }) = candidates.into_iter().next() else {
            log::debug!("No place found for '{text}'");
            return Err(Error::NotFound);
        };
        log::debug!("Resolved '{text}': {coordinate}");
        let label = label.unwrap_or_else(|| text.to_string());
        Ok(ResolvedPlace { coordinate, label })
    }
}

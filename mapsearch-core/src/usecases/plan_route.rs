use super::prelude::*;
use crate::gateways::directions::DirectionsGateway;

/// Requests routes from a directions provider.
///
/// Alternatives are requested but the first one is always taken.
#[derive(Debug)]
pub struct RoutePlanner<D> {
    gateway: D,
    transport_mode: TransportMode,
}

impl<D> RoutePlanner<D>
where
    D: DirectionsGateway,
{
    pub const fn new(gateway: D, transport_mode: TransportMode) -> Self {
        Self {
            gateway,
            transport_mode,
        }
    }

    pub const fn gateway(&self) -> &D {
        &self.gateway
    }

    pub async fn plan(
        &self,
        origin: Option<Coordinate>,
        destination: Coordinate,
    ) -> Result<RouteResult> {
        let Some(origin) = origin else {
            return Err(Error::PreconditionFailed);
        };
        let request = RouteRequest {
            origin,
            destination,
            transport_mode: self.transport_mode,
            requests_alternate_routes: true,
        };
        let candidates = self.gateway.calculate(&request).await.map_err(|err| {
            log::warn!("Failed to calculate route from {origin} to {destination}: {err}");
            Error::from(err)
        })?;
        log::debug!(
            "Received {} route alternative(s) from {origin} to {destination} ({} apart)",
            candidates.len(),
            Coordinate::distance(origin, destination)
        );
        candidates
            .into_iter()
            .next()
            .and_then(RouteResult::from_candidate)
            .ok_or(Error::NoRouteFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{gateways, mocks::MockDirections};

    fn pos(lat: f64, lng: f64) -> Coordinate {
        Coordinate::from_lat_lng_deg(lat, lng)
    }

    fn candidate(polyline: Vec<Coordinate>, meters: f64) -> RouteCandidate {
        RouteCandidate {
            polyline,
            distance: Distance::from_meters(meters),
        }
    }

    #[tokio::test]
    async fn missing_origin() {
        let planner = RoutePlanner::new(MockDirections::default(), TransportMode::Automobile);
        let res = planner.plan(None, pos(1.0, 1.0)).await;
        assert_eq!(res, Err(Error::PreconditionFailed));
        assert!(planner.gateway().requests().is_empty());
    }

    #[tokio::test]
    async fn request_alternates_but_take_the_first_route() {
        let destination = pos(1.0, 1.0);
        let directions = MockDirections::default().with_candidates(
            destination,
            vec![
                candidate(vec![pos(0.0, 0.0), pos(0.5, 0.0), pos(1.0, 1.0)], 200_000.0),
                candidate(vec![pos(0.0, 0.0), pos(1.0, 1.0)], 150_000.0),
            ],
        );
        let planner = RoutePlanner::new(directions, TransportMode::Automobile);
        let route = planner
            .plan(Some(pos(0.0, 0.0)), destination)
            .await
            .unwrap();
        assert_eq!(route.distance, Distance::from_meters(200_000.0));
        assert_eq!(route.polyline.len(), 3);
        assert_eq!(route.label_anchor(), pos(0.5, 0.0));

        let requests = planner.gateway().requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].requests_alternate_routes);
        assert_eq!(requests[0].transport_mode, TransportMode::Automobile);
        assert_eq!(requests[0].origin, pos(0.0, 0.0));
        assert_eq!(requests[0].destination, destination);
    }

    #[tokio::test]
    async fn no_route() {
        let destination = pos(1.0, 1.0);
        let directions = MockDirections::default().with_candidates(destination, vec![]);
        let planner = RoutePlanner::new(directions, TransportMode::Walking);
        let res = planner.plan(Some(pos(0.0, 0.0)), destination).await;
        assert_eq!(res, Err(Error::NoRouteFound));
    }

    #[tokio::test]
    async fn first_route_without_geometry() {
        let destination = pos(1.0, 1.0);
        let directions = MockDirections::default().with_candidates(
            destination,
            vec![
                candidate(vec![], 10.0),
                candidate(vec![pos(0.0, 0.0), pos(1.0, 1.0)], 20.0),
            ],
        );
        let planner = RoutePlanner::new(directions, TransportMode::Automobile);
        let res = planner.plan(Some(pos(0.0, 0.0)), destination).await;
        assert_eq!(res, Err(Error::NoRouteFound));
    }

    #[tokio::test]
    async fn provider_error() {
        let destination = pos(1.0, 1.0);
        let directions = MockDirections::default()
            .with_error(destination, gateways::Error::Provider("timeout".into()));
        let planner = RoutePlanner::new(directions, TransportMode::Automobile);
        let res = planner.plan(Some(pos(0.0, 0.0)), destination).await;
        assert_eq!(res, Err(Error::ProviderError("timeout".into())));
    }

    #[tokio::test]
    async fn same_origin_and_destination() {
        let here = pos(37.422, -122.084);
        let planner = RoutePlanner::new(MockDirections::default(), TransportMode::Automobile);
        let route = planner.plan(Some(here), here).await.unwrap();
        assert!(route.distance.to_meters() < 1.0);
        assert!(route.polyline.contains(&route.label_anchor()));
    }
}

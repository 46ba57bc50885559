use std::time::Duration;

use mapsearch_core::{
    entities::*,
    gateways::{directions::DirectionsGateway, Error},
};
use serde::Deserialize;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Directions based on the route service of an OSRM server.
#[derive(Debug, Clone)]
pub struct Osrm {
    client: reqwest::Client,
    base_url: String,
}

impl Osrm {
    /// Requests that take longer than `timeout` fail with a provider error.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn route_url(&self, request: &RouteRequest) -> String {
        let RouteRequest {
            origin,
            destination,
            transport_mode,
            requests_alternate_routes,
        } = request;
        format!(
            "{base_url}/route/v1/{profile}/{from_lng},{from_lat};{to_lng},{to_lat}\
             ?overview=full&geometries=geojson&alternatives={requests_alternate_routes}",
            base_url = self.base_url,
            profile = profile(*transport_mode),
            from_lng = origin.lng(),
            from_lat = origin.lat(),
            to_lng = destination.lng(),
            to_lat = destination.lat(),
        )
    }
}

const fn profile(mode: TransportMode) -> &'static str {
    match mode {
        TransportMode::Automobile => "driving",
        TransportMode::Walking => "foot",
    }
}

#[derive(Debug, Deserialize)]
struct RouteResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    /// Meters
    distance: f64,
    geometry: LineString,
}

#[derive(Debug, Deserialize)]
struct LineString {
    /// `[lng, lat]` pairs
    coordinates: Vec<(f64, f64)>,
}

impl From<Route> for RouteCandidate {
    fn from(from: Route) -> Self {
        let polyline = from
            .geometry
            .coordinates
            .into_iter()
            .filter_map(|(lng, lat)| Coordinate::try_from_lat_lng_deg(lat, lng))
            .collect();
        Self {
            polyline,
            distance: Distance::from_meters(from.distance),
        }
    }
}

fn candidates_from_response(response: RouteResponse) -> Result<Vec<RouteCandidate>, Error> {
    let RouteResponse {
        code,
        message,
        routes,
    } = response;
    match code.as_str() {
        "Ok" => Ok(routes.into_iter().map(RouteCandidate::from).collect()),
        "NoRoute" | "NoSegment" => {
            log::debug!("OSRM found no route: {}", message.unwrap_or(code));
            Ok(vec![])
        }
        _ => Err(Error::Provider(match message {
            Some(message) => format!("{code}: {message}"),
            None => code,
        })),
    }
}

impl DirectionsGateway for Osrm {
    async fn calculate(&self, request: &RouteRequest) -> Result<Vec<RouteCandidate>, Error> {
        let url = self.route_url(request);
        log::debug!("Requesting route from OSRM: {url}");
        let response = self.client.get(&url).send().await.map_err(|err| {
            log::warn!("OSRM request failed: {err}");
            Error::Provider(err.to_string())
        })?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| Error::Provider(err.to_string()))?;
        // Errors like `NoRoute` are reported with a JSON body and a 4xx status
        let response: RouteResponse = serde_json::from_str(&body).map_err(|err| {
            if status.is_success() {
                Error::Provider(format!("Invalid OSRM response: {err}"))
            } else {
                Error::Provider(format!("OSRM request failed with status {status}"))
            }
        })?;
        candidates_from_response(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Vec<RouteCandidate>, Error> {
        candidates_from_response(serde_json::from_str(json).unwrap())
    }

    fn berlin_to_munich() -> RouteRequest {
        RouteRequest {
            origin: Coordinate::from_lat_lng_deg(52.5, 13.4),
            destination: Coordinate::from_lat_lng_deg(48.1, 11.6),
            transport_mode: TransportMode::Automobile,
            requests_alternate_routes: true,
        }
    }

    #[test]
    fn build_route_url() {
        let osrm = Osrm::new("http://localhost:5000/", DEFAULT_TIMEOUT).unwrap();
        let request = berlin_to_munich();
        assert_eq!(
            osrm.route_url(&request),
            "http://localhost:5000/route/v1/driving/13.4,52.5;11.6,48.1\
             ?overview=full&geometries=geojson&alternatives=true"
        );
        let request = RouteRequest {
            transport_mode: TransportMode::Walking,
            requests_alternate_routes: false,
            ..request
        };
        assert!(osrm.route_url(&request).contains("/route/v1/foot/"));
        assert!(osrm.route_url(&request).ends_with("alternatives=false"));
    }

    #[tokio::test]
    async fn give_up_on_unresponsive_server() {
        // Connections are queued by the OS but never answered
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let osrm = Osrm::new(format!("http://{addr}"), Duration::from_millis(200)).unwrap();
        let result = tokio::time::timeout(
            Duration::from_secs(5),
            osrm.calculate(&berlin_to_munich()),
        )
        .await
        .expect("The request timeout applies");
        assert!(matches!(result, Err(Error::Provider(_))));
        drop(listener);
    }

    #[test]
    fn parse_routes_in_provider_order() {
        let candidates = parse(
            r#"{
              "code": "Ok",
              "routes": [
                {
                  "distance": 1520.3,
                  "duration": 240.1,
                  "geometry": { "type": "LineString", "coordinates": [[13.4, 52.5], [13.41, 52.51], [13.42, 52.52]] }
                },
                {
                  "distance": 1700.0,
                  "duration": 250.0,
                  "geometry": { "type": "LineString", "coordinates": [[13.4, 52.5], [13.42, 52.52]] }
                }
              ],
              "waypoints": []
            }"#,
        )
        .unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].distance, Distance::from_meters(1520.3));
        assert_eq!(candidates[0].polyline.len(), 3);
        assert_eq!(
            candidates[0].polyline[1],
            Coordinate::from_lat_lng_deg(52.51, 13.41)
        );
        assert_eq!(candidates[1].polyline.len(), 2);
    }

    #[test]
    fn no_route_is_an_empty_list() {
        let candidates = parse(r#"{"code":"NoRoute","message":"Impossible route between points"}"#);
        assert_eq!(candidates, Ok(vec![]));
        let candidates = parse(r#"{"code":"NoSegment"}"#);
        assert_eq!(candidates, Ok(vec![]));
    }

    #[test]
    fn other_codes_are_provider_errors() {
        let err = parse(r#"{"code":"InvalidQuery","message":"Query string malformed"}"#).unwrap_err();
        assert_eq!(
            err,
            Error::Provider("InvalidQuery: Query string malformed".into())
        );
        let err = parse(r#"{"code":"TooBig"}"#).unwrap_err();
        assert_eq!(err, Error::Provider("TooBig".into()));
    }
}

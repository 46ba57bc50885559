use std::{fmt, sync::Arc};

use ::geocoding::{
    opencage::OpencageResponse,
    openstreetmap::{OpenstreetmapParams, OpenstreetmapResponse},
    GeocodingError, InputBounds, Opencage, Openstreetmap, Point,
};
use mapsearch_core::{
    entities::*,
    gateways::{geocode::GeoCodingGateway, Error},
};

/// A location found by a forward geocoding provider.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedPoint {
    /// (x: lng, y: lat)
    pub point: Point<f64>,
    pub name: Option<String>,
}

/// Blocking forward geocoding that keeps the display name of each result.
pub trait NamedForward {
    fn forward_named(&self, query: &str) -> Result<Vec<NamedPoint>, GeocodingError>;
}

impl NamedForward for Openstreetmap {
    fn forward_named(&self, query: &str) -> Result<Vec<NamedPoint>, GeocodingError> {
        let params = OpenstreetmapParams::<f64>::new(query);
        let response: OpenstreetmapResponse<f64> = self.forward_full(&params)?;
        Ok(response
            .features
            .into_iter()
            .map(|feature| {
                let (lng, lat) = feature.geometry.coordinates;
                NamedPoint {
                    point: Point::new(lng, lat),
                    name: Some(feature.properties.display_name),
                }
            })
            .collect())
    }
}

impl NamedForward for Opencage<'_> {
    fn forward_named(&self, query: &str) -> Result<Vec<NamedPoint>, GeocodingError> {
        let response: OpencageResponse<f64> =
            self.forward_full(query, None::<InputBounds<f64>>)?;
        Ok(response
            .results
            .into_iter()
            .filter_map(|result| {
                let lat = result.geometry.get("lat").copied()?;
                let lng = result.geometry.get("lng").copied()?;
                Some(NamedPoint {
                    point: Point::new(lng, lat),
                    name: Some(result.formatted),
                })
            })
            .collect())
    }
}

/// Adapts a blocking forward geocoding provider.
///
/// Each request runs on the blocking thread pool of the tokio runtime.
pub struct ForwardGeocoder<P> {
    name: &'static str,
    provider: Arc<P>,
}

impl<P> ForwardGeocoder<P> {
    pub fn new(name: &'static str, provider: P) -> Self {
        Self {
            name,
            provider: Arc::new(provider),
        }
    }
}

impl<P> fmt::Debug for ForwardGeocoder<P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ForwardGeocoder")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

fn to_candidate(named: NamedPoint) -> Option<PlaceCandidate> {
    let NamedPoint { point, name } = named;
    let coordinate = Coordinate::try_from_lat_lng_deg(point.y(), point.x());
    if coordinate.is_none() {
        log::warn!("Ignoring invalid geocoding result {point:?}");
    }
    let label = name.filter(|name| !name.trim().is_empty());
    coordinate.map(|coordinate| PlaceCandidate { coordinate, label })
}

impl<P> GeoCodingGateway for ForwardGeocoder<P>
where
    P: NamedForward + Send + Sync + 'static,
{
    async fn forward(&self, query: &str) -> Result<Vec<PlaceCandidate>, Error> {
        let provider = Arc::clone(&self.provider);
        let address = query.to_owned();
        let result = tokio::task::spawn_blocking(move || provider.forward_named(&address))
            .await
            .map_err(|err| Error::Provider(err.to_string()))?;
        match result {
            Ok(points) => {
                log::debug!(
                    "{} resolved '{query}' to {} location(s)",
                    self.name,
                    points.len()
                );
                Ok(points.into_iter().filter_map(to_candidate).collect())
            }
            Err(err) => {
                log::warn!("Failed to resolve '{query}' with {}: {err}", self.name);
                Err(Error::Provider(err.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeProvider(Vec<(f64, f64, Option<&'static str>)>);

    impl NamedForward for FakeProvider {
        fn forward_named(&self, _: &str) -> Result<Vec<NamedPoint>, GeocodingError> {
            Ok(self
                .0
                .iter()
                .map(|(lng, lat, name)| NamedPoint {
                    point: Point::new(*lng, *lat),
                    name: name.map(ToString::to_string),
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn keep_provider_order() {
        let geocoder = ForwardGeocoder::new(
            "fake",
            FakeProvider(vec![(-122.0841, 37.422, None), (13.4, 52.5, None)]),
        );
        let candidates = geocoder.forward("anything").await.unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(
            candidates[0].coordinate,
            Coordinate::from_lat_lng_deg(37.422, -122.0841)
        );
        assert_eq!(
            candidates[1].coordinate,
            Coordinate::from_lat_lng_deg(52.5, 13.4)
        );
    }

    #[tokio::test]
    async fn keep_display_names() {
        let geocoder = ForwardGeocoder::new(
            "fake",
            FakeProvider(vec![
                (-122.0841, 37.422, Some("Google Building 41, Mountain View")),
                (13.4, 52.5, Some("  ")),
                (9.18, 48.77, None),
            ]),
        );
        let candidates = geocoder.forward("anything").await.unwrap();
        assert_eq!(
            candidates[0].label.as_deref(),
            Some("Google Building 41, Mountain View")
        );
        assert!(candidates[1].label.is_none());
        assert!(candidates[2].label.is_none());
    }

    #[tokio::test]
    async fn skip_invalid_points() {
        let geocoder = ForwardGeocoder::new(
            "fake",
            FakeProvider(vec![(10.0, 95.0, Some("Beyond the pole")), (10.0, 45.0, None)]),
        );
        let candidates = geocoder.forward("anything").await.unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].coordinate.lat(), 45.0);
    }

    #[tokio::test]
    async fn no_results() {
        let geocoder = ForwardGeocoder::new("fake", FakeProvider(vec![]));
        assert!(geocoder.forward("nowhere").await.unwrap().is_empty());
    }
}

//! Hand-written gateway doubles for tests.

use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::{
    entities::*,
    gateways::{
        directions::DirectionsGateway,
        geocode::GeoCodingGateway,
        location::{LocationEvent, LocationService, LocationUpdates},
        map::MapRenderer,
        Error,
    },
};

#[derive(Debug, Clone)]
struct Answer<T> {
    result: Result<T, Error>,
    delay: Duration,
}

/// Answers queries from a lookup table; unknown queries yield no candidates.
#[derive(Debug, Default)]
pub struct MockGeoCoding {
    answers: HashMap<String, Answer<Vec<PlaceCandidate>>>,
    queries: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl MockGeoCoding {
    pub fn with_candidates(mut self, query: &str, candidates: Vec<PlaceCandidate>) -> Self {
        self.answers.insert(
            query.to_string(),
            Answer {
                result: Ok(candidates),
                delay: Duration::ZERO,
            },
        );
        self
    }

    pub fn with_place(self, query: &str, coordinate: Coordinate) -> Self {
        self.with_candidates(
            query,
            vec![PlaceCandidate {
                coordinate,
                label: None,
            }],
        )
    }

    pub fn with_error(mut self, query: &str, err: Error) -> Self {
        self.answers.insert(
            query.to_string(),
            Answer {
                result: Err(err),
                delay: Duration::ZERO,
            },
        );
        self
    }

    /// Delays the answer for `query` (requires a tokio runtime with time enabled).
    pub fn with_delay(mut self, query: &str, delay: Duration) -> Self {
        if let Some(answer) = self.answers.get_mut(query) {
            answer.delay = delay;
        }
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }
}

impl GeoCodingGateway for MockGeoCoding {
    async fn forward(&self, query: &str) -> Result<Vec<PlaceCandidate>, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().push(query.to_string());
        let Some(answer) = self.answers.get(query).cloned() else {
            return Ok(vec![]);
        };
        if !answer.delay.is_zero() {
            tokio::time::sleep(answer.delay).await;
        }
        answer.result
    }
}

/// Answers route requests by destination; unknown destinations
/// get a straight line from origin to destination.
#[derive(Debug, Default)]
pub struct MockDirections {
    answers: Vec<(Coordinate, Answer<Vec<RouteCandidate>>)>,
    requests: Mutex<Vec<RouteRequest>>,
}

impl MockDirections {
    pub fn with_candidates(
        mut self,
        destination: Coordinate,
        candidates: Vec<RouteCandidate>,
    ) -> Self {
        self.answers.push((
            destination,
            Answer {
                result: Ok(candidates),
                delay: Duration::ZERO,
            },
        ));
        self
    }

    pub fn with_error(mut self, destination: Coordinate, err: Error) -> Self {
        self.answers.push((
            destination,
            Answer {
                result: Err(err),
                delay: Duration::ZERO,
            },
        ));
        self
    }

    /// Delays the answer for `destination` (requires a tokio runtime with time enabled).
    pub fn with_delay(mut self, destination: Coordinate, delay: Duration) -> Self {
        for (_, answer) in self.answers.iter_mut().filter(|(d, _)| *d == destination) {
            answer.delay = delay;
        }
        self
    }

    pub fn requests(&self) -> Vec<RouteRequest> {
        self.requests.lock().clone()
    }
}

impl DirectionsGateway for MockDirections {
    async fn calculate(&self, request: &RouteRequest) -> Result<Vec<RouteCandidate>, Error> {
        self.requests.lock().push(request.clone());
        let answer = self
            .answers
            .iter()
            .find(|(destination, _)| *destination == request.destination)
            .map(|(_, answer)| answer.clone());
        let Some(answer) = answer else {
            let straight_line = RouteCandidate {
                polyline: vec![request.origin, request.destination],
                distance: Coordinate::distance(request.origin, request.destination),
            };
            return Ok(vec![straight_line]);
        };
        if !answer.delay.is_zero() {
            tokio::time::sleep(answer.delay).await;
        }
        answer.result
    }
}

/// Location events are pushed manually by the test.
#[derive(Debug, Default)]
pub struct MockLocationService {
    denied: bool,
    sender: Mutex<Option<mpsc::UnboundedSender<LocationEvent>>>,
    accuracy: Mutex<Option<Accuracy>>,
}

impl MockLocationService {
    pub fn denied() -> Self {
        Self {
            denied: true,
            ..Default::default()
        }
    }

    pub fn push(&self, event: LocationEvent) {
        if let Some(sender) = &*self.sender.lock() {
            // The receiver is gone if the tracker has been stopped
            let _ = sender.send(event);
        }
    }

    pub fn requested_accuracy(&self) -> Option<Accuracy> {
        *self.accuracy.lock()
    }
}

impl LocationService for MockLocationService {
    async fn request_authorization(&self) -> Result<(), Error> {
        if self.denied {
            Err(Error::PermissionDenied)
        } else {
            Ok(())
        }
    }

    fn start_updating(&self, accuracy: Accuracy) -> Result<LocationUpdates, Error> {
        if self.denied {
            return Err(Error::PermissionDenied);
        }
        let (tx, rx) = mpsc::unbounded_channel();
        *self.sender.lock() = Some(tx);
        *self.accuracy.lock() = Some(accuracy);
        Ok(rx)
    }
}

/// Records every rendered scene.
#[derive(Debug, Default)]
pub struct MockRenderer {
    scenes: Mutex<Vec<(MapScene, bool)>>,
}

impl MockRenderer {
    pub fn render_count(&self) -> usize {
        self.scenes.lock().len()
    }

    pub fn last_scene(&self) -> Option<MapScene> {
        self.scenes.lock().last().map(|(scene, _)| scene.clone())
    }

    pub fn last_animated(&self) -> Option<bool> {
        self.scenes.lock().last().map(|(_, animated)| *animated)
    }
}

impl MapRenderer for MockRenderer {
    fn render(&self, scene: &MapScene, animated: bool) {
        self.scenes.lock().push((scene.clone(), animated));
    }
}

use std::{
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use parking_lot::Mutex;

use super::*;
use gateways::{
    directions::DirectionsGateway, geocode::GeoCodingGateway, location::LocationService,
    map::MapRenderer,
};
use usecases::{AddressResolver, Error, LocationTracker, RoutePlanner};

pub const NO_LOCATION_MESSAGE: &str = "Your location is not yet available";

/// Identifies one search-to-route lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Resolving(SessionId),
    Planning(SessionId),
    Displaying(SessionId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteSummary {
    pub session: SessionId,
    pub destination: ResolvedPlace,
    pub distance: Distance,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    Displayed(RouteSummary),
    /// A newer session was started before this one completed.
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerConfig {
    /// Size of the region shown around the current location.
    pub region_span: CoordinateSpan,
    pub transport_mode: TransportMode,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            region_span: CoordinateSpan::new(0.1, 0.1),
            transport_mode: TransportMode::Automobile,
        }
    }
}

#[derive(Debug, Default)]
struct State {
    phase: Phase,
    scene: MapScene,
}

/// Wires search submissions and location updates to the map.
///
/// Every non-empty submission starts a new session. Only the most recent
/// session may change the map; results of superseded sessions are dropped.
#[derive(Debug)]
pub struct MapSearchController<G, D, R> {
    tracker: Arc<LocationTracker>,
    resolver: AddressResolver<G>,
    planner: RoutePlanner<D>,
    renderer: R,
    config: ControllerConfig,
    latest_session: AtomicU64,
    state: Mutex<State>,
}

impl<G, D, R> MapSearchController<G, D, R>
where
    G: GeoCodingGateway,
    D: DirectionsGateway,
    R: MapRenderer,
{
    pub fn new(
        tracker: Arc<LocationTracker>,
        geocoding: G,
        directions: D,
        renderer: R,
        config: ControllerConfig,
    ) -> Self {
        Self {
            tracker,
            resolver: AddressResolver::new(geocoding),
            planner: RoutePlanner::new(directions, config.transport_mode),
            renderer,
            config,
            latest_session: AtomicU64::new(0),
            state: Mutex::new(State::default()),
        }
    }

    pub fn tracker(&self) -> &LocationTracker {
        &self.tracker
    }

    pub const fn resolver(&self) -> &AddressResolver<G> {
        &self.resolver
    }

    pub const fn planner(&self) -> &RoutePlanner<D> {
        &self.planner
    }

    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn phase(&self) -> Phase {
        self.state.lock().phase
    }

    pub fn scene(&self) -> MapScene {
        self.state.lock().scene.clone()
    }

    /// Starts the location tracker.
    ///
    /// If that fails the reason is shown as an error status.
    pub async fn start_tracking<S>(&self, service: &S) -> Result<()>
    where
        S: LocationService,
    {
        if let Err(err) = self.tracker.start(service).await {
            warn!("Location tracking is not available: {err}");
            let mut state = self.state.lock();
            state.scene = usecases::status_scene(&state.scene, Status::Error(err.to_string()));
            self.renderer.render(&state.scene, false);
            return Err(err);
        }
        Ok(())
    }

    pub async fn submit_search(&self, text: impl Into<String>) -> Result<SessionOutcome> {
        let query = SearchQuery::new(text);
        if query.is_empty() {
            let err = Error::NotFound;
            let mut state = self.state.lock();
            state.scene = usecases::status_scene(&state.scene, Status::Error(err.to_string()));
            self.renderer.render(&state.scene, false);
            return Err(err);
        }

        let session = self.begin_session();
        info!("Session {session}: searching for '{}'", query.trimmed());

        let place = match self.resolver.resolve(&query).await {
            Ok(place) => place,
            Err(err) => return self.fail(session, err),
        };
        if !self.advance(session, Phase::Planning(session)) {
            debug!("Session {session} was superseded while resolving");
            return Ok(SessionOutcome::Superseded);
        }

        let origin = self.tracker.current_fix().map(|fix| fix.coordinate);
        let route = match self.planner.plan(origin, place.coordinate).await {
            Ok(route) => route,
            Err(err) => return self.fail(session, err),
        };
        Ok(self.display(session, &query, place, &route))
    }

    /// Moves the map to the current location.
    ///
    /// Without a fix only an empty-state status is shown.
    pub fn center_on_me(&self) -> Result<MapRegion> {
        let mut state = self.state.lock();
        let Some(fix) = self.tracker.current_fix() else {
            debug!("Cannot center the map without a location fix");
            let status = Status::Info(NO_LOCATION_MESSAGE.to_string());
            state.scene = usecases::status_scene(&state.scene, status);
            self.renderer.render(&state.scene, false);
            return Err(Error::PreconditionFailed);
        };
        let (lat, lng) = fix.coordinate.to_lat_lng_deg();
        info!("Centering map on lat: {lat} - lng: {lng}");
        state.scene = usecases::centered_scene(&state.scene, &fix, self.config.region_span);
        self.renderer.render(&state.scene, true);
        Ok(usecases::region_around(
            fix.coordinate,
            self.config.region_span,
        ))
    }

    /// Moves the user location marker if it is displayed.
    pub fn location_changed(&self, fix: &LocationFix) {
        let mut state = self.state.lock();
        if !state.scene.shows_user_location {
            return;
        }
        state.scene.user_location = Some(fix.coordinate);
        self.renderer.render(&state.scene, false);
    }

    /// Forwards every new fix of the tracker to [`Self::location_changed`].
    ///
    /// Returns when the tracker is dropped.
    pub async fn follow_location(&self) {
        let mut fixes = self.tracker.subscribe();
        while fixes.changed().await.is_ok() {
            let fix = *fixes.borrow_and_update();
            if let Some(fix) = fix {
                self.location_changed(&fix);
            }
        }
    }

    fn begin_session(&self) -> SessionId {
        let mut state = self.state.lock();
        let session = SessionId(self.latest_session.fetch_add(1, Ordering::SeqCst) + 1);
        state.phase = Phase::Resolving(session);
        session
    }

    fn is_latest(&self, session: SessionId) -> bool {
        self.latest_session.load(Ordering::SeqCst) == session.0
    }

    fn advance(&self, session: SessionId, phase: Phase) -> bool {
        let mut state = self.state.lock();
        if !self.is_latest(session) {
            return false;
        }
        state.phase = phase;
        true
    }

    fn fail(&self, session: SessionId, err: Error) -> Result<SessionOutcome> {
        let mut state = self.state.lock();
        if !self.is_latest(session) {
            debug!("Ignoring failure of superseded session {session}: {err}");
            return Ok(SessionOutcome::Superseded);
        }
        warn!("Session {session} failed: {err}");
        state.phase = Phase::Idle;
        state.scene = usecases::status_scene(&state.scene, Status::Error(err.to_string()));
        self.renderer.render(&state.scene, false);
        Err(err)
    }

    fn display(
        &self,
        session: SessionId,
        query: &SearchQuery,
        destination: ResolvedPlace,
        route: &RouteResult,
    ) -> SessionOutcome {
        let mut state = self.state.lock();
        if !self.is_latest(session) {
            debug!("Session {session} was superseded while planning");
            return SessionOutcome::Superseded;
        }
        state.phase = Phase::Displaying(session);
        state.scene = usecases::route_scene(&state.scene, query, &destination, route);
        self.renderer.render(&state.scene, true);
        state.phase = Phase::Idle;
        info!(
            "Session {session}: route to '{}' ({})",
            destination.label, route.distance
        );
        SessionOutcome::Displayed(RouteSummary {
            session,
            destination,
            distance: route.distance,
        })
    }
}

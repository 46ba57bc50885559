use anyhow::Result;
use futures::stream::{FuturesUnordered, StreamExt as _};
use mapsearch_application::prelude::*;
use mapsearch_core::gateways::{
    directions::DirectionsGateway, geocode::GeoCodingGateway, map::MapRenderer,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt as _, BufReader};

const HELP: &str = "Enter an address to get directions, ':me' to show your location or ':quit' to exit.";

#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Search(&'a str),
    CenterOnMe,
    Quit,
}

impl<'a> Input<'a> {
    fn parse(line: &'a str) -> Self {
        match line.trim() {
            ":me" => Self::CenterOnMe,
            ":quit" | ":q" => Self::Quit,
            _ => Self::Search(line),
        }
    }
}

/// Reads one command per line from stdin until EOF or `:quit`.
///
/// Searches run concurrently with further input.
pub async fn run<G, D, R>(controller: &MapSearchController<G, D, R>) -> Result<()>
where
    G: GeoCodingGateway,
    D: DirectionsGateway,
    R: MapRenderer,
{
    println!("{HELP}");
    run_with_input(controller, BufReader::new(tokio::io::stdin())).await
}

/// Searches that are still running at EOF are awaited, `:quit` drops them.
async fn run_with_input<G, D, R, I>(controller: &MapSearchController<G, D, R>, input: I) -> Result<()>
where
    G: GeoCodingGateway,
    D: DirectionsGateway,
    R: MapRenderer,
    I: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut in_flight = FuturesUnordered::new();
    let follow_location = controller.follow_location();
    tokio::pin!(follow_location);
    let mut following = true;
    let mut input_closed = false;
    loop {
        if input_closed && in_flight.is_empty() {
            break;
        }
        tokio::select! {
            line = lines.next_line(), if !input_closed => {
                let Some(line) = line? else {
                    log::debug!("End of input with {} pending search(es)", in_flight.len());
                    input_closed = true;
                    continue;
                };
                match Input::parse(&line) {
                    Input::Quit => break,
                    Input::CenterOnMe => {
                        if let Err(err) = controller.center_on_me() {
                            log::debug!("Unable to center the map: {err}");
                        }
                    }
                    Input::Search(text) => {
                        in_flight.push(controller.submit_search(text.to_string()));
                    }
                }
            }
            Some(outcome) = in_flight.next(), if !in_flight.is_empty() => {
                log_outcome(outcome);
            }
            () = &mut follow_location, if following => {
                following = false;
            }
            else => break,
        }
    }
    Ok(())
}

fn log_outcome(outcome: mapsearch_application::Result<SessionOutcome>) {
    match outcome {
        Ok(SessionOutcome::Displayed(summary)) => {
            log::debug!("Session {} displayed", summary.session);
        }
        Ok(SessionOutcome::Superseded) => {}
        Err(err) => log::debug!("Search failed: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use mapsearch_core::{entities::*, mocks::*, usecases::LocationTracker};

    use super::*;

    type Controller = MapSearchController<MockGeoCoding, MockDirections, MockRenderer>;

    fn pos(lat: f64, lng: f64) -> Coordinate {
        Coordinate::from_lat_lng_deg(lat, lng)
    }

    async fn controller(service: &MockLocationService, geo: MockGeoCoding) -> Controller {
        let tracker = Arc::new(LocationTracker::new());
        tracker.start(service).await.unwrap();
        let mut fixes = tracker.subscribe();
        service.push(Ok(LocationFix::now(pos(0.0, 0.0))));
        fixes.changed().await.unwrap();
        MapSearchController::new(
            tracker,
            geo,
            MockDirections::default(),
            MockRenderer::default(),
            ControllerConfig::default(),
        )
    }

    #[test]
    fn parse_input() {
        assert_eq!(Input::parse(":me"), Input::CenterOnMe);
        assert_eq!(Input::parse("  :quit "), Input::Quit);
        assert_eq!(Input::parse(":q"), Input::Quit);
        assert_eq!(
            Input::parse("1600 Amphitheatre Parkway"),
            Input::Search("1600 Amphitheatre Parkway")
        );
        assert_eq!(Input::parse(""), Input::Search(""));
    }

    #[tokio::test(start_paused = true)]
    async fn finish_pending_searches_at_end_of_input() {
        let service = MockLocationService::default();
        let geo = MockGeoCoding::default()
            .with_place("Main Street", pos(1.0, 1.0))
            .with_delay("Main Street", Duration::from_millis(500));
        let ctrl = controller(&service, geo).await;

        run_with_input(&ctrl, "Main Street\n".as_bytes()).await.unwrap();

        assert_eq!(ctrl.renderer().render_count(), 1);
        let scene = ctrl.scene();
        assert_eq!(scene.annotations[0].title, "Main Street");
        assert_eq!(scene.overlays.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn quit_drops_pending_searches() {
        let service = MockLocationService::default();
        let geo = MockGeoCoding::default()
            .with_place("Main Street", pos(1.0, 1.0))
            .with_delay("Main Street", Duration::from_millis(500));
        let ctrl = controller(&service, geo).await;

        run_with_input(&ctrl, "Main Street\n:quit\n".as_bytes())
            .await
            .unwrap();

        assert_eq!(ctrl.renderer().render_count(), 0);
        assert!(ctrl.scene().annotations.is_empty());
    }

    #[tokio::test]
    async fn center_on_me_from_input() {
        let service = MockLocationService::default();
        let ctrl = controller(&service, MockGeoCoding::default()).await;

        run_with_input(&ctrl, ":me\n".as_bytes()).await.unwrap();

        let scene = ctrl.scene();
        assert!(scene.shows_user_location);
        assert_eq!(scene.user_location, Some(pos(0.0, 0.0)));
    }
}

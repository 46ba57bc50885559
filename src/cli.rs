use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Result;
use clap::{Parser, Subcommand};
use mapsearch_application::prelude::*;
use mapsearch_core::{
    entities::{Coordinate, TransportMode},
    usecases::LocationTracker,
};

use crate::{
    config::{Config, LocationSource},
    gateways, repl,
};

/// How long a one-shot search waits for the first location fix.
const FIRST_FIX_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Parser)]
#[command(author, version, about = "Search an address and show the route to it", long_about = None)]
struct Args {
    /// Configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Use a fixed current location
    #[arg(long, value_name = "LAT,LNG", allow_hyphen_values = true)]
    position: Option<Coordinate>,

    /// Replay a recorded track (JSON array of [lat, lng] pairs)
    #[arg(long, value_name = "FILE", conflicts_with = "position")]
    track: Option<PathBuf>,

    /// Also write the map into a GeoJSON file
    #[arg(long, value_name = "FILE")]
    geojson: Option<PathBuf>,

    /// Plan walking instead of driving directions
    #[arg(long)]
    walk: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search once, print the route and exit
    Search {
        /// The address to search for
        #[arg(required = true)]
        query: Vec<String>,
    },
}

fn apply_overrides(cfg: &mut Config, args: &Args) {
    if let Some(coordinate) = args.position {
        cfg.location.source = LocationSource::Fixed(coordinate);
    }
    if let Some(file) = &args.track {
        let interval = match cfg.location.source {
            LocationSource::Track { interval, .. } => interval,
            _ => Duration::from_secs(1),
        };
        cfg.location.source = LocationSource::Track {
            file: file.clone(),
            interval,
        };
    }
    if let Some(file) = &args.geojson {
        cfg.map.geojson_file = Some(file.clone());
    }
    if args.walk {
        cfg.directions.transport_mode = TransportMode::Walking;
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut cfg = Config::try_load_from_file_or_default(args.config.as_ref())?;
    apply_overrides(&mut cfg, &args);

    // The geocoding providers use blocking HTTP clients that
    // must be created and dropped outside of the async runtime.
    let location_service = gateways::location_service(&cfg.location.source)?;
    let controller = MapSearchController::new(
        Arc::new(LocationTracker::new().with_accuracy(cfg.location.accuracy)),
        gateways::geocoding_gateway(&cfg.geocoding),
        gateways::directions_gateway(&cfg.directions)?,
        gateways::map_renderer(&cfg.map),
        ControllerConfig {
            region_span: cfg.map.region_span,
            transport_mode: cfg.directions.transport_mode,
        },
    );

    let command = args.command;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async {
        let tracking = controller.start_tracking(&location_service).await.is_ok();
        let result = match command {
            Some(Command::Search { query }) => {
                if tracking {
                    wait_for_first_fix(controller.tracker()).await;
                }
                controller
                    .submit_search(query.join(" "))
                    .await
                    .map(drop)
                    .map_err(anyhow::Error::from)
            }
            None => repl::run(&controller).await,
        };
        controller.tracker().stop();
        result
    })
}

async fn wait_for_first_fix(tracker: &LocationTracker) {
    let mut fixes = tracker.subscribe();
    let first_fix = fixes.wait_for(Option::is_some);
    let waited = tokio::time::timeout(FIRST_FIX_TIMEOUT, first_fix)
        .await
        .map(|fix| fix.is_ok());
    match waited {
        Ok(true) => {}
        Ok(false) => log::warn!("Location updates stopped before the first fix"),
        Err(_) => log::warn!("No location fix within {FIRST_FIX_TIMEOUT:?}"),
    }
}

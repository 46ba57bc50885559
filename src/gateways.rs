use std::io;

use anyhow::{Context as _, Result};
use mapsearch_core::{
    entities::*,
    gateways::{
        geocode::GeoCodingGateway,
        location::{LocationService, LocationUpdates},
        map::MapRenderer,
        Error,
    },
};
use mapsearch_gateways::{
    directions::Osrm,
    geocoding::{self, ForwardGeocoder, Opencage, Openstreetmap},
    location::{Disabled, FixedPosition, TrackReplay},
    map::{ConsoleMap, GeoJsonFile},
};

use crate::config;

/// Must be called outside of the async runtime.
pub fn geocoding_gateway(cfg: &config::Geocoding) -> GeocodingGw {
    match cfg {
        config::Geocoding::Nominatim { endpoint } => {
            log::info!("Use Nominatim geocoding gateway");
            GeocodingGw::Nominatim(geocoding::nominatim(endpoint.as_deref()))
        }
        config::Geocoding::OpenCage { api_key } => {
            log::info!("Use OpenCage geocoding gateway");
            GeocodingGw::OpenCage(geocoding::opencage(api_key.clone()))
        }
    }
}

pub fn directions_gateway(cfg: &config::Directions) -> Result<Osrm> {
    log::info!("Use OSRM directions gateway ({})", cfg.osrm_base_url);
    Osrm::new(cfg.osrm_base_url.as_str(), cfg.osrm_timeout)
        .context("Unable to create the OSRM client")
}

pub fn location_service(cfg: &config::LocationSource) -> Result<LocationGw> {
    let service = match cfg {
        config::LocationSource::Fixed(coordinate) => {
            LocationGw::Fixed(FixedPosition::new(*coordinate))
        }
        config::LocationSource::Track { file, interval } => {
            let replay = TrackReplay::load(file, *interval)
                .with_context(|| format!("Unable to load track from {}", file.display()))?;
            log::info!("Replaying track from {}", file.display());
            LocationGw::Track(replay)
        }
        config::LocationSource::Disabled => {
            log::warn!("No location source configured");
            LocationGw::Disabled(Disabled)
        }
    };
    Ok(service)
}

pub fn map_renderer(cfg: &config::Map) -> MapGw {
    let geojson = cfg.geojson_file.as_ref().map(|path| {
        log::info!("Writing map scenes to {}", path.display());
        GeoJsonFile::new(path)
    });
    MapGw {
        console: ConsoleMap::stdout(),
        geojson,
    }
}

#[derive(Debug)]
pub enum GeocodingGw {
    Nominatim(ForwardGeocoder<Openstreetmap>),
    OpenCage(ForwardGeocoder<Opencage<'static>>),
}

impl GeoCodingGateway for GeocodingGw {
    async fn forward(&self, query: &str) -> Result<Vec<PlaceCandidate>, Error> {
        match self {
            Self::Nominatim(gw) => gw.forward(query).await,
            Self::OpenCage(gw) => gw.forward(query).await,
        }
    }
}

#[derive(Debug)]
pub enum LocationGw {
    Fixed(FixedPosition),
    Track(TrackReplay),
    Disabled(Disabled),
}

impl LocationService for LocationGw {
    async fn request_authorization(&self) -> Result<(), Error> {
        match self {
            Self::Fixed(gw) => gw.request_authorization().await,
            Self::Track(gw) => gw.request_authorization().await,
            Self::Disabled(gw) => gw.request_authorization().await,
        }
    }

    fn start_updating(&self, accuracy: Accuracy) -> Result<LocationUpdates, Error> {
        match self {
            Self::Fixed(gw) => gw.start_updating(accuracy),
            Self::Track(gw) => gw.start_updating(accuracy),
            Self::Disabled(gw) => gw.start_updating(accuracy),
        }
    }
}

/// Prints every scene and optionally mirrors it into a GeoJSON file.
#[derive(Debug)]
pub struct MapGw {
    console: ConsoleMap<io::Stdout>,
    geojson: Option<GeoJsonFile>,
}

impl MapRenderer for MapGw {
    fn render(&self, scene: &MapScene, animated: bool) {
        self.console.render(scene, animated);
        if let Some(geojson) = &self.geojson {
            geojson.render(scene, animated);
        }
    }
}

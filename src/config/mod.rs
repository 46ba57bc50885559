use anyhow::{anyhow, bail, Context as _, Result};
use mapsearch_core::entities::{Accuracy, Coordinate, CoordinateSpan, TransportMode};
use mapsearch_gateways::directions;
use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

mod raw;

const DEFAULT_CONFIG_FILE_NAME: &str = "mapsearch.toml";

const ENV_NAME_OPENCAGE_API_KEY: &str = "OPENCAGE_API_KEY";

const DEFAULT_REPLAY_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct Config {
    pub location: Location,
    pub geocoding: Geocoding,
    pub directions: Directions,
    pub map: Map,
}

impl Config {
    pub fn try_load_from_file_or_default<P: AsRef<Path>>(file_path: Option<P>) -> Result<Self> {
        let file_path: &Path = file_path.as_ref().map(|p| p.as_ref()).unwrap_or_else(|| {
            log::info!("No configuration file specified. load {DEFAULT_CONFIG_FILE_NAME}");
            Path::new(DEFAULT_CONFIG_FILE_NAME)
        });

        let raw_config = match fs::read_to_string(file_path) {
            Ok(cfg_string) => toml::from_str(&cfg_string)
                .with_context(|| format!("Invalid configuration in {}", file_path.display()))?,
            Err(err) => match err.kind() {
                ErrorKind::NotFound => {
                    log::info!(
                        "{} not found => load default configuration.",
                        file_path.display()
                    );
                    raw::Config::default()
                }
                _ => return Err(err.into()),
            },
        };
        let api_key = env::var(ENV_NAME_OPENCAGE_API_KEY).ok();
        Self::try_from_raw(raw_config, api_key)
    }

    fn try_from_raw(raw_config: raw::Config, opencage_api_key: Option<String>) -> Result<Self> {
        let mut cfg = Self::try_from(raw_config)?;
        if let Some(api_key) = opencage_api_key.filter(|key| !key.trim().is_empty()) {
            if let Geocoding::OpenCage { api_key: key } = &mut cfg.geocoding {
                *key = api_key;
            }
        }
        if let Geocoding::OpenCage { api_key } = &cfg.geocoding {
            if api_key.trim().is_empty() {
                bail!("Missing OpenCage API key (set {ENV_NAME_OPENCAGE_API_KEY})");
            }
        }
        Ok(cfg)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub source: LocationSource,
    pub accuracy: Accuracy,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LocationSource {
    Fixed(Coordinate),
    /// Replay a recorded track
    Track {
        file: PathBuf,
        interval: Duration,
    },
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Geocoding {
    Nominatim { endpoint: Option<String> },
    OpenCage { api_key: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Directions {
    pub osrm_base_url: String,
    pub osrm_timeout: Duration,
    pub transport_mode: TransportMode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    pub region_span: CoordinateSpan,
    /// Also write every scene into this GeoJSON file.
    pub geojson_file: Option<PathBuf>,
}

impl TryFrom<raw::Config> for Config {
    type Error = anyhow::Error;
    fn try_from(from: raw::Config) -> Result<Self> {
        let raw::Config {
            location,
            geocoding,
            directions,
            map,
            gateway,
        } = from;
        let gateway = gateway
            .map(raw::Gateway::with_defaults)
            .unwrap_or_default();

        let raw::Location {
            source,
            position,
            track_file,
            replay_interval,
            accuracy,
        } = location.unwrap_or_default();

        let source = match source {
            raw::LocationSource::Fixed => {
                let position = position
                    .ok_or_else(|| anyhow!("Missing position of the 'fixed' location source"))?;
                let coordinate = position
                    .parse::<Coordinate>()
                    .with_context(|| format!("Invalid position '{position}'"))?;
                LocationSource::Fixed(coordinate)
            }
            raw::LocationSource::Track => {
                let file = track_file
                    .ok_or_else(|| anyhow!("Missing track file of the 'track' location source"))?;
                let interval = replay_interval.unwrap_or(DEFAULT_REPLAY_INTERVAL);
                if interval.is_zero() {
                    bail!("The replay interval must not be zero");
                }
                LocationSource::Track { file, interval }
            }
            raw::LocationSource::Disabled => LocationSource::Disabled,
        };
        let accuracy = match accuracy {
            Some(raw::Accuracy::Best) | None => Accuracy::Best,
            Some(raw::Accuracy::NearestTenMeters) => Accuracy::NearestTenMeters,
            Some(raw::Accuracy::HundredMeters) => Accuracy::HundredMeters,
            Some(raw::Accuracy::Kilometer) => Accuracy::Kilometer,
        };
        let location = Location { source, accuracy };

        let raw::Geocoding { gateway: gw_name } = geocoding.unwrap_or_default();
        let geocoding = match gw_name {
            raw::GeocodingGateway::Nominatim => {
                let endpoint = gateway.nominatim.and_then(|gw| gw.endpoint);
                Geocoding::Nominatim { endpoint }
            }
            raw::GeocodingGateway::Opencage => {
                let raw::OpenCage { api_key } = gateway
                    .opencage
                    .ok_or_else(|| anyhow!("Missing 'opencage' gateway configuration"))?;
                Geocoding::OpenCage { api_key }
            }
        };

        let raw::Directions {
            gateway: gw_name,
            transport_mode,
        } = directions.unwrap_or_default();
        let directions = match gw_name {
            raw::DirectionsGateway::Osrm => {
                let raw::Osrm { base_url, timeout } = gateway
                    .osrm
                    .ok_or_else(|| anyhow!("Missing 'osrm' gateway configuration"))?;
                let transport_mode = match transport_mode {
                    Some(raw::TransportMode::Walking) => TransportMode::Walking,
                    Some(raw::TransportMode::Automobile) | None => TransportMode::Automobile,
                };
                let timeout = timeout.unwrap_or(directions::DEFAULT_TIMEOUT);
                if timeout.is_zero() {
                    bail!("The OSRM timeout must not be zero");
                }
                Directions {
                    osrm_base_url: base_url,
                    osrm_timeout: timeout,
                    transport_mode,
                }
            }
        };

        let raw::Map {
            region_span,
            geojson_file,
        } = map.unwrap_or_default();
        if !(region_span > 0.0 && region_span <= 180.0) {
            bail!("Invalid region span: {region_span}");
        }
        let map = Map {
            region_span: CoordinateSpan::new(region_span, region_span),
            geojson_file,
        };

        Ok(Self {
            location,
            geocoding,
            directions,
            map,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> Result<Config> {
        let raw: raw::Config = toml::from_str(toml)?;
        Config::try_from(raw)
    }

    #[test]
    fn load_default_config() {
        let file: Option<&Path> = None;
        let cfg = Config::try_load_from_file_or_default(file).unwrap();
        assert_eq!(cfg.location.source, LocationSource::Disabled);
        assert_eq!(cfg.location.accuracy, Accuracy::Best);
        assert_eq!(cfg.map.region_span, CoordinateSpan::new(0.1, 0.1));
        assert_eq!(cfg.directions.transport_mode, TransportMode::Automobile);
    }

    #[test]
    fn fixed_location() {
        let cfg = parse(
            r#"
            [location]
            source = "fixed"
            position = "37.422,-122.084"
            "#,
        )
        .unwrap();
        assert_eq!(
            cfg.location.source,
            LocationSource::Fixed(Coordinate::from_lat_lng_deg(37.422, -122.084))
        );
        assert!(matches!(cfg.geocoding, Geocoding::Nominatim { .. }));
    }

    #[test]
    fn invalid_locations() {
        assert!(parse("[location]\nsource = \"fixed\"").is_err());
        assert!(parse("[location]\nsource = \"fixed\"\nposition = \"95,10\"").is_err());
        assert!(parse("[location]\nsource = \"track\"").is_err());
    }

    #[test]
    fn track_location() {
        let cfg = parse(
            r#"
            [location]
            source = "track"
            track-file = "track.json"
            replay-interval = "500ms"
            "#,
        )
        .unwrap();
        assert_eq!(
            cfg.location.source,
            LocationSource::Track {
                file: "track.json".into(),
                interval: Duration::from_millis(500),
            }
        );
    }

    #[test]
    fn location_accuracy() {
        let cfg = parse(
            r#"
            [location]
            source = "disabled"
            accuracy = "hundred-meters"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.location.accuracy, Accuracy::HundredMeters);
        assert!(parse("[location]\nsource = \"disabled\"\naccuracy = \"exact\"").is_err());
    }

    #[test]
    fn opencage_requires_api_key() {
        let toml = r#"
            [geocoding]
            gateway = "opencage"
            [gateway.opencage]
            api-key = ""
            "#;
        let raw: raw::Config = toml::from_str(toml).unwrap();
        assert!(Config::try_from_raw(raw, None).is_err());

        let raw: raw::Config = toml::from_str(toml).unwrap();
        let cfg = Config::try_from_raw(raw, Some("secret".into())).unwrap();
        assert_eq!(
            cfg.geocoding,
            Geocoding::OpenCage {
                api_key: "secret".into()
            }
        );
    }

    #[test]
    fn api_key_does_not_change_the_gateway() {
        let raw: raw::Config = toml::from_str("").unwrap();
        let cfg = Config::try_from_raw(raw, Some("secret".into())).unwrap();
        assert!(matches!(cfg.geocoding, Geocoding::Nominatim { .. }));
    }

    #[test]
    fn walking_directions() {
        let cfg = parse(
            r#"
            [directions]
            gateway = "osrm"
            transport-mode = "walking"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.directions.transport_mode, TransportMode::Walking);
    }

    #[test]
    fn osrm_timeout() {
        let cfg = parse("").unwrap();
        assert_eq!(cfg.directions.osrm_timeout, Duration::from_secs(10));

        let cfg = parse(
            r#"
            [gateway.osrm]
            base-url = "http://localhost:5000"
            timeout = "3s"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.directions.osrm_timeout, Duration::from_secs(3));
        assert!(parse("[gateway.osrm]\nbase-url = \"http://localhost:5000\"\ntimeout = \"0s\"").is_err());
    }
}

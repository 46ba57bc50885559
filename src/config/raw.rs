use duration_str::deserialize_option_duration;
use serde::Deserialize;
use std::{path::PathBuf, time::Duration};

pub const DEFAULT_CONFIG_FILE: &str = include_str!("mapsearch.default.toml");

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub location: Option<Location>,
    pub geocoding: Option<Geocoding>,
    pub directions: Option<Directions>,
    pub map: Option<Map>,
    pub gateway: Option<Gateway>,
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_FILE).expect("Default configuration")
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Location {
    pub source: LocationSource,
    pub position: Option<String>,
    pub track_file: Option<PathBuf>,
    #[serde(default, deserialize_with = "deserialize_option_duration")]
    pub replay_interval: Option<Duration>,
    pub accuracy: Option<Accuracy>,
}

impl Default for Location {
    fn default() -> Self {
        Config::default().location.expect("Location configuration")
    }
}

#[derive(Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocationSource {
    Fixed,
    Track,
    Disabled,
}

#[derive(Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Accuracy {
    Best,
    NearestTenMeters,
    HundredMeters,
    Kilometer,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Geocoding {
    pub gateway: GeocodingGateway,
}

impl Default for Geocoding {
    fn default() -> Self {
        Config::default().geocoding.expect("Geocoding configuration")
    }
}

#[derive(Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeocodingGateway {
    Nominatim,
    Opencage,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Directions {
    pub gateway: DirectionsGateway,
    pub transport_mode: Option<TransportMode>,
}

impl Default for Directions {
    fn default() -> Self {
        Config::default()
            .directions
            .expect("Directions configuration")
    }
}

#[derive(Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DirectionsGateway {
    Osrm,
}

#[derive(Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransportMode {
    Automobile,
    Walking,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Map {
    pub region_span: f64,
    pub geojson_file: Option<PathBuf>,
}

impl Default for Map {
    fn default() -> Self {
        Config::default().map.expect("Map configuration")
    }
}

#[derive(Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Gateway {
    pub nominatim: Option<Nominatim>,
    pub opencage: Option<OpenCage>,
    pub osrm: Option<Osrm>,
}

impl Gateway {
    /// Fills in the gateways that are not configured.
    pub fn with_defaults(self) -> Self {
        let defaults = Self::default();
        Self {
            nominatim: self.nominatim.or(defaults.nominatim),
            opencage: self.opencage.or(defaults.opencage),
            osrm: self.osrm.or(defaults.osrm),
        }
    }
}

impl Default for Gateway {
    fn default() -> Self {
        Config::default().gateway.expect("Gateway configuration")
    }
}

#[derive(Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Nominatim {
    pub endpoint: Option<String>,
}

#[derive(Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OpenCage {
    pub api_key: String,
}

#[derive(Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Osrm {
    pub base_url: String,
    #[serde(default, deserialize_with = "deserialize_option_duration")]
    pub timeout: Option<Duration>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_default_config_from_file() {
        let cfg: Config = toml::from_str(DEFAULT_CONFIG_FILE).unwrap();
        assert!(cfg.location.is_some());
        assert!(cfg.geocoding.is_some());
        assert!(cfg.directions.is_some());
        assert!(cfg.map.is_some());
        let gateway = cfg.gateway.unwrap();
        assert!(gateway.nominatim.is_some());
        assert!(gateway.opencage.is_some());
        assert!(gateway.osrm.is_some());
    }

    #[test]
    fn default_location_config() {
        let cfg = Location::default();
        assert!(matches!(cfg.source, LocationSource::Disabled));
        assert!(cfg.position.is_none());
        assert_eq!(cfg.replay_interval, Some(Duration::from_secs(1)));
        assert!(matches!(cfg.accuracy, Some(Accuracy::Best)));
    }

    #[test]
    fn parse_partial_config() {
        let cfg: Config = toml::from_str(
            r#"
            [location]
            source = "fixed"
            position = "52.5,13.4"
            "#,
        )
        .unwrap();
        let location = cfg.location.unwrap();
        assert!(matches!(location.source, LocationSource::Fixed));
        assert!(location.replay_interval.is_none());
        assert!(cfg.geocoding.is_none());
    }

    #[test]
    fn complete_partial_gateway_config() {
        let cfg: Config = toml::from_str(
            r#"
            [gateway.osrm]
            base-url = "http://localhost:5000"
            "#,
        )
        .unwrap();
        let gateway = cfg.gateway.unwrap().with_defaults();
        assert_eq!(gateway.osrm.unwrap().base_url, "http://localhost:5000");
        assert!(gateway.nominatim.is_some());
        assert!(gateway.opencage.is_some());
    }
}

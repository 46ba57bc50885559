use std::{fs, io, path::Path, time::Duration};

use mapsearch_core::{
    entities::*,
    gateways::{
        location::{LocationService, LocationUpdates},
        Error,
    },
};
use tokio::sync::mpsc;

#[derive(Debug, thiserror::Error)]
pub enum LoadTrackError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("The track contains no positions")]
    Empty,
    #[error("Invalid position #{index}: {lat},{lng}")]
    InvalidPosition { index: usize, lat: f64, lng: f64 },
}

/// Replays a recorded track, one position per interval.
///
/// Updates stop after the last position.
#[derive(Debug, Clone)]
pub struct TrackReplay {
    track: Vec<Coordinate>,
    interval: Duration,
}

impl TrackReplay {
    pub fn new(track: Vec<Coordinate>, interval: Duration) -> Result<Self, LoadTrackError> {
        if track.is_empty() {
            return Err(LoadTrackError::Empty);
        }
        Ok(Self { track, interval })
    }

    /// Loads a JSON array of `[lat, lng]` pairs.
    pub fn load<P: AsRef<Path>>(path: P, interval: Duration) -> Result<Self, LoadTrackError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json, interval)
    }

    pub fn from_json(json: &str, interval: Duration) -> Result<Self, LoadTrackError> {
        let pairs: Vec<(f64, f64)> = serde_json::from_str(json)?;
        let track = pairs
            .into_iter()
            .enumerate()
            .map(|(index, (lat, lng))| {
                Coordinate::try_from_lat_lng_deg(lat, lng)
                    .ok_or(LoadTrackError::InvalidPosition { index, lat, lng })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(track, interval)
    }

    pub fn track(&self) -> &[Coordinate] {
        &self.track
    }
}

impl LocationService for TrackReplay {
    async fn request_authorization(&self) -> Result<(), Error> {
        Ok(())
    }

    fn start_updating(&self, accuracy: Accuracy) -> Result<LocationUpdates, Error> {
        log::info!(
            "Replaying {} positions every {:?} (accuracy: {accuracy:?})",
            self.track.len(),
            self.interval
        );
        let (tx, rx) = mpsc::unbounded_channel();
        let track = self.track.clone();
        let period = self.interval;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            for coordinate in track {
                interval.tick().await;
                if tx.send(Ok(LocationFix::now(coordinate))).is_err() {
                    log::debug!("Stop replaying track");
                    return;
                }
            }
        });
        Ok(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_track() {
        let replay =
            TrackReplay::from_json("[[52.5, 13.4], [52.51, 13.41]]", Duration::from_secs(1))
                .unwrap();
        assert_eq!(
            replay.track(),
            &[
                Coordinate::from_lat_lng_deg(52.5, 13.4),
                Coordinate::from_lat_lng_deg(52.51, 13.41)
            ]
        );
    }

    #[test]
    fn reject_invalid_tracks() {
        let interval = Duration::from_secs(1);
        assert!(matches!(
            TrackReplay::from_json("[]", interval),
            Err(LoadTrackError::Empty)
        ));
        assert!(matches!(
            TrackReplay::from_json("[[52.5, 13.4], [91.0, 13.4]]", interval),
            Err(LoadTrackError::InvalidPosition { index: 1, .. })
        ));
        assert!(matches!(
            TrackReplay::from_json("{}", interval),
            Err(LoadTrackError::Json(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn replay_positions_in_order() {
        let track = vec![
            Coordinate::from_lat_lng_deg(1.0, 1.0),
            Coordinate::from_lat_lng_deg(2.0, 2.0),
            Coordinate::from_lat_lng_deg(3.0, 3.0),
        ];
        let replay = TrackReplay::new(track.clone(), Duration::from_secs(5)).unwrap();
        let mut updates = replay.start_updating(Accuracy::Best).unwrap();
        for expected in track {
            let fix = updates.recv().await.unwrap().unwrap();
            assert_eq!(fix.coordinate, expected);
        }
        assert!(updates.recv().await.is_none());
    }
}

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use mapsearch_core::{entities::*, gateways::map::MapRenderer};
use serde_json::{json, Value};

/// Writes the current scene as a GeoJSON `FeatureCollection`.
///
/// The file is replaced on every render.
#[derive(Debug, Clone)]
pub struct GeoJsonFile {
    path: PathBuf,
}

impl GeoJsonFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn position(coordinate: Coordinate) -> Value {
    json!([coordinate.lng(), coordinate.lat()])
}

fn feature(geometry: Value, properties: Value) -> Value {
    json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": properties,
    })
}

pub fn scene_to_geojson(scene: &MapScene) -> Value {
    let annotations = scene.annotations.iter().map(|annotation| {
        feature(
            json!({ "type": "Point", "coordinates": position(annotation.coordinate) }),
            json!({
                "kind": "annotation",
                "title": annotation.title,
                "subtitle": annotation.subtitle,
            }),
        )
    });
    let overlays = scene.overlays.iter().map(|overlay| {
        let coordinates: Vec<_> = overlay.polyline.iter().copied().map(position).collect();
        feature(
            json!({ "type": "LineString", "coordinates": coordinates }),
            json!({ "kind": "route" }),
        )
    });
    let user_location = scene
        .user_location
        .filter(|_| scene.shows_user_location)
        .map(|pos| {
            feature(
                json!({ "type": "Point", "coordinates": position(pos) }),
                json!({ "kind": "user-location" }),
            )
        });
    let features: Vec<_> = annotations
        .chain(overlays)
        .chain(user_location)
        .collect();
    let mut collection = json!({
        "type": "FeatureCollection",
        "features": features,
    });
    if let Some(Viewport::FitBounds(bbox)) = scene.viewport {
        let (sw, ne) = (bbox.south_west(), bbox.north_east());
        collection["bbox"] = json!([sw.lng(), sw.lat(), ne.lng(), ne.lat()]);
    }
    collection
}

impl GeoJsonFile {
    fn write(&self, scene: &MapScene) -> io::Result<()> {
        let json = serde_json::to_string_pretty(&scene_to_geojson(scene))?;
        fs::write(&self.path, json)
    }
}

impl MapRenderer for GeoJsonFile {
    fn render(&self, scene: &MapScene, _: bool) {
        match self.write(scene) {
            Ok(()) => log::debug!("Wrote map scene to {}", self.path.display()),
            Err(err) => log::warn!(
                "Unable to write map scene to {}: {err}",
                self.path.display()
            ),
        }
    }
}

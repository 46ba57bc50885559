use super::prelude::*;

pub const DISTANCE_ANNOTATION_TITLE: &str = "Distance";

pub fn region_around(center: Coordinate, span: CoordinateSpan) -> MapRegion {
    MapRegion::new(center, span)
}

/// Replaces all annotations and overlays with the ones of a new route.
///
/// The user location settings of the current scene are kept.
pub fn route_scene(
    current: &MapScene,
    query: &SearchQuery,
    place: &ResolvedPlace,
    route: &RouteResult,
) -> MapScene {
    let title = query.trimmed().to_string();
    let subtitle = (place.label != title).then(|| place.label.clone());
    let destination = MapAnnotation {
        coordinate: place.coordinate,
        title,
        subtitle,
    };
    let distance = MapAnnotation {
        coordinate: route.label_anchor(),
        title: DISTANCE_ANNOTATION_TITLE.to_string(),
        subtitle: Some(route.distance.to_string()),
    };
    let overlay = RouteOverlay {
        polyline: route.polyline.clone(),
    };
    MapScene {
        viewport: Some(Viewport::FitBounds(route.bounding_region)),
        annotations: vec![destination, distance],
        overlays: vec![overlay],
        shows_user_location: current.shows_user_location,
        user_location: current.user_location,
        status: Some(Status::Info(format!(
            "{}: {}",
            place.label, route.distance
        ))),
    }
}

/// Only the status changes, everything else stays as it is.
pub fn status_scene(current: &MapScene, status: Status) -> MapScene {
    MapScene {
        status: Some(status),
        ..current.clone()
    }
}

pub fn centered_scene(current: &MapScene, fix: &LocationFix, span: CoordinateSpan) -> MapScene {
    MapScene {
        viewport: Some(Viewport::Region(region_around(fix.coordinate, span))),
        shows_user_location: true,
        user_location: Some(fix.coordinate),
        status: None,
        ..current.clone()
    }
}

use crate::geo::*;

/// A point marker with an optional callout subtitle.
#[derive(Debug, Clone, PartialEq)]
pub struct MapAnnotation {
    pub coordinate: Coordinate,
    pub title: String,
    pub subtitle: Option<String>,
}

/// A line drawn on top of the map.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteOverlay {
    pub polyline: Vec<Coordinate>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Viewport {
    Region(MapRegion),
    FitBounds(MapBbox),
}

/// User-visible status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Error(String),
}

/// Everything that is currently displayed on the map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapScene {
    pub viewport: Option<Viewport>,
    pub annotations: Vec<MapAnnotation>,
    pub overlays: Vec<RouteOverlay>,
    pub shows_user_location: bool,
    pub user_location: Option<Coordinate>,
    pub status: Option<Status>,
}

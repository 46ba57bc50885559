use std::io::{self, Write};

use mapsearch_core::{entities::*, gateways::map::MapRenderer};
use parking_lot::Mutex;

/// Prints a textual summary of every rendered scene.
#[derive(Debug)]
pub struct ConsoleMap<W> {
    out: Mutex<W>,
}

impl ConsoleMap<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W> ConsoleMap<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

fn write_scene<W: Write>(out: &mut W, scene: &MapScene, animated: bool) -> io::Result<()> {
    let MapScene {
        viewport,
        annotations,
        overlays,
        shows_user_location,
        user_location,
        status,
    } = scene;
    let transition = if animated { " (animated)" } else { "" };
    match viewport {
        Some(Viewport::Region(region)) => writeln!(
            out,
            "[map] centered on {} ({}° x {}°){transition}",
            region.center, region.span.lat_delta, region.span.lng_delta
        )?,
        Some(Viewport::FitBounds(bbox)) => {
            let span = bbox.span();
            writeln!(
                out,
                "[map] showing {} .. {} around {} ({}° x {}°){transition}",
                bbox.south_west(),
                bbox.north_east(),
                bbox.center(),
                span.lat_delta,
                span.lng_delta
            )?;
        }
        None => {}
    }
    for MapAnnotation {
        coordinate,
        title,
        subtitle,
    } in annotations
    {
        match subtitle {
            Some(subtitle) => writeln!(out, "[map] marker '{title}' ({subtitle}) at {coordinate}")?,
            None => writeln!(out, "[map] marker '{title}' at {coordinate}")?,
        }
    }
    for overlay in overlays {
        writeln!(out, "[map] route with {} points", overlay.polyline.len())?;
    }
    if *shows_user_location {
        match user_location {
            Some(pos) => writeln!(out, "[map] you are here: {pos}")?,
            None => writeln!(out, "[map] you are here: unknown")?,
        }
    }
    match status {
        Some(Status::Info(msg)) => writeln!(out, "{msg}")?,
        Some(Status::Error(msg)) => writeln!(out, "Error: {msg}")?,
        None => {}
    }
    out.flush()
}

impl<W> MapRenderer for ConsoleMap<W>
where
    W: Write,
{
    fn render(&self, scene: &MapScene, animated: bool) {
        let mut out = self.out.lock();
        if let Err(err) = write_scene(&mut *out, scene, animated) {
            log::warn!("Unable to print map: {err}");
        }
    }
}

//! CLI smoke entry point.
//!
//! # Responsibility
//! - Wire `geonotes_core` against a SQLite file and a Mercator viewport.
//! - Replay a gesture session and print the resulting selection state.
//!
//! Usage: `geonotes_cli [config.json] [session.json]`. The session file is a
//! JSON array of gesture events; a built-in tap sequence is used when
//! it is omitted.

use geonotes_core::db::open_db;
use geonotes_core::{
    core_version, init_logging, CoreConfig, GeoPoint, GestureEvent, MercatorViewport, ScreenPoint,
    SelectionController, SqliteCategoryRepository, SqliteNoteRepository,
    SqliteSettingsRepository, ViewEffect,
};
use log::info;
use std::error::Error;

const START_CENTER: GeoPoint = GeoPoint {
    lat: 53.563,
    lon: 9.9866,
};
const START_ZOOM: f64 = 17.0;
const VIEWPORT_WIDTH: f64 = 400.0;
const VIEWPORT_HEIGHT: f64 = 800.0;

fn main() {
    if let Err(err) = run() {
        eprintln!("geonotes_cli error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => CoreConfig::load(path)?,
        None => CoreConfig::default(),
    };
    let session = match args.next() {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => default_session(),
    };

    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)?;
    }
    println!("geonotes_core version={}", core_version());

    let conn = open_db(&config.db_path)?;
    let mut controller = SelectionController::try_new(
        SqliteNoteRepository::new(&conn),
        SqliteCategoryRepository::new(&conn),
        SqliteSettingsRepository::new(&conn),
        config.photo_dir.clone(),
    )?;
    let mut viewport =
        MercatorViewport::new(START_CENTER, START_ZOOM, VIEWPORT_WIDTH, VIEWPORT_HEIGHT);
    println!("loaded markers={}", controller.markers().len());

    for (step, event) in session.into_iter().enumerate() {
        let outcome = controller.dispatch_gesture(&viewport, event);
        for effect in controller.drain_effects() {
            if let ViewEffect::CenterOn(point) = effect {
                viewport.set_center(point);
            }
        }
        match outcome {
            Ok(()) => println!(
                "step={step} state={} selected={} icon={}",
                controller.state().name(),
                controller
                    .selected_id()
                    .map_or_else(|| "-".to_string(), |id| id.to_string()),
                controller
                    .selected_id()
                    .and_then(|id| controller.marker(id))
                    .and_then(|marker| marker.icon)
                    .map_or("-", |icon| icon.variant.resource_name())
            ),
            Err(err) => println!("step={step} rejected: {err}"),
        }
    }

    info!(
        "event=cli_session module=cli status=ok markers={}",
        controller.markers().len()
    );
    println!("final markers={}", controller.markers().len());
    Ok(())
}

/// Creates two notes in empty space, then pans the map, which is ignored
/// outside move mode.
fn default_session() -> Vec<GestureEvent> {
    let center = ScreenPoint::new(VIEWPORT_WIDTH / 2.0, VIEWPORT_HEIGHT / 2.0);
    vec![
        GestureEvent::TapConfirmed {
            point: center,
            hit_marker: None,
        },
        GestureEvent::TapConfirmed {
            point: ScreenPoint::new(center.x + 60.0, center.y - 40.0),
            hit_marker: None,
        },
        GestureEvent::DragMove { point: center },
    ]
}

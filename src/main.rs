#![warn(clippy::all)]

//! Headless driver: loads the park data and walks the timeline from the
//! first year to the last, logging what each frame would draw.

use park_timeline::scene::LoggingRenderer;
use park_timeline::{AppConfig, AppState, Scene};
use std::path::PathBuf;
use std::process::ExitCode;

/// Simulated frame time in seconds.
const FRAME_TIME: f64 = 1.0 / 60.0;

/// Upper bound on frames spent gliding between two years.
const MAX_TRANSITION_FRAMES: usize = 60 * 60;

fn main() -> ExitCode {
    env_logger::init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("park-timeline.json"));

    let config = match AppConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut state = match AppState::load(&config) {
        Ok(state) => state,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut renderer = LoggingRenderer::default();
    loop {
        let mut frames = 0;
        while state.timeline.is_animating() && frames < MAX_TRANSITION_FRAMES {
            state.timeline.advance(FRAME_TIME);
            frames += 1;
        }

        let scene = Scene {
            contour: &state.contour,
            buildings: &state.buildings,
            projection: &state.projection,
        };
        renderer.reset();
        scene.render(&mut renderer, state.timeline.current_year());

        let standing: Vec<&str> = state
            .buildings
            .iter()
            .filter(|b| b.vertical_offset(state.timeline.current_year()).is_some())
            .map(|b| b.name.as_str())
            .collect();
        log::info!(
            "{}: {} outline segments, {} buildings [{}]",
            state.timeline.label(),
            renderer.lines,
            renderer.cubes,
            standing.join(", ")
        );

        if !state.timeline.step_forward() {
            break;
        }
    }

    ExitCode::SUCCESS
}

use std::fs;
use std::path::Path;

use engine::{resolve_data_paths, DataPaths, LoopConfig, StartupError};
use serde::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::world::AdventureGame;

const SETTINGS_FILE: &str = "settings.json";

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) game: AdventureGame,
}

pub(crate) fn build_app() -> Result<AppWiring, StartupError> {
    init_tracing();
    info!("=== Tile Quest Startup ===");

    let paths: DataPaths = resolve_data_paths()?;
    let settings = load_settings(&paths.data_dir.join(SETTINGS_FILE));
    let defaults = LoopConfig::default();
    let config = LoopConfig {
        window_title: settings.window_title,
        window_width: settings.window_width,
        window_height: settings.window_height,
        max_render_fps: settings.max_render_fps,
        ..defaults
    };

    Ok(AppWiring {
        config,
        game: AdventureGame::new(paths.data_dir),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct Settings {
    window_title: String,
    window_width: u32,
    window_height: u32,
    max_render_fps: Option<u32>,
}

impl Default for Settings {
    fn default() -> Self {
        let defaults = LoopConfig::default();
        Self {
            window_title: defaults.window_title,
            window_width: defaults.window_width,
            window_height: defaults.window_height,
            max_render_fps: defaults.max_render_fps,
        }
    }
}

/// A missing or malformed settings file falls back to the defaults; the
/// game should still come up on a fresh checkout.
fn load_settings(path: &Path) -> Settings {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) => {
            info!(path = %path.display(), %error, "settings_file_unavailable_using_defaults");
            return Settings::default();
        }
    };
    let mut deserializer = serde_json::Deserializer::from_str(&raw);
    match serde_path_to_error::deserialize::<_, Settings>(&mut deserializer) {
        Ok(settings) => settings,
        Err(error) => {
            warn!(
                path = %path.display(),
                field = %error.path(),
                %error,
                "settings_file_invalid_using_defaults"
            );
            Settings::default()
        }
    }
}

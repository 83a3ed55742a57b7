use serde::Deserialize;
use std::path::Path;

/// Static game parameters, fixed for the lifetime of the process.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Target box width in physical pixels.
    pub width: u32,
    /// Target box height in physical pixels.
    pub height: u32,
    /// Pause between a click and the next box, in milliseconds.
    pub delay_ms: u64,
    /// Write a CSV results file when the session stops.
    pub export_results: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            delay_ms: 500,
            export_results: true,
        }
    }
}

impl GameConfig {
    /// Loads `config.json` from the working directory if present,
    /// otherwise falls back to the defaults. A malformed file is
    /// reported and ignored rather than aborting startup.
    pub fn load() -> Self {
        Self::load_from(Path::new("config.json"))
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Ignoring malformed {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}

use crate::errors::{FlightError, FlightResult};
use crate::resources::FlightSettings;
use bevy::prelude::*;
use std::fs;
use std::path::PathBuf;

pub mod range_types;

pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().and_then(|mut path| {
        path.push("flight_grid");
        fs::create_dir_all(&path).ok()?;
        path.push("config.toml");
        Some(path)
    })
}

/// Load settings from the user config file, falling back to defaults
pub fn load_config() -> FlightSettings {
    let Some(config_path) = get_config_path() else {
        return FlightSettings::default();
    };

    match fs::read_to_string(&config_path) {
        Ok(contents) => match toml::from_str::<FlightSettings>(&contents) {
            Ok(settings) => {
                info!("Loaded flight settings from {}", config_path.display());
                settings
            }
            Err(e) => {
                warn!("Failed to parse {}: {e}; using defaults", config_path.display());
                FlightSettings::default()
            }
        },
        Err(_) => FlightSettings::default(),
    }
}

pub fn save_config(settings: &FlightSettings) -> FlightResult<()> {
    let config_path = get_config_path().ok_or(FlightError::ConfigDirNotFound)?;
    let contents = toml::to_string_pretty(settings)?;
    fs::write(config_path, contents)?;
    Ok(())
}

//! Session tunables loaded from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use canvas::consts::{GRID_SIZE, HISTORY_CAP};
use canvas::engine::Settings;

/// Editing-session configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Grid spacing for wall snapping.
    pub grid_size: f64,
    /// Maximum undo history depth.
    pub history_cap: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self { grid_size: GRID_SIZE, history_cap: HISTORY_CAP }
    }
}

impl Config {
    /// Read `FLOORPLAN_GRID_SIZE` and `FLOORPLAN_HISTORY_CAP`.
    ///
    /// Absent, malformed, or non-positive values fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let grid_size = env_parse("FLOORPLAN_GRID_SIZE", GRID_SIZE);
        let history_cap = env_parse("FLOORPLAN_HISTORY_CAP", HISTORY_CAP);
        Self {
            grid_size: if grid_size.is_finite() && grid_size > 0.0 { grid_size } else { GRID_SIZE },
            history_cap: if history_cap > 0 { history_cap } else { HISTORY_CAP },
        }
    }

    #[must_use]
    pub fn settings(&self) -> Settings {
        Settings { grid_size: self.grid_size, history_cap: self.history_cap }
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

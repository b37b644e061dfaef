#![allow(clippy::float_cmp)]

use super::*;

// =============================================================================
// env_parse
// =============================================================================

#[test]
fn env_parse_missing_returns_default() {
    let val: usize = env_parse("__FLOORPLAN_TEST_MISSING__", 42);
    assert_eq!(val, 42);
}

#[test]
fn env_parse_present_valid() {
    unsafe { std::env::set_var("__FLOORPLAN_TEST_VALID__", "12.5") };
    let val: f64 = env_parse("__FLOORPLAN_TEST_VALID__", 0.0);
    assert_eq!(val, 12.5);
    unsafe { std::env::remove_var("__FLOORPLAN_TEST_VALID__") };
}

#[test]
fn env_parse_present_invalid_returns_default() {
    unsafe { std::env::set_var("__FLOORPLAN_TEST_INVALID__", "lots") };
    let val: usize = env_parse("__FLOORPLAN_TEST_INVALID__", 7);
    assert_eq!(val, 7);
    unsafe { std::env::remove_var("__FLOORPLAN_TEST_INVALID__") };
}

// =============================================================================
// Config
// =============================================================================

// The only test that touches the FLOORPLAN_* variables.
#[test]
fn from_env_reads_overrides_and_rejects_non_positive() {
    unsafe {
        std::env::remove_var("FLOORPLAN_GRID_SIZE");
        std::env::remove_var("FLOORPLAN_HISTORY_CAP");
    }
    assert_eq!(Config::from_env(), Config::default());

    unsafe {
        std::env::set_var("FLOORPLAN_GRID_SIZE", "25");
        std::env::set_var("FLOORPLAN_HISTORY_CAP", "10");
    }
    let cfg = Config::from_env();
    assert_eq!(cfg.grid_size, 25.0);
    assert_eq!(cfg.history_cap, 10);

    unsafe {
        std::env::set_var("FLOORPLAN_GRID_SIZE", "-5");
        std::env::set_var("FLOORPLAN_HISTORY_CAP", "0");
    }
    assert_eq!(Config::from_env(), Config::default());

    unsafe {
        std::env::set_var("FLOORPLAN_GRID_SIZE", "NaN");
    }
    assert_eq!(Config::from_env().grid_size, GRID_SIZE);

    unsafe {
        std::env::remove_var("FLOORPLAN_GRID_SIZE");
        std::env::remove_var("FLOORPLAN_HISTORY_CAP");
    }
}

#[test]
fn settings_mirror_config() {
    let cfg = Config { grid_size: 40.0, history_cap: 3 };
    let settings = cfg.settings();
    assert_eq!(settings.grid_size, 40.0);
    assert_eq!(settings.history_cap, 3);
}

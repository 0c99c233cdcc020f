//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.

use roulette::config::AppConfig;
use serial_test::serial;

#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("ROULETTE_WINDOW__TITLE", "Test From Env");
    let config = AppConfig::load().unwrap();
    std::env::remove_var("ROULETTE_WINDOW__TITLE");
    assert_eq!(config.window.title, "Test From Env");
}

#[test]
#[serial]
fn test_env_override_nested_number() {
    std::env::set_var("ROULETTE_WHEEL__RIM_DIVISIONS", "12");
    let config = AppConfig::load().unwrap();
    std::env::remove_var("ROULETTE_WHEEL__RIM_DIVISIONS");
    assert_eq!(config.wheel.rim_divisions, 12);
    assert_eq!(config.wheel.rim_radius, 3.0);
}

#[test]
#[serial]
fn test_default_file_matches_builtin_defaults() {
    std::env::remove_var("ROULETTE_WINDOW__TITLE");

    let cwd = std::env::current_dir().unwrap();
    assert!(cwd.join("config/default.toml").exists());

    let config = AppConfig::load_from(cwd.join("config")).unwrap();
    let builtin = AppConfig::default();
    assert_eq!(config.viewport.world_size_meters, builtin.viewport.world_size_meters);
    assert_eq!(config.physics.velocity_iterations, builtin.physics.velocity_iterations);
    assert_eq!(config.physics.position_iterations, builtin.physics.position_iterations);
    assert_eq!(config.wheel.rim_divisions, builtin.wheel.rim_divisions);
    assert_eq!(config.wheel.restitution, builtin.wheel.restitution);
    assert!((config.wheel.angular_velocity - builtin.wheel.angular_velocity).abs() < 1e-6);
    assert!((config.physics.time_step - builtin.physics.time_step).abs() < 1e-6);
}

#[test]
#[serial]
fn test_radius_overrides_move_the_ball() {
    std::env::set_var("ROULETTE_WHEEL__DISC_RADIUS", "3.5");
    std::env::set_var("ROULETTE_WHEEL__RIM_RADIUS", "4.0");
    let config = AppConfig::load().unwrap();
    std::env::remove_var("ROULETTE_WHEEL__DISC_RADIUS");
    std::env::remove_var("ROULETTE_WHEEL__RIM_RADIUS");
    assert_eq!(config.wheel.ball_start().x, 3.75);
}

#[test]
#[serial]
fn test_missing_directory_uses_defaults() {
    let config = AppConfig::load_from("does/not/exist").unwrap();
    assert_eq!(config.window.title, "Roulette Wheel");
    assert_eq!(config.wheel.ball_position, None);
}

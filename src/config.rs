//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`ROULETTE_SECTION__KEY`)

use std::f32::consts::PI;
use std::path::Path;

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};

use wheel_math::Vec2;
use wheel_physics::DebugDrawFlags;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub physics: PhysicsConfig,
    #[serde(default)]
    pub wheel: WheelConfig,
    #[serde(default)]
    pub rendering: RenderingConfig,
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`ROULETTE_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // ROULETTE_WINDOW__TITLE=Test -> window.title = "Test"
        figment = figment.merge(Env::prefixed("ROULETTE_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Start in fullscreen mode
    pub fullscreen: bool,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Roulette Wheel".to_string(),
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
        }
    }
}

/// How much of the world the screen shows
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Meters spanned by the smaller screen dimension at scale 1.0
    pub world_size_meters: f32,
    /// Zoom factor
    pub scale: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            world_size_meters: 10.0,
            scale: 1.0,
        }
    }
}

/// Physics world and stepping configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity [x, y] in m/s²
    pub gravity: [f32; 2],
    pub allow_sleeping: bool,
    pub continuous_physics: bool,
    pub warm_starting: bool,
    /// Fixed step in seconds
    pub time_step: f32,
    pub velocity_iterations: usize,
    pub position_iterations: usize,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, 0.0],
            allow_sleeping: false,
            continuous_physics: true,
            warm_starting: true,
            time_step: 1.0 / 60.0,
            velocity_iterations: 8,
            position_iterations: 1,
        }
    }
}

impl PhysicsConfig {
    /// Convert to the physics engine's configuration
    pub fn to_physics_config(&self) -> wheel_physics::PhysicsConfig {
        wheel_physics::PhysicsConfig {
            gravity: Vec2::from(self.gravity),
            allow_sleeping: self.allow_sleeping,
            continuous_physics: self.continuous_physics,
            warm_starting: self.warm_starting,
        }
    }
}

/// Wheel and ball geometry, surfaces and scripted spin
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelConfig {
    /// Radius of the solid inner disc
    pub disc_radius: f32,
    /// Radius of the spiked rim
    pub rim_radius: f32,
    /// Number of angular divisions around the rim
    pub rim_divisions: usize,
    /// Half-width of each spike in degrees
    pub spike_half_angle_degrees: f32,
    /// Radius of the notch between spikes as a fraction of the rim radius
    pub notch_scale: f32,
    /// Wheel spin forced every frame (rad/s)
    pub angular_velocity: f32,
    pub ball_radius: f32,
    /// Ball start position [x, y]; midway between disc and rim when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ball_position: Option<[f32; 2]>,
    /// Ball launch velocity [x, y]
    pub ball_velocity: [f32; 2],
    /// Ball spin forced every frame (rad/s)
    pub ball_angular_velocity: f32,
    /// Pixel size of the ball marker's content
    pub ball_marker_pixels: f32,
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
}

impl WheelConfig {
    /// Where the ball is spawned
    pub fn ball_start(&self) -> Vec2 {
        self.ball_position.map_or(
            Vec2::new((self.disc_radius + self.rim_radius) * 0.5, 0.0),
            Vec2::from,
        )
    }
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            disc_radius: 2.5,
            rim_radius: 3.0,
            rim_divisions: 36,
            spike_half_angle_degrees: 2.0,
            notch_scale: 0.98,
            angular_velocity: PI / 8.0,
            ball_radius: 0.1,
            ball_position: None,
            ball_velocity: [-0.5, 0.5],
            ball_angular_velocity: PI,
            ball_marker_pixels: 64.0,
            density: 1.0,
            friction: 1.0,
            restitution: 0.9,
        }
    }
}

/// Rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderingConfig {
    /// Background color [r, g, b, a]
    pub background_color: [f32; 4],
    /// Segments per debug-drawn circle
    pub circle_segments: usize,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            background_color: [0.02, 0.02, 0.08, 1.0],
            circle_segments: 16,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
    pub draw_shapes: bool,
    pub draw_aabbs: bool,
    pub draw_center_of_mass: bool,
    pub draw_contacts: bool,
    /// Draw the one-meter grid
    pub show_grid: bool,
    /// Trace the ball's path
    pub ball_trail: bool,
    /// Maximum number of trail segments kept
    pub trail_max_lines: usize,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            draw_shapes: true,
            draw_aabbs: false,
            draw_center_of_mass: false,
            draw_contacts: false,
            show_grid: true,
            ball_trail: true,
            trail_max_lines: 2000,
        }
    }
}

impl DebugConfig {
    /// Physics debug-draw flags selected by this config
    pub fn draw_flags(&self) -> DebugDrawFlags {
        let mut flags = DebugDrawFlags::empty();
        flags.set(DebugDrawFlags::SHAPES, self.draw_shapes);
        flags.set(DebugDrawFlags::AABBS, self.draw_aabbs);
        flags.set(DebugDrawFlags::CENTER_OF_MASS, self.draw_center_of_mass);
        flags.set(DebugDrawFlags::CONTACT_POINTS, self.draw_contacts);
        flags
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

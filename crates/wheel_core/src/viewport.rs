//! Mapping between world meters and screen pixels

use wheel_math::Vec2;
use wheel_physics::Aabb;

/// Camera over the physics world
///
/// The viewport fits `world_size_meters` across the smaller screen
/// dimension at scale 1.0. World +y points up; screen +y points down with
/// the origin at the top-left corner.
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
    world_size_meters: f32,
    screen_width: f32,
    screen_height: f32,
    scale: f32,
    /// World point shown at the center of the screen
    center: Vec2,
}

impl Viewport {
    /// Create a viewport showing `world_size_meters` on a screen of the given pixel size
    pub fn new(world_size_meters: f32, screen_width: u32, screen_height: u32) -> Self {
        Self {
            world_size_meters: world_size_meters.max(f32::EPSILON),
            screen_width: screen_width.max(1) as f32,
            screen_height: screen_height.max(1) as f32,
            scale: 1.0,
            center: Vec2::ZERO,
        }
    }

    pub fn world_size_meters(&self) -> f32 {
        self.world_size_meters
    }

    /// Zoom factor (1.0 fits the world size on screen)
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Set the zoom factor; non-positive values are ignored
    pub fn set_scale(&mut self, scale: f32) {
        if scale > 0.0 && scale.is_finite() {
            self.scale = scale;
        } else {
            log::warn!("Ignoring invalid viewport scale {}", scale);
        }
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.center = center;
    }

    pub fn screen_size(&self) -> (f32, f32) {
        (self.screen_width, self.screen_height)
    }

    /// Update the screen size after a window resize
    pub fn resize(&mut self, screen_width: u32, screen_height: u32) {
        self.screen_width = screen_width.max(1) as f32;
        self.screen_height = screen_height.max(1) as f32;
    }

    /// Pixels per meter
    pub fn ptm_ratio(&self) -> f32 {
        self.screen_width.min(self.screen_height) / self.world_size_meters * self.scale
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        let ptm = self.ptm_ratio();
        let offset = (world - self.center) * ptm;
        Vec2::new(
            self.screen_width * 0.5 + offset.x,
            self.screen_height * 0.5 - offset.y,
        )
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        let ptm = self.ptm_ratio();
        let offset = Vec2::new(
            screen.x - self.screen_width * 0.5,
            self.screen_height * 0.5 - screen.y,
        );
        self.center + offset / ptm
    }

    /// Half of the visible world extent along each axis, in meters
    pub fn half_extents(&self) -> Vec2 {
        let ptm = self.ptm_ratio();
        Vec2::new(self.screen_width * 0.5 / ptm, self.screen_height * 0.5 / ptm)
    }

    /// World-space rectangle covered by the screen
    pub fn visible_world_bounds(&self) -> Aabb {
        let half = self.half_extents();
        Aabb::new(self.center - half, self.center + half)
    }
}

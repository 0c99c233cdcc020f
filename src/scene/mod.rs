//! Scenes shown by the application

mod main_scene;

pub use main_scene::{spiked_rim_vertices, MainScene};

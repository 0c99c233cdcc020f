//! Roulette wheel demo
//!
//! Opens a window and runs the wheel scene, drawing the physics world as
//! debug lines. Esc quits, F toggles fullscreen, P pauses.

use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowId,
};

use roulette::config::AppConfig;
use roulette::scene::MainScene;
use roulette::systems::{RenderError, RenderSystem, SimulationSystem, WindowSystem};
use wheel_core::SceneManager;

/// Main application state
struct App {
    /// Application configuration
    config: AppConfig,
    window_system: Option<WindowSystem>,
    render_system: Option<RenderSystem>,
    /// Scene manager driving the wheel scene
    scene_manager: SceneManager,
    simulation: SimulationSystem,
}

impl App {
    fn new(config: AppConfig, scene_manager: SceneManager) -> Self {
        Self {
            config,
            window_system: None,
            render_system: None,
            scene_manager,
            simulation: SimulationSystem::new(),
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key: KeyCode) {
        match key {
            KeyCode::Escape => {
                log::info!("Exiting");
                event_loop.exit();
            }
            KeyCode::KeyF => {
                if let Some(window) = &self.window_system {
                    window.toggle_fullscreen();
                }
            }
            KeyCode::KeyP => {
                if let Some(scene) = self.scene_manager.running_scene_mut() {
                    scene.toggle_pause();
                }
            }
            _ => {}
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.simulation.update(&mut self.scene_manager);

        if let Some(window) = &self.window_system {
            let scene = self.scene_manager.running_scene();
            let paused = scene.is_some_and(|s| s.is_paused());
            let contacts = scene
                .and_then(|s| s.physics())
                .map_or(0, |p| p.contact_count());
            window.update_title(paused, contacts);
        }

        if let Some(render) = &mut self.render_system {
            match render.render_frame(&self.scene_manager) {
                Ok(()) => {}
                Err(RenderError::SurfaceLost) => render.recover_surface(),
                Err(RenderError::OutOfMemory) => {
                    log::error!("GPU out of memory");
                    event_loop.exit();
                    return;
                }
                Err(e) => log::warn!("Frame skipped: {}", e),
            }
        }

        if let Some(window) = &self.window_system {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window_system.is_some() {
            return;
        }

        let window_system = match WindowSystem::create(event_loop, &self.config.window) {
            Ok(w) => w,
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        let render_system = match RenderSystem::new(
            window_system.window().clone(),
            self.config.rendering.clone(),
            self.config.window.vsync,
        ) {
            Ok(r) => r,
            Err(e) => {
                log::error!("Failed to initialize rendering: {}", e);
                event_loop.exit();
                return;
            }
        };

        let (width, height) = render_system.size();
        self.scene_manager.resize(width, height);
        log::info!("Rendering at {}x{}", width, height);

        window_system.request_redraw();
        self.window_system = Some(window_system);
        self.render_system = Some(render_system);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(render) = &mut self.render_system {
                    render.resize(size.width, size.height);
                }
                self.scene_manager.resize(size.width, size.height);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed && !event.repeat {
                    if let PhysicalKey::Code(key) = event.physical_key {
                        self.handle_key(event_loop, key);
                    }
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}

fn main() {
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Config error, using defaults: {}", e);
        AppConfig::default()
    });

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.debug.log_level.as_str()),
    )
    .init();
    log::info!("Starting {}", config.window.title);

    let scene = match MainScene::create(&config) {
        Ok(scene) => scene,
        Err(e) => {
            log::error!("Failed to build the wheel scene: {}", e);
            std::process::exit(1);
        }
    };
    let mut scene_manager = SceneManager::new();
    scene_manager.run_with_scene(Box::new(scene));

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {}", e);
            std::process::exit(1);
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, scene_manager);
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {}", e);
    }
}

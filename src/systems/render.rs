//! GPU rendering system
//!
//! Manages GPU rendering including:
//! - Render context and surface
//! - The line pipeline
//! - Collecting the scene's primitives into a line batch each frame

use std::sync::Arc;

use winit::window::Window;

use wheel_core::SceneManager;
use wheel_render::{
    context::{ContextError, RenderContext},
    pipeline::{LinePipeline, LineUniforms},
    Camera2D, LineBatch,
};

use crate::config::RenderingConfig;

/// Render error types
#[derive(Debug)]
pub enum RenderError {
    /// GPU setup failed
    Context(ContextError),
    /// Surface was lost or outdated (window resized, minimized, etc.)
    SurfaceLost,
    /// GPU out of memory
    OutOfMemory,
    /// Other surface error
    Other(String),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::Context(e) => write!(f, "Render context error: {}", e),
            RenderError::SurfaceLost => write!(f, "Surface lost"),
            RenderError::OutOfMemory => write!(f, "Out of memory"),
            RenderError::Other(msg) => write!(f, "Render error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {}

impl From<ContextError> for RenderError {
    fn from(e: ContextError) -> Self {
        RenderError::Context(e)
    }
}

/// Manages GPU rendering
pub struct RenderSystem {
    context: RenderContext,
    line_pipeline: LinePipeline,
    batch: LineBatch,
    render_config: RenderingConfig,
}

impl RenderSystem {
    /// Create render system from window and config
    pub fn new(
        window: Arc<Window>,
        render_config: RenderingConfig,
        vsync: bool,
    ) -> Result<Self, RenderError> {
        let context = pollster::block_on(RenderContext::with_vsync(window, vsync))?;
        let line_pipeline = LinePipeline::new(&context.device, context.config.format);
        let batch = LineBatch::with_circle_segments(render_config.circle_segments);

        Ok(Self {
            context,
            line_pipeline,
            batch,
            render_config,
        })
    }

    /// Handle window resize
    pub fn resize(&mut self, width: u32, height: u32) {
        self.context
            .resize(winit::dpi::PhysicalSize::new(width, height));
    }

    /// Reconfigure the surface after it was lost
    pub fn recover_surface(&mut self) {
        log::warn!("Reconfiguring lost surface");
        self.context.reconfigure();
    }

    /// Render a single frame of the running scene
    pub fn render_frame(&mut self, scene_manager: &SceneManager) -> Result<(), RenderError> {
        self.batch.clear();
        scene_manager.draw(&mut self.batch);

        if let Some(scene) = scene_manager.running_scene() {
            let camera = Camera2D::from_viewport(scene.base().viewport());
            self.line_pipeline.update_uniforms(
                &self.context.queue,
                &LineUniforms {
                    view_projection: camera.view_projection(),
                },
            );
        }
        self.line_pipeline.upload(
            &self.context.device,
            &self.context.queue,
            self.batch.vertices(),
        );

        let output = match self.context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                return Err(RenderError::SurfaceLost)
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            Err(e) => return Err(RenderError::Other(format!("{:?}", e))),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let bg = &self.render_config.background_color;
        self.line_pipeline.render(
            &mut encoder,
            &view,
            wgpu::Color {
                r: bg[0] as f64,
                g: bg[1] as f64,
                b: bg[2] as f64,
                a: bg[3] as f64,
            },
        );

        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Lines drawn in the last frame
    pub fn line_count(&self) -> usize {
        self.batch.line_count()
    }

    /// Get current surface size
    pub fn size(&self) -> (u32, u32) {
        (self.context.size.width, self.context.size.height)
    }
}

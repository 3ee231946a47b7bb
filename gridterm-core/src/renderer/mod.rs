mod canvas;
mod color;
mod gpu;
pub mod overlay;
mod pipeline;
pub mod sweep;
mod texture;

use crate::font::FontManager;
use crate::geometry::Size;
use anyhow::Result;
use log::{info, warn};
use std::sync::Arc;
use winit::window::Window;

pub use canvas::Canvas;
pub use color::Color;
use gpu::GpuContext;
use pipeline::{create_render_pipeline, create_vertex_buffer};
use texture::TextureManager;

/// Primitive drawing operations the render sweep and the overlay issue
///
/// Coordinates are pixels from the top-left of the surface. Implementations
/// clip anything outside their bounds.
pub trait DrawSurface {
    fn size(&self) -> Size;

    /// Reallocate the backing store; non-positive sizes are ignored
    fn resize(&mut self, size: Size);

    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color);

    /// Draw `ch` with its left edge at `x` and its baseline at `baseline_y`
    fn draw_char(&mut self, ch: char, x: f32, baseline_y: f32, color: Color);

    /// Make the drawn frame visible
    fn present(&mut self) -> Result<()>;
}

/// GPU-backed drawing surface
///
/// Frames are composed on the CPU into a [`Canvas`], uploaded as a texture and
/// drawn as a single fullscreen quad.
///
/// Safety: The Surface has a 'static lifetime, but is actually tied to the
/// Window's lifetime. Fields drop in declaration order, so the surface goes
/// before `_window`.
pub struct Renderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    texture_manager: TextureManager,
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    canvas: Canvas,
    font: Arc<FontManager>,
    _window: Arc<Window>, // Keep window alive - must be last for drop order
}

impl Renderer {
    pub async fn new(window: Arc<Window>, font: Arc<FontManager>) -> Result<Self> {
        let gpu = GpuContext::new(window.clone()).await?;

        let texture_manager = TextureManager::new(
            &gpu.device,
            gpu.config.width,
            gpu.config.height,
            gpu.config.format,
        );
        let render_pipeline = create_render_pipeline(
            &gpu.device,
            &texture_manager.bind_group_layout,
            gpu.config.format,
        );
        let vertex_buffer = create_vertex_buffer(&gpu.device);
        let canvas = Canvas::new(Size::new(gpu.config.width as i32, gpu.config.height as i32));

        info!(
            "Renderer ready: {}x{} surface",
            gpu.config.width, gpu.config.height
        );

        Ok(Self {
            device: gpu.device,
            queue: gpu.queue,
            surface: gpu.surface,
            config: gpu.config,
            texture_manager,
            render_pipeline,
            vertex_buffer,
            canvas,
            font,
            _window: window,
        })
    }

    pub fn font(&self) -> &Arc<FontManager> {
        &self.font
    }

    fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    fn execute_render_pass(&mut self) -> Result<()> {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost or outdated, reconfiguring");
                self.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("Surface texture timed out, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.texture_manager.bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.draw(0..6, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

impl DrawSurface for Renderer {
    fn size(&self) -> Size {
        self.canvas.size()
    }

    fn resize(&mut self, size: Size) {
        if !size.is_positive() {
            return;
        }
        info!("Resizing renderer to {}x{}", size.width, size.height);

        self.config.width = size.width as u32;
        self.config.height = size.height as u32;
        self.reconfigure();
        self.texture_manager
            .resize(&self.device, self.config.width, self.config.height);
        self.canvas.resize(size);
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        self.canvas.fill_rect(x, y, width, height, color);
    }

    fn draw_char(&mut self, ch: char, x: f32, baseline_y: f32, color: Color) {
        let glyph = self.font.glyph(ch);
        let (metrics, bitmap) = &*glyph;

        // fontdue's ymin is the offset of the bitmap's bottom edge from the baseline
        let top = baseline_y - (metrics.height as f32 + metrics.ymin as f32);
        let left = x + metrics.xmin as f32;
        self.canvas.draw_coverage(
            bitmap,
            metrics.width,
            metrics.height,
            left.round() as i32,
            top.round() as i32,
            color,
        );
    }

    fn present(&mut self) -> Result<()> {
        self.texture_manager.upload(&self.queue, &self.canvas);
        self.execute_render_pass()
    }
}

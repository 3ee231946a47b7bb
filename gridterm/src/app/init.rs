use super::state::LoopEvent;
use super::App;
use anyhow::Result;
use gridterm_core::{
    Config, FontManager, FontMetrics, Renderer, ResizeCoalescer, RunFlag, Size, TermScreen,
};
use log::info;
use std::sync::Arc;
use winit::{dpi::PhysicalSize, event_loop::EventLoopBuilder, window::WindowBuilder};

impl App {
    /// Create a new application
    pub fn new(config: Config) -> Result<Self> {
        info!("Initializing application");

        let event_loop = EventLoopBuilder::<LoopEvent>::with_user_event().build()?;

        let window = WindowBuilder::new()
            .with_title(config.window.title.as_str())
            .with_inner_size(PhysicalSize::new(config.window.width, config.window.height))
            .build(&event_loop)?;
        let window = Arc::new(window);

        let font = Arc::new(FontManager::new(config.font.path.as_deref(), config.font.size)?);

        // The window manager may not honor the requested size
        let inner = window.inner_size();
        let mut screen_config = config.screen_config(font.cell_size());
        screen_config.display_size = Size::new(inner.width as i32, inner.height as i32);
        let screen = Arc::new(TermScreen::initialize(screen_config));

        let coalescer = Arc::new(ResizeCoalescer::with_window(
            screen.clone(),
            config.resize_debounce(),
        )?);
        // Seed the last known size so a forced resize works before any drag
        coalescer.notify(inner.width as i32, inner.height as i32);

        let renderer = pollster::block_on(Renderer::new(window.clone(), font.clone()))?;

        info!(
            "Window {}x{}, grid {}x{}",
            inner.width,
            inner.height,
            screen.dimension().cols,
            screen.dimension().rows
        );

        Ok(Self {
            config,
            event_loop,
            window,
            font,
            screen,
            coalescer,
            renderer,
            run_flag: RunFlag::new(),
        })
    }
}

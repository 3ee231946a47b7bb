/// Fixed-step frame loop
///
/// Each iteration drains queued key presses, runs the application's update,
/// renders a full frame (clear, grid sweep, application overlay, optional
/// statistics overlay, present) and then sleeps for whatever is left of the
/// frame budget. The loop is cancelled cooperatively: clearing the shared
/// [`RunFlag`] ends it after the current iteration.
use crate::font::FontMetrics;
use crate::input::{KeyPress, KeyReceiver};
use crate::renderer::{overlay, DrawSurface};
use crate::resize::ResizeCoalescer;
use crate::screen::TermScreen;
use crate::stats::FrameStats;
use anyhow::Result;
use log::{debug, error, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use winit::keyboard::KeyCode;

#[derive(Debug, Clone, PartialEq)]
pub struct LoopConfig {
    pub target_fps: u32,
    /// How often the published fps value is refreshed
    pub fps_update_interval: Duration,
    /// Initial state of the statistics overlay
    pub show_debug: bool,
}

impl LoopConfig {
    /// Time budget for one frame
    pub fn frame_budget(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.target_fps.max(1) as f64)
    }
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            fps_update_interval: Duration::from_secs(1),
            show_debug: false,
        }
    }
}

/// Shared "keep running" flag; clearing it from any thread stops the loop
#[derive(Debug, Clone)]
pub struct RunFlag(Arc<AtomicBool>);

impl RunFlag {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_running(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn stop(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for RunFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// What an application can reach from inside the loop
pub struct LoopContext<'a> {
    pub screen: &'a TermScreen,
    pub stats: &'a FrameStats,
    coalescer: Option<&'a ResizeCoalescer>,
    run_flag: &'a RunFlag,
    show_debug: &'a mut bool,
}

impl LoopContext<'_> {
    /// Apply the last known window size now, bypassing the debounce
    pub fn force_resize(&self) {
        match self.coalescer {
            Some(coalescer) => coalescer.force_resize(),
            None => debug!("Force resize requested without a resize coalescer"),
        }
    }

    /// Finish the current frame, then shut down
    pub fn request_exit(&self) {
        self.run_flag.stop();
    }

    pub fn toggle_debug(&mut self) {
        *self.show_debug = !*self.show_debug;
    }

    pub fn show_debug(&self) -> bool {
        *self.show_debug
    }
}

/// Application driven by [`GameLoop`]
pub trait Application {
    /// A key press, delivered before `update` in the frame it arrived
    fn on_key(&mut self, _ctx: &mut LoopContext<'_>, _key: KeyPress) {}

    /// Advance state by `delta` seconds
    fn update(&mut self, ctx: &mut LoopContext<'_>, delta: f64);

    /// Draw free-form content on top of the grid
    fn render(&mut self, _surface: &mut dyn DrawSurface, _metrics: &dyn FontMetrics, _delta: f64) {}

    /// Called once after the loop stops
    fn shutdown(&mut self) {}
}

pub struct GameLoop {
    config: LoopConfig,
    run_flag: RunFlag,
    keys: Option<KeyReceiver>,
    show_debug: bool,
}

impl GameLoop {
    pub fn new(config: LoopConfig, run_flag: RunFlag) -> Self {
        let show_debug = config.show_debug;
        Self {
            config,
            run_flag,
            keys: None,
            show_debug,
        }
    }

    /// Deliver key presses from `keys` to the application
    pub fn with_keys(mut self, keys: KeyReceiver) -> Self {
        self.keys = Some(keys);
        self
    }

    pub fn run_flag(&self) -> &RunFlag {
        &self.run_flag
    }

    /// Run until the run flag is cleared, then shut down `app` and `coalescer`
    ///
    /// Returns the final frame statistics, or the error that stopped the loop.
    pub fn run<A: Application>(
        &mut self,
        app: &mut A,
        screen: &TermScreen,
        surface: &mut dyn DrawSurface,
        metrics: &dyn FontMetrics,
        coalescer: Option<&ResizeCoalescer>,
    ) -> Result<FrameStats> {
        info!(
            "Starting frame loop at {} fps target",
            self.config.target_fps
        );

        let result = self.run_frames(app, screen, surface, metrics, coalescer);
        if let Err(e) = &result {
            error!("Frame loop stopped: {:#}", e);
            self.run_flag.stop();
        }

        info!("Shutting down application");
        app.shutdown();
        if let Some(coalescer) = coalescer {
            coalescer.shutdown();
        }
        result
    }

    fn run_frames<A: Application>(
        &mut self,
        app: &mut A,
        screen: &TermScreen,
        surface: &mut dyn DrawSurface,
        metrics: &dyn FontMetrics,
        coalescer: Option<&ResizeCoalescer>,
    ) -> Result<FrameStats> {
        let budget = self.config.frame_budget();
        let mut stats = FrameStats::new(Instant::now());
        let mut last_frame = Instant::now();

        while self.run_flag.is_running() {
            let frame_start = Instant::now();
            let delta = frame_start.duration_since(last_frame);
            last_frame = frame_start;
            stats.last_delta_ms = delta.as_secs_f64() * 1000.0;
            let delta = delta.as_secs_f64();

            let keys = self.keys.as_mut().map(KeyReceiver::drain).unwrap_or_default();
            let update_start = Instant::now();
            {
                let mut ctx = LoopContext {
                    screen,
                    stats: &stats,
                    coalescer,
                    run_flag: &self.run_flag,
                    show_debug: &mut self.show_debug,
                };
                for key in keys {
                    if key.code == KeyCode::F1 {
                        ctx.toggle_debug();
                        continue;
                    }
                    app.on_key(&mut ctx, key);
                }
                app.update(&mut ctx, delta);
            }
            stats.update_ms = update_start.elapsed().as_secs_f64() * 1000.0;

            let render_start = Instant::now();
            self.render_frame(app, screen, surface, metrics, &stats, delta)?;
            stats.render_ms = render_start.elapsed().as_secs_f64() * 1000.0;

            let elapsed = frame_start.elapsed();
            if elapsed < budget {
                thread::sleep(budget - elapsed);
            }

            if stats.tick(Instant::now(), self.config.fps_update_interval) {
                debug!("fps: {}", stats.fps);
            }
        }

        Ok(stats)
    }

    fn render_frame<A: Application>(
        &self,
        app: &mut A,
        screen: &TermScreen,
        surface: &mut dyn DrawSurface,
        metrics: &dyn FontMetrics,
        stats: &FrameStats,
        delta: f64,
    ) -> Result<()> {
        screen.draw_frame(surface, metrics);
        app.render(surface, metrics, delta);

        if self.show_debug {
            overlay::draw_debug_overlay(surface, metrics, stats);
        }

        surface.present()
    }
}

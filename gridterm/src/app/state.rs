use gridterm_core::{Config, FontManager, Renderer, ResizeCoalescer, RunFlag, TermScreen};
use std::sync::Arc;
use winit::event_loop::EventLoop;
use winit::window::Window;

/// Events the frame loop thread posts back to the window thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum LoopEvent {
    /// The frame loop has finished its shutdown pass
    Exited,
}

/// Main application state
pub struct App {
    pub(super) config: Config,
    pub(super) event_loop: EventLoop<LoopEvent>,
    pub(super) window: Arc<Window>,
    pub(super) font: Arc<FontManager>,
    pub(super) screen: Arc<TermScreen>,
    pub(super) coalescer: Arc<ResizeCoalescer>,
    pub(super) renderer: Renderer,
    pub(super) run_flag: RunFlag,
}

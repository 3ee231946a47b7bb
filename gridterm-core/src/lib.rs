pub mod buffer;
pub mod config;
pub mod error;
pub mod font;
pub mod game_loop;
pub mod geometry;
pub mod glyph;
pub mod input;
pub mod layout;
pub mod renderer;
pub mod resize;
pub mod screen;
pub mod stats;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use error::{ScreenError, ScreenResult};
pub use font::{FontManager, FontMetrics};
pub use game_loop::{Application, GameLoop, LoopConfig, LoopContext, RunFlag};
pub use geometry::{Dimension, Padding, Size};
pub use glyph::Glyph;
pub use input::{key_channel, InputModifiers, KeyPress, KeyReceiver, KeySender};
pub use renderer::{Color, DrawSurface, Renderer};
pub use resize::{ListenerId, ResizeCoalescer, ResizeTarget};
pub use screen::{ScreenConfig, ScreenState, TermScreen};
pub use stats::FrameStats;

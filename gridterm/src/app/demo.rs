/// Demo application: a walled room with a movable player
///
/// Every frame redraws the scene from scratch under one write lock, so the
/// render sweep never observes a half-drawn room. A resize listener records a
/// status message that stays on screen for a few seconds after each applied
/// resize.
use super::commands::{command_for_key, DemoCommand};
use gridterm_core::buffer::Grid;
use gridterm_core::renderer::overlay;
use gridterm_core::{
    Application, Color, Dimension, DrawSurface, FontMetrics, Glyph, KeyPress, ListenerId,
    LoopContext, ResizeCoalescer, TermScreen,
};
use log::info;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

const RESIZE_MESSAGE_DURATION: Duration = Duration::from_secs(3);
const RESIZE_MESSAGE_POSITION: (f32, f32) = (20.0, 60.0);

const TOP_LEFT: Glyph = Glyph::new('╔', Color::CYAN, Color::BLACK);
const TOP_RIGHT: Glyph = Glyph::new('╗', Color::CYAN, Color::BLACK);
const BOTTOM_LEFT: Glyph = Glyph::new('╚', Color::CYAN, Color::BLACK);
const BOTTOM_RIGHT: Glyph = Glyph::new('╝', Color::CYAN, Color::BLACK);

/// What fills the screen behind the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backdrop {
    Room,
    Cleared,
    Walls,
}

struct ResizeMessage {
    text: String,
    shown_at: Instant,
}

pub(super) struct DemoApp {
    coalescer: Arc<ResizeCoalescer>,
    listener: ListenerId,
    message: Arc<Mutex<Option<ResizeMessage>>>,
    backdrop: Backdrop,
    /// Player (row, col); `None` until the first frame places it
    player: Option<(i32, i32)>,
}

impl DemoApp {
    pub fn new(screen: Arc<TermScreen>, coalescer: Arc<ResizeCoalescer>) -> Self {
        let message = Arc::new(Mutex::new(None));

        let listener = {
            let message = message.clone();
            coalescer.add_listener(move |size| {
                let dimension = screen.dimension();
                let text = format!(
                    "Window resized to: {}x{} | Terminal: {}x{}",
                    size.width, size.height, dimension.cols, dimension.rows
                );
                info!("{}", text);
                *message.lock() = Some(ResizeMessage {
                    text,
                    shown_at: Instant::now(),
                });
                Ok(())
            })
        };

        Self {
            coalescer,
            listener,
            message,
            backdrop: Backdrop::Room,
            player: None,
        }
    }

    fn toggle_backdrop(&mut self, backdrop: Backdrop) {
        self.backdrop = if self.backdrop == backdrop {
            Backdrop::Room
        } else {
            backdrop
        };
    }
}

impl Application for DemoApp {
    fn on_key(&mut self, ctx: &mut LoopContext<'_>, key: KeyPress) {
        let Some(command) = command_for_key(&key) else {
            return;
        };

        match command {
            DemoCommand::Exit => {
                info!("ESC pressed, exiting application");
                ctx.request_exit();
            }
            DemoCommand::ForceResize => {
                info!("F5 pressed, forcing resize event");
                ctx.force_resize();
            }
            DemoCommand::Clear => {
                info!("Ctrl+Shift+A: toggling empty screen");
                self.toggle_backdrop(Backdrop::Cleared);
            }
            DemoCommand::FillWalls => {
                info!("Ctrl+Shift+B: toggling wall fill");
                self.toggle_backdrop(Backdrop::Walls);
            }
            DemoCommand::Move { rows, cols } => {
                if let Some((row, col)) = self.player {
                    let dimension = ctx.screen.dimension();
                    self.player = clamp_to_interior((row + rows, col + cols), dimension);
                }
            }
        }
    }

    fn update(&mut self, ctx: &mut LoopContext<'_>, _delta: f64) {
        let backdrop = self.backdrop;
        let player = self.player;

        self.player = ctx.screen.with_write(|state| {
            let grid = state.grid_mut();
            let dimension = grid.dimension();
            let player = match player {
                Some(position) => clamp_to_interior(position, dimension),
                None => clamp_to_interior(center(dimension), dimension),
            };
            draw_scene(grid, backdrop, player);
            player
        });

        let mut message = self.message.lock();
        if message
            .as_ref()
            .is_some_and(|m| m.shown_at.elapsed() > RESIZE_MESSAGE_DURATION)
        {
            *message = None;
        }
    }

    fn render(&mut self, surface: &mut dyn DrawSurface, metrics: &dyn FontMetrics, _delta: f64) {
        if let Some(message) = self.message.lock().as_ref() {
            let (x, y) = RESIZE_MESSAGE_POSITION;
            overlay::draw_text(surface, metrics, &message.text, x, y, Color::GREEN);
        }
    }

    fn shutdown(&mut self) {
        self.coalescer.remove_listener(self.listener);
        info!("Demo stopped");
    }
}

fn center(dimension: Dimension) -> (i32, i32) {
    (dimension.rows as i32 / 2, dimension.cols as i32 / 2)
}

/// Clamp a position to the cells inside the outline; `None` if there are none
fn clamp_to_interior((row, col): (i32, i32), dimension: Dimension) -> Option<(i32, i32)> {
    let (rows, cols) = (dimension.rows as i32, dimension.cols as i32);
    if rows < 3 || cols < 3 {
        return None;
    }
    Some((row.clamp(1, rows - 2), col.clamp(1, cols - 2)))
}

fn draw_scene(grid: &mut Grid, backdrop: Backdrop, player: Option<(i32, i32)>) {
    let dimension = grid.dimension();
    match backdrop {
        Backdrop::Room => {
            grid.fill(Glyph::SPACE);
            grid.outline(Glyph::WALL);

            let (last_row, last_col) = (dimension.rows as i32 - 1, dimension.cols as i32 - 1);
            grid.set(0, 0, TOP_LEFT);
            grid.set(0, last_col, TOP_RIGHT);
            grid.set(last_row, 0, BOTTOM_LEFT);
            grid.set(last_row, last_col, BOTTOM_RIGHT);
        }
        Backdrop::Cleared => grid.fill(None),
        Backdrop::Walls => grid.fill(Glyph::WALL),
    }

    if let Some((row, col)) = player {
        grid.set(row, col, Glyph::PLAYER);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_scene() {
        let mut grid = Grid::new(4, 6);
        draw_scene(&mut grid, Backdrop::Room, Some((2, 3)));

        assert_eq!(grid.get(0, 0), Some(TOP_LEFT));
        assert_eq!(grid.get(0, 5), Some(TOP_RIGHT));
        assert_eq!(grid.get(3, 0), Some(BOTTOM_LEFT));
        assert_eq!(grid.get(3, 5), Some(BOTTOM_RIGHT));
        assert_eq!(grid.get(0, 2), Some(Glyph::WALL));
        assert_eq!(grid.get(1, 1), Some(Glyph::SPACE));
        assert_eq!(grid.get(2, 3), Some(Glyph::PLAYER));
    }

    #[test]
    fn test_backdrops() {
        let mut grid = Grid::new(3, 3);
        draw_scene(&mut grid, Backdrop::Cleared, None);
        assert_eq!(grid.occupied_count(), 0);

        draw_scene(&mut grid, Backdrop::Walls, Some((1, 1)));
        assert_eq!(grid.get(0, 0), Some(Glyph::WALL));
        assert_eq!(grid.get(1, 1), Some(Glyph::PLAYER));
    }

    #[test]
    fn test_player_stays_inside_outline() {
        let dimension = Dimension::new(10, 5);
        assert_eq!(clamp_to_interior((0, 0), dimension), Some((1, 1)));
        assert_eq!(clamp_to_interior((7, 20), dimension), Some((3, 8)));
        assert_eq!(clamp_to_interior((2, 4), dimension), Some((2, 4)));
        assert_eq!(clamp_to_interior((1, 1), Dimension::new(2, 5)), None);
        assert_eq!(center(dimension), (2, 5));
    }

    #[test]
    fn test_empty_grid_scene_is_harmless() {
        let mut grid = Grid::new(0, 0);
        draw_scene(&mut grid, Backdrop::Room, None);
        assert_eq!(grid.occupied_count(), 0);
    }
}

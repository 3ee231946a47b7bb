use gridterm_core::KeyPress;
use winit::keyboard::KeyCode;

/// Demo commands bound to keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoCommand {
    Exit,
    /// Apply the last window size immediately
    ForceResize,
    /// Toggle an empty screen
    Clear,
    /// Toggle a screen full of walls
    FillWalls,
    /// Move the player by a row/column offset
    Move { rows: i32, cols: i32 },
}

/// Map a key press to a demo command
///
/// Bindings:
/// - `Esc` - exit
/// - `F5` - force resize
/// - `Ctrl+Shift+A` - clear
/// - `Ctrl+Shift+B` - fill with walls
/// - arrow keys - move the player
pub fn command_for_key(key: &KeyPress) -> Option<DemoCommand> {
    if key.mods.is_ctrl_shift() {
        return match key.code {
            KeyCode::KeyA => Some(DemoCommand::Clear),
            KeyCode::KeyB => Some(DemoCommand::FillWalls),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Escape => Some(DemoCommand::Exit),
        KeyCode::F5 => Some(DemoCommand::ForceResize),
        KeyCode::ArrowUp if !key.mods.has_modifiers() => Some(DemoCommand::Move { rows: -1, cols: 0 }),
        KeyCode::ArrowDown if !key.mods.has_modifiers() => Some(DemoCommand::Move { rows: 1, cols: 0 }),
        KeyCode::ArrowLeft if !key.mods.has_modifiers() => Some(DemoCommand::Move { rows: 0, cols: -1 }),
        KeyCode::ArrowRight if !key.mods.has_modifiers() => Some(DemoCommand::Move { rows: 0, cols: 1 }),
        _ => None,
    }
}

/// Keyboard input handling - decodes winit key events into discrete key presses
///
/// The host event loop decodes presses and pushes them through a
/// [`key_channel`]; the frame loop drains the receiving end once per frame.

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};

/// Modifier key states held during a key press
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputModifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl InputModifiers {
    pub fn from_winit(mods: ModifiersState) -> Self {
        Self {
            shift: mods.shift_key(),
            ctrl: mods.control_key(),
            alt: mods.alt_key(),
            meta: mods.super_key(),
        }
    }

    /// Check if any modifiers are active (excluding shift)
    pub fn has_modifiers(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }

    /// Ctrl and Shift held, nothing else
    pub fn is_ctrl_shift(&self) -> bool {
        self.ctrl && self.shift && !self.alt && !self.meta
    }
}

/// One key press, identified by physical key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub code: KeyCode,
    pub mods: InputModifiers,
}

impl KeyPress {
    pub fn new(code: KeyCode, mods: InputModifiers) -> Self {
        Self { code, mods }
    }

    /// Decode a winit key event; releases and unidentified keys yield `None`
    ///
    /// Auto-repeat presses are kept so held keys keep acting.
    pub fn from_event(event: &KeyEvent, mods: ModifiersState) -> Option<Self> {
        Self::from_parts(event.physical_key, event.state, InputModifiers::from_winit(mods))
    }

    fn from_parts(physical: PhysicalKey, state: ElementState, mods: InputModifiers) -> Option<Self> {
        if state != ElementState::Pressed {
            return None;
        }
        match physical {
            PhysicalKey::Code(code) => Some(Self::new(code, mods)),
            PhysicalKey::Unidentified(_) => None,
        }
    }
}

/// Sending half of the key channel, held by the host event loop
#[derive(Clone)]
pub struct KeySender(UnboundedSender<KeyPress>);

impl KeySender {
    /// Returns `false` once the receiving loop is gone
    pub fn send(&self, key: KeyPress) -> bool {
        self.0.send(key).is_ok()
    }
}

/// Receiving half of the key channel, drained by the frame loop
pub struct KeyReceiver(UnboundedReceiver<KeyPress>);

impl KeyReceiver {
    /// Take every key press queued since the last call, oldest first
    pub fn drain(&mut self) -> Vec<KeyPress> {
        let mut keys = Vec::new();
        while let Ok(key) = self.0.try_recv() {
            keys.push(key);
        }
        keys
    }
}

pub fn key_channel() -> (KeySender, KeyReceiver) {
    let (tx, rx) = unbounded_channel();
    (KeySender(tx), KeyReceiver(rx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::NativeKeyCode;

    #[test]
    fn test_from_winit_modifiers() {
        let mods = InputModifiers::from_winit(ModifiersState::CONTROL | ModifiersState::SHIFT);
        assert!(mods.ctrl && mods.shift);
        assert!(!mods.alt && !mods.meta);
        assert!(mods.is_ctrl_shift());
        assert!(mods.has_modifiers());
        assert!(!InputModifiers::default().has_modifiers());
    }

    #[test]
    fn test_only_presses_of_known_keys_decode() {
        let mods = InputModifiers::default();
        assert_eq!(
            KeyPress::from_parts(PhysicalKey::Code(KeyCode::Escape), ElementState::Pressed, mods),
            Some(KeyPress::new(KeyCode::Escape, mods))
        );
        assert_eq!(
            KeyPress::from_parts(PhysicalKey::Code(KeyCode::Escape), ElementState::Released, mods),
            None
        );
        assert_eq!(
            KeyPress::from_parts(
                PhysicalKey::Unidentified(NativeKeyCode::Unidentified),
                ElementState::Pressed,
                mods
            ),
            None
        );
    }

    #[test]
    fn test_key_channel_drains_in_order() {
        let (tx, mut rx) = key_channel();
        let mods = InputModifiers::default();
        assert!(tx.send(KeyPress::new(KeyCode::ArrowUp, mods)));
        assert!(tx.send(KeyPress::new(KeyCode::F1, mods)));

        let codes: Vec<_> = rx.drain().into_iter().map(|k| k.code).collect();
        assert_eq!(codes, vec![KeyCode::ArrowUp, KeyCode::F1]);
        assert!(rx.drain().is_empty());

        drop(rx);
        assert!(!tx.send(KeyPress::new(KeyCode::F5, mods)));
    }
}

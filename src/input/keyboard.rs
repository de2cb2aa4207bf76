//! Keyboard adapter: press/release events to held-state intent

use std::collections::HashSet;

use crate::game::ControlIntent;

use super::ControlIntentSource;

/// Keys the adapter understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Space,
    Shift,
    Q,
    E,
}

impl Key {
    /// Parse a host key name such as `"KeyW"` or `"ArrowUp"`
    pub fn from_code(code: &str) -> Option<Self> {
        let key = match code {
            "KeyW" => Self::W,
            "KeyA" => Self::A,
            "KeyS" => Self::S,
            "KeyD" => Self::D,
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "Space" => Self::Space,
            "ShiftLeft" | "ShiftRight" => Self::Shift,
            "KeyQ" => Self::Q,
            "KeyE" => Self::E,
            _ => return None,
        };
        Some(key)
    }
}

/// Tracks which keys are currently held
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<Key>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        self.held.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    /// Apply a raw event; unknown codes are ignored
    pub fn handle(&mut self, code: &str, pressed: bool) {
        if let Some(key) = Key::from_code(code) {
            if pressed {
                self.press(key);
            } else {
                self.release(key);
            }
        }
    }

    /// Focus loss: nothing is held any more
    pub fn clear(&mut self) {
        self.held.clear();
    }

    fn any(&self, keys: &[Key]) -> bool {
        keys.iter().any(|k| self.held.contains(k))
    }

    pub fn intent(&self) -> ControlIntent {
        ControlIntent {
            forward: self.any(&[Key::W, Key::ArrowUp]),
            backward: self.any(&[Key::S, Key::ArrowDown]),
            left: self.any(&[Key::A, Key::ArrowLeft]),
            right: self.any(&[Key::D, Key::ArrowRight]),
            up: self.any(&[Key::Space, Key::E]),
            down: self.any(&[Key::Q]),
            boost: self.any(&[Key::Shift]),
        }
    }
}

impl ControlIntentSource for KeyboardState {
    fn sample(&mut self, _dt: f32) -> ControlIntent {
        self.intent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_semantics() {
        let mut keys = KeyboardState::new();
        keys.handle("KeyW", true);
        keys.handle("ShiftLeft", true);
        assert!(keys.sample(0.016).forward);
        assert!(keys.sample(0.016).boost);
        // Still held on the next tick
        assert!(keys.sample(0.016).forward);

        keys.handle("KeyW", false);
        let intent = keys.sample(0.016);
        assert!(!intent.forward);
        assert!(intent.boost);
    }

    #[test]
    fn aliases_share_an_action() {
        let mut keys = KeyboardState::new();
        keys.press(Key::A);
        keys.press(Key::ArrowLeft);
        keys.release(Key::A);
        assert!(keys.intent().left);
    }

    #[test]
    fn unknown_codes_and_clear() {
        let mut keys = KeyboardState::new();
        keys.handle("F13", true);
        assert_eq!(keys.intent(), ControlIntent::IDLE);
        keys.press(Key::Space);
        keys.clear();
        assert_eq!(keys.intent(), ControlIntent::IDLE);
    }
}

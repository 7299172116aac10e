use std::collections::HashMap;

use crate::action::MoveIntent;

/// Key identifier, independent of the windowing backend.
///
/// Letter keys are case-insensitive: `W` and `w` are the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    /// Any non-character key, by backend-specific code.
    Other(u32),
}

impl Key {
    pub fn char(c: char) -> Self {
        Key::Char(c.to_ascii_lowercase())
    }
}

/// Held keys plus whether the view has captured the pointer.
///
/// Written by the event dispatch path, read once per frame. Releasing the
/// capture drops every held key, so nothing stale can move the viewer.
#[derive(Debug, Default)]
pub struct InputState {
    pressed: HashMap<Key, bool>,
    captured: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press. Ignored while the pointer is released.
    pub fn press(&mut self, key: Key) {
        if self.captured {
            self.pressed.insert(normalize(key), true);
        }
    }

    pub fn release(&mut self, key: Key) {
        self.pressed.insert(normalize(key), false);
    }

    /// Engage or release pointer capture. Releasing clears all key state.
    pub fn set_captured(&mut self, captured: bool) {
        if self.captured != captured {
            tracing::debug!(captured, "pointer capture changed");
        }
        self.captured = captured;
        if !captured {
            self.pressed.clear();
        }
    }

    pub fn is_captured(&self) -> bool {
        self.captured
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.captured && self.pressed.get(&normalize(key)).copied().unwrap_or(false)
    }

    /// Snapshot of the movement keys for this frame.
    pub fn move_intent(&self) -> MoveIntent {
        if !self.captured {
            return MoveIntent::IDLE;
        }
        let axis = |pos: char, neg: char| {
            self.is_pressed(Key::Char(pos)) as i8 - self.is_pressed(Key::Char(neg)) as i8
        };
        MoveIntent::new(axis('w', 's'), axis('d', 'a'))
    }
}

fn normalize(key: Key) -> Key {
    match key {
        Key::Char(c) => Key::char(c),
        other => other,
    }
}

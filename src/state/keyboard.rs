//! Keyboard Module - Per-frame keyboard snapshots
//!
//! A `KeyboardState` lists the keys pressed this frame, released this frame
//! and still held, plus the modifier state. Controls act on *released* keys,
//! so a key held across frames fires once.
//!
//! # API
//!
//! - `KeyboardState::is_key_pressed` / `is_key_released` / `is_key_down`
//! - `KeyboardState::release(key)` - builder used by tests and trackers
//!
//! # Example
//!
//! ```ignore
//! use console_controls::state::keyboard::{Key, KeyboardState, Modifiers};
//!
//! let frame = KeyboardState::new().release(Key::Tab).with_modifiers(Modifiers::shift());
//! assert!(frame.is_key_released(Key::Tab));
//! ```

// =============================================================================
// TYPES
// =============================================================================

/// A logical key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    Escape,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    F(u8),
}

impl Key {
    /// The space bar.
    pub const SPACE: Key = Key::Char(' ');
}

/// Keyboard modifier state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Create empty modifiers
    pub fn none() -> Self {
        Self::default()
    }

    /// Create modifiers with ctrl
    pub fn ctrl() -> Self {
        Self { ctrl: true, ..Self::default() }
    }

    /// Create modifiers with alt
    pub fn alt() -> Self {
        Self { alt: true, ..Self::default() }
    }

    /// Create modifiers with shift
    pub fn shift() -> Self {
        Self { shift: true, ..Self::default() }
    }
}

/// Key event state (press, repeat, release)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyState {
    #[default]
    Press,
    Repeat,
    Release,
}

/// Snapshot of the keyboard for one frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyboardState {
    /// Keys that went down this frame (repeats included).
    pub pressed: Vec<Key>,
    /// Keys that came up this frame.
    pub released: Vec<Key>,
    /// Keys currently held.
    pub down: Vec<Key>,
    pub modifiers: Modifiers,
}

impl KeyboardState {
    /// An empty frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key released this frame.
    pub fn release(mut self, key: Key) -> Self {
        self.released.push(key);
        self
    }

    /// Add a key pressed this frame and still held.
    pub fn press(mut self, key: Key) -> Self {
        self.pressed.push(key);
        if !self.down.contains(&key) {
            self.down.push(key);
        }
        self
    }

    /// Replace the modifier state.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn is_key_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    pub fn is_key_released(&self, key: Key) -> bool {
        self.released.contains(&key)
    }

    pub fn is_key_down(&self, key: Key) -> bool {
        self.down.contains(&key)
    }

    /// Nothing happened this frame.
    pub fn is_empty(&self) -> bool {
        self.pressed.is_empty() && self.released.is_empty() && self.down.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================

//! Input Module - crossterm events to frame snapshots
//!
//! Terminals report input as a stream of events. The control tree wants one
//! mouse snapshot and one keyboard snapshot per frame. The trackers here sit
//! between the two: feed them every event as it arrives, then take a
//! snapshot once per frame.
//!
//! # API
//!
//! - `MouseTracker` - button state, click detection on release, wheel sum
//! - `KeyboardTracker` - pressed / released / down key lists
//! - `InputTracker` - both trackers plus resize handling
//! - `poll_event` / `read_event` - thin wrappers over crossterm
//! - `enable_mouse` / `disable_mouse` - terminal mouse reporting
//!
//! # Example
//!
//! ```ignore
//! use console_controls::state::input::{poll_event, InputTracker};
//! use std::time::{Duration, Instant};
//!
//! let start = Instant::now();
//! let mut input = InputTracker::new();
//! loop {
//!     while let Ok(Some(event)) = poll_event(Duration::ZERO) {
//!         input.handle(event, start.elapsed());
//!     }
//!     let (mouse, keyboard) = input.frame(start.elapsed());
//!     ui.tick(&mouse, &keyboard, frame_time, &mut buffer);
//! }
//! ```

use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent, KeyCode, KeyEventKind,
    KeyModifiers, KeyEvent as CrosstermKeyEvent, MouseButton as CrosstermMouseButton,
    MouseEvent as CrosstermMouseEvent, MouseEventKind, poll, read,
};
use crossterm::execute;
use std::io::stdout;
use std::time::Duration;

use super::keyboard::{Key, KeyState, KeyboardState, Modifiers};
use super::mouse::{MouseButton, MouseState};
use crate::types::Point;

// =============================================================================
// INPUT EVENT ENUM
// =============================================================================

/// Terminal event relevant to the control tree
#[derive(Debug, Clone)]
pub enum InputEvent {
    Mouse(CrosstermMouseEvent),
    Key(CrosstermKeyEvent),
    /// Terminal resize event (new width, height)
    Resize(u16, u16),
    /// No event or unhandled event type
    None,
}

// =============================================================================
// CONVERSION
// =============================================================================

/// Convert crossterm MouseButton to our MouseButton
fn convert_mouse_button(btn: CrosstermMouseButton) -> MouseButton {
    match btn {
        CrosstermMouseButton::Left => MouseButton::Left,
        CrosstermMouseButton::Right => MouseButton::Right,
        CrosstermMouseButton::Middle => MouseButton::Middle,
    }
}

/// Convert a crossterm key code. Returns None for keys controls never see.
pub fn convert_key_code(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Tab | KeyCode::BackTab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Esc => Key::Escape,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Insert => Key::Insert,
        KeyCode::F(n) => Key::F(n),
        _ => return None,
    };
    Some(key)
}

/// Convert crossterm KeyModifiers to our Modifiers
fn convert_modifiers(mods: KeyModifiers) -> Modifiers {
    Modifiers {
        ctrl: mods.contains(KeyModifiers::CONTROL),
        alt: mods.contains(KeyModifiers::ALT),
        shift: mods.contains(KeyModifiers::SHIFT),
        meta: mods.contains(KeyModifiers::META) || mods.contains(KeyModifiers::SUPER),
    }
}

fn convert_key_state(kind: KeyEventKind) -> KeyState {
    match kind {
        KeyEventKind::Press => KeyState::Press,
        KeyEventKind::Repeat => KeyState::Repeat,
        KeyEventKind::Release => KeyState::Release,
    }
}

// =============================================================================
// MOUSE TRACKER
// =============================================================================

/// Folds crossterm mouse events into per-frame `MouseState` snapshots.
///
/// A click is reported on the frame its button is released, after a press
/// the tracker saw. Press and release inside one frame still count.
#[derive(Debug, Clone)]
pub struct MouseTracker {
    position: Point,
    left_down_since: Option<Duration>,
    right_down_since: Option<Duration>,
    left_released: bool,
    right_released: bool,
    scroll: i32,
    on_surface: bool,
}

impl Default for MouseTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl MouseTracker {
    pub fn new() -> Self {
        Self {
            position: Point::ZERO,
            left_down_since: None,
            right_down_since: None,
            left_released: false,
            right_released: false,
            scroll: 0,
            on_surface: true,
        }
    }

    /// Tell the tracker whether the pointer is over the hosting surface.
    pub fn set_on_surface(&mut self, on_surface: bool) {
        self.on_surface = on_surface;
    }

    /// Feed one terminal mouse event received at `now`.
    pub fn handle(&mut self, event: CrosstermMouseEvent, now: Duration) {
        self.position = Point::new(event.column as i32, event.row as i32);

        match event.kind {
            MouseEventKind::Down(btn) | MouseEventKind::Drag(btn) => match convert_mouse_button(btn) {
                MouseButton::Left => {
                    self.left_down_since.get_or_insert(now);
                }
                MouseButton::Right => {
                    self.right_down_since.get_or_insert(now);
                }
                _ => {}
            },
            MouseEventKind::Up(btn) => match convert_mouse_button(btn) {
                MouseButton::Left => {
                    if self.left_down_since.take().is_some() {
                        self.left_released = true;
                    }
                }
                MouseButton::Right => {
                    if self.right_down_since.take().is_some() {
                        self.right_released = true;
                    }
                }
                _ => {}
            },
            MouseEventKind::ScrollUp => self.scroll -= 1,
            MouseEventKind::ScrollDown => self.scroll += 1,
            MouseEventKind::Moved | MouseEventKind::ScrollLeft | MouseEventKind::ScrollRight => {}
        }
    }

    /// Take the snapshot for this frame and reset per-frame edges.
    pub fn snapshot(&mut self, now: Duration) -> MouseState {
        let held = |since: Option<Duration>| since.map_or(Duration::ZERO, |t| now.saturating_sub(t));

        let state = MouseState {
            position: self.position,
            left_down: self.left_down_since.is_some(),
            right_down: self.right_down_since.is_some(),
            left_clicked: self.left_released,
            right_clicked: self.right_released,
            left_down_duration: held(self.left_down_since),
            right_down_duration: held(self.right_down_since),
            scroll_delta: self.scroll,
            on_surface: self.on_surface,
            time: now,
        };

        self.left_released = false;
        self.right_released = false;
        self.scroll = 0;
        state
    }
}

// =============================================================================
// KEYBOARD TRACKER
// =============================================================================

/// Folds crossterm key events into per-frame `KeyboardState` snapshots.
///
/// Most terminals only report presses. With `synthesize_releases` on (the
/// default) every press is also reported as released in the same frame, so
/// controls that act on release still respond.
#[derive(Debug, Clone)]
pub struct KeyboardTracker {
    pressed: Vec<Key>,
    released: Vec<Key>,
    down: Vec<Key>,
    modifiers: Modifiers,
    synthesize_releases: bool,
}

impl Default for KeyboardTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyboardTracker {
    pub fn new() -> Self {
        Self {
            pressed: Vec::new(),
            released: Vec::new(),
            down: Vec::new(),
            modifiers: Modifiers::default(),
            synthesize_releases: true,
        }
    }

    /// Use real release events (terminal has keyboard enhancement enabled).
    pub fn with_release_events(mut self) -> Self {
        self.synthesize_releases = false;
        self
    }

    /// Feed one terminal key event.
    pub fn handle(&mut self, event: CrosstermKeyEvent) {
        let shift_tab = event.code == KeyCode::BackTab;
        self.modifiers = convert_modifiers(event.modifiers);
        if shift_tab {
            self.modifiers.shift = true;
        }

        let Some(key) = convert_key_code(event.code) else {
            return;
        };

        match convert_key_state(event.kind) {
            KeyState::Press | KeyState::Repeat if self.synthesize_releases => {
                self.pressed.push(key);
                self.released.push(key);
            }
            KeyState::Press => {
                self.pressed.push(key);
                if !self.down.contains(&key) {
                    self.down.push(key);
                }
            }
            KeyState::Repeat => self.pressed.push(key),
            KeyState::Release => {
                self.down.retain(|k| *k != key);
                self.released.push(key);
            }
        }
    }

    /// Take the snapshot for this frame and reset per-frame edges.
    pub fn snapshot(&mut self) -> KeyboardState {
        KeyboardState {
            pressed: std::mem::take(&mut self.pressed),
            released: std::mem::take(&mut self.released),
            down: self.down.clone(),
            modifiers: self.modifiers,
        }
    }
}

// =============================================================================
// COMBINED TRACKER
// =============================================================================

/// Mouse and keyboard trackers fed from one event stream.
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    pub mouse: MouseTracker,
    pub keyboard: KeyboardTracker,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route an event to its tracker. Returns the new size on resize.
    pub fn handle(&mut self, event: InputEvent, now: Duration) -> Option<(u16, u16)> {
        match event {
            InputEvent::Mouse(mouse) => self.mouse.handle(mouse, now),
            InputEvent::Key(key) => self.keyboard.handle(key),
            InputEvent::Resize(w, h) => return Some((w, h)),
            InputEvent::None => {}
        }
        None
    }

    /// Snapshots for this frame.
    pub fn frame(&mut self, now: Duration) -> (MouseState, KeyboardState) {
        (self.mouse.snapshot(now), self.keyboard.snapshot())
    }
}

// =============================================================================
// EVENT POLLING
// =============================================================================

/// Poll for an event with timeout.
/// Returns None if no event within timeout.
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<InputEvent>> {
    if poll(timeout)? {
        Ok(Some(read_event()?))
    } else {
        Ok(None)
    }
}

/// Read the next event (blocking).
pub fn read_event() -> std::io::Result<InputEvent> {
    match read()? {
        CrosstermEvent::Mouse(mouse) => Ok(InputEvent::Mouse(mouse)),
        CrosstermEvent::Key(key) => Ok(InputEvent::Key(key)),
        CrosstermEvent::Resize(w, h) => Ok(InputEvent::Resize(w, h)),
        _ => Ok(InputEvent::None),
    }
}

// =============================================================================
// MOUSE CAPTURE
// =============================================================================

/// Enable terminal mouse reporting.
pub fn enable_mouse() -> std::io::Result<()> {
    execute!(stdout(), EnableMouseCapture)
}

/// Disable terminal mouse reporting.
pub fn disable_mouse() -> std::io::Result<()> {
    execute!(stdout(), DisableMouseCapture)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> CrosstermMouseEvent {
        CrosstermMouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::empty(),
        }
    }

    fn key(code: KeyCode, kind: KeyEventKind, modifiers: KeyModifiers) -> CrosstermKeyEvent {
        CrosstermKeyEvent {
            code,
            modifiers,
            kind,
            state: crossterm::event::KeyEventState::NONE,
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    // -------------------------------------------------------------------------
    // Mouse
    // -------------------------------------------------------------------------

    #[test]
    fn test_press_then_release_across_frames() {
        let mut tracker = MouseTracker::new();
        tracker.handle(mouse(MouseEventKind::Down(CrosstermMouseButton::Left), 10, 5), ms(0));

        let frame = tracker.snapshot(ms(16));
        assert!(frame.left_down);
        assert!(!frame.left_clicked);
        assert_eq!(frame.position, Point::new(10, 5));
        assert_eq!(frame.left_down_duration, ms(16));

        tracker.handle(mouse(MouseEventKind::Up(CrosstermMouseButton::Left), 10, 5), ms(20));
        let frame = tracker.snapshot(ms(32));
        assert!(!frame.left_down);
        assert!(frame.left_clicked);
        assert_eq!(frame.left_down_duration, Duration::ZERO);

        // Click is an edge, gone next frame
        let frame = tracker.snapshot(ms(48));
        assert!(!frame.left_clicked);
    }

    #[test]
    fn test_press_and_release_in_one_frame_clicks() {
        let mut tracker = MouseTracker::new();
        tracker.handle(mouse(MouseEventKind::Down(CrosstermMouseButton::Right), 1, 1), ms(0));
        tracker.handle(mouse(MouseEventKind::Up(CrosstermMouseButton::Right), 1, 1), ms(5));

        let frame = tracker.snapshot(ms(16));
        assert!(frame.right_clicked);
        assert!(!frame.right_down);
    }

    #[test]
    fn test_release_without_press_is_not_a_click() {
        let mut tracker = MouseTracker::new();
        tracker.handle(mouse(MouseEventKind::Up(CrosstermMouseButton::Left), 0, 0), ms(0));
        assert!(!tracker.snapshot(ms(16)).left_clicked);
    }

    #[test]
    fn test_drag_counts_as_down_and_moves() {
        let mut tracker = MouseTracker::new();
        tracker.handle(mouse(MouseEventKind::Drag(CrosstermMouseButton::Left), 7, 3), ms(0));
        let frame = tracker.snapshot(ms(10));
        assert!(frame.left_down);
        assert_eq!(frame.position, Point::new(7, 3));
    }

    #[test]
    fn test_scroll_accumulates_per_frame() {
        let mut tracker = MouseTracker::new();
        tracker.handle(mouse(MouseEventKind::ScrollDown, 0, 0), ms(0));
        tracker.handle(mouse(MouseEventKind::ScrollDown, 0, 0), ms(1));
        tracker.handle(mouse(MouseEventKind::ScrollUp, 0, 0), ms(2));
        assert_eq!(tracker.snapshot(ms(16)).scroll_delta, 1);
        assert_eq!(tracker.snapshot(ms(32)).scroll_delta, 0);
    }

    #[test]
    fn test_all_mouse_buttons() {
        assert_eq!(convert_mouse_button(CrosstermMouseButton::Left), MouseButton::Left);
        assert_eq!(convert_mouse_button(CrosstermMouseButton::Right), MouseButton::Right);
        assert_eq!(convert_mouse_button(CrosstermMouseButton::Middle), MouseButton::Middle);
    }

    // -------------------------------------------------------------------------
    // Keyboard
    // -------------------------------------------------------------------------

    #[test]
    fn test_synthesized_release() {
        let mut tracker = KeyboardTracker::new();
        tracker.handle(key(KeyCode::Enter, KeyEventKind::Press, KeyModifiers::empty()));

        let frame = tracker.snapshot();
        assert!(frame.is_key_pressed(Key::Enter));
        assert!(frame.is_key_released(Key::Enter));
        assert!(!frame.is_key_down(Key::Enter));

        assert!(tracker.snapshot().is_empty());
    }

    #[test]
    fn test_real_release_events() {
        let mut tracker = KeyboardTracker::new().with_release_events();
        tracker.handle(key(KeyCode::Char('a'), KeyEventKind::Press, KeyModifiers::empty()));

        let frame = tracker.snapshot();
        assert!(frame.is_key_down(Key::Char('a')));
        assert!(!frame.is_key_released(Key::Char('a')));

        tracker.handle(key(KeyCode::Char('a'), KeyEventKind::Release, KeyModifiers::empty()));
        let frame = tracker.snapshot();
        assert!(frame.is_key_released(Key::Char('a')));
        assert!(!frame.is_key_down(Key::Char('a')));
    }

    #[test]
    fn test_back_tab_is_shift_tab() {
        let mut tracker = KeyboardTracker::new();
        tracker.handle(key(KeyCode::BackTab, KeyEventKind::Press, KeyModifiers::empty()));
        let frame = tracker.snapshot();
        assert!(frame.is_key_released(Key::Tab));
        assert!(frame.modifiers.shift);
    }

    #[test]
    fn test_modifiers_convert() {
        let mut tracker = KeyboardTracker::new();
        tracker.handle(key(
            KeyCode::Char('x'),
            KeyEventKind::Press,
            KeyModifiers::CONTROL | KeyModifiers::ALT,
        ));
        let frame = tracker.snapshot();
        assert!(frame.modifiers.ctrl);
        assert!(frame.modifiers.alt);
        assert!(!frame.modifiers.shift);
    }

    #[test]
    fn test_convert_key_codes() {
        let keys = [
            (KeyCode::Up, Key::Up),
            (KeyCode::Down, Key::Down),
            (KeyCode::Esc, Key::Escape),
            (KeyCode::F(5), Key::F(5)),
            (KeyCode::Char(' '), Key::SPACE),
        ];
        for (code, expected) in keys {
            assert_eq!(convert_key_code(code), Some(expected));
        }
        assert_eq!(convert_key_code(KeyCode::Null), None);
    }

    // -------------------------------------------------------------------------
    // Combined
    // -------------------------------------------------------------------------

    #[test]
    fn test_input_tracker_routes_events() {
        let mut input = InputTracker::new();
        let resize = input.handle(InputEvent::Resize(120, 40), ms(0));
        assert_eq!(resize, Some((120, 40)));

        input.handle(
            InputEvent::Mouse(mouse(MouseEventKind::Moved, 3, 4)),
            ms(1),
        );
        input.handle(
            InputEvent::Key(key(KeyCode::Tab, KeyEventKind::Press, KeyModifiers::empty())),
            ms(2),
        );

        let (mouse_state, keyboard_state) = input.frame(ms(16));
        assert_eq!(mouse_state.position, Point::new(3, 4));
        assert_eq!(mouse_state.time, ms(16));
        assert!(keyboard_state.is_key_released(Key::Tab));
    }
}

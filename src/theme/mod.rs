//! Theme - state-to-appearance mapping.
//!
//! Controls never compute colors. At redraw time they hand their current
//! `ControlStates` to a `ThemeStates` and paint whatever `Appearance` comes
//! back. A `Theme` bundles the state tables and glyph sets for every control
//! kind and is plain serde data, so hosts can load it from a config file.
//!
//! # Example
//!
//! ```ignore
//! use console_controls::theme::Theme;
//! use console_controls::ControlStates;
//!
//! let theme = Theme::default();
//! let look = theme.control.appearance(ControlStates::MOUSE_OVER);
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{BorderStyle, ControlStates, Rgba};

// =============================================================================
// Appearance
// =============================================================================

/// Foreground, background and fill glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appearance {
    pub foreground: Rgba,
    pub background: Rgba,
    pub glyph: char,
}

impl Appearance {
    pub const fn new(foreground: Rgba, background: Rgba) -> Self {
        Self {
            foreground,
            background,
            glyph: ' ',
        }
    }
}

// =============================================================================
// ThemeStates
// =============================================================================

/// One appearance per interaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeStates {
    pub normal: Appearance,
    pub disabled: Appearance,
    pub mouse_over: Appearance,
    pub mouse_down: Appearance,
    pub focused: Appearance,
    pub selected: Appearance,
}

impl ThemeStates {
    /// Every state looks the same.
    pub const fn uniform(appearance: Appearance) -> Self {
        Self {
            normal: appearance,
            disabled: appearance,
            mouse_over: appearance,
            mouse_down: appearance,
            focused: appearance,
            selected: appearance,
        }
    }

    /// Resolve a state set to one appearance.
    ///
    /// Precedence: disabled, mouse down, mouse over, focused, selected, normal.
    pub fn appearance(&self, states: ControlStates) -> Appearance {
        if states.contains(ControlStates::DISABLED) {
            self.disabled
        } else if states.is_mouse_down() {
            self.mouse_down
        } else if states.contains(ControlStates::MOUSE_OVER) {
            self.mouse_over
        } else if states.contains(ControlStates::FOCUSED) {
            self.focused
        } else if states.contains(ControlStates::SELECTED) {
            self.selected
        } else {
            self.normal
        }
    }
}

impl Default for ThemeStates {
    fn default() -> Self {
        let text = Rgba::rgb(220, 220, 220);
        let base = Rgba::rgb(30, 30, 46);
        Self {
            normal: Appearance::new(text, base),
            disabled: Appearance::new(Rgba::GRAY, base),
            mouse_over: Appearance::new(Rgba::WHITE, Rgba::rgb(60, 60, 90)),
            mouse_down: Appearance::new(base, Rgba::rgb(200, 200, 220)),
            focused: Appearance::new(Rgba::WHITE, Rgba::rgb(40, 70, 120)),
            selected: Appearance::new(Rgba::YELLOW, base),
        }
    }
}

// =============================================================================
// Glyph sets
// =============================================================================

/// Glyphs used by scroll bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollBarGlyphs {
    pub up: char,
    pub down: char,
    pub left: char,
    pub right: char,
    pub slider: char,
    pub track: char,
}

impl Default for ScrollBarGlyphs {
    fn default() -> Self {
        Self {
            up: '▲',
            down: '▼',
            left: '◄',
            right: '►',
            slider: '█',
            track: '░',
        }
    }
}

/// Check marks for check boxes and radio buttons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleGlyphs {
    pub checked: String,
    pub unchecked: String,
    pub radio_on: String,
    pub radio_off: String,
}

impl Default for ToggleGlyphs {
    fn default() -> Self {
        Self {
            checked: "[X]".to_string(),
            unchecked: "[ ]".to_string(),
            radio_on: "(*)".to_string(),
            radio_off: "( )".to_string(),
        }
    }
}

/// Extra colors for the table grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableColors {
    pub cell: Appearance,
    pub selected: Appearance,
    pub hover: Appearance,
}

impl Default for TableColors {
    fn default() -> Self {
        Self {
            cell: Appearance::new(Rgba::rgb(220, 220, 220), Rgba::rgb(24, 24, 36)),
            selected: Appearance::new(Rgba::BLACK, Rgba::rgb(120, 160, 220)),
            hover: Appearance::new(Rgba::WHITE, Rgba::rgb(60, 60, 90)),
        }
    }
}

// =============================================================================
// Theme
// =============================================================================

/// Appearance tables for every control kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Buttons, check boxes and radio buttons.
    pub control: ThemeStates,
    pub panel: ThemeStates,
    pub panel_border: BorderStyle,
    pub list_item: ThemeStates,
    pub tab_header: ThemeStates,
    pub scroll_bar: ThemeStates,
    pub scroll_bar_glyphs: ScrollBarGlyphs,
    pub toggle_glyphs: ToggleGlyphs,
    pub table: TableColors,
}

impl Default for Theme {
    fn default() -> Self {
        let panel = Appearance::new(Rgba::rgb(200, 200, 200), Rgba::rgb(24, 24, 36));
        Self {
            control: ThemeStates::default(),
            panel: ThemeStates {
                disabled: Appearance::new(Rgba::GRAY, panel.background),
                ..ThemeStates::uniform(panel)
            },
            panel_border: BorderStyle::None,
            list_item: ThemeStates::default(),
            tab_header: ThemeStates::default(),
            scroll_bar: ThemeStates::default(),
            scroll_bar_glyphs: ScrollBarGlyphs::default(),
            toggle_glyphs: ToggleGlyphs::default(),
            table: TableColors::default(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

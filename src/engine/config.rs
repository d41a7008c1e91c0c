//! Serializable control settings.
//!
//! `ControlConfig` captures the settings a host usually wants to persist or
//! load from a file (geometry, flags, tab order, theme override). Applying
//! one goes through the same validation as the individual setters.

use serde::{Deserialize, Serialize};

use crate::controls::Control;
use crate::theme::ThemeStates;
use crate::types::Point;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    pub name: Option<String>,
    pub position: Point,
    pub width: i32,
    pub height: i32,
    pub can_resize: bool,
    pub enabled: bool,
    pub visible: bool,
    pub tab_stop: bool,
    pub tab_index: i32,
    pub theme: Option<ThemeStates>,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            name: None,
            position: Point::ZERO,
            width: 1,
            height: 1,
            can_resize: true,
            enabled: true,
            visible: true,
            tab_stop: true,
            tab_index: 0,
            theme: None,
        }
    }
}

impl From<&Control> for ControlConfig {
    fn from(control: &Control) -> Self {
        let base = control.base();
        Self {
            name: base.name().map(str::to_string),
            position: base.position(),
            width: base.width(),
            height: base.height(),
            can_resize: base.can_resize(),
            enabled: base.is_enabled(),
            visible: base.is_visible(),
            tab_stop: base.tab_stop(),
            tab_index: base.tab_index(),
            theme: base.theme().copied(),
        }
    }
}

//! ScrollBar - integer value mapped onto a slider track.
//!
//! The bar is `length` cells long: one button at each end and a track of
//! `length - 2` cells between them. The slider sits on one track cell; a
//! two-cell bar has no track and no slider, only its buttons.
//!
//! Value and slider position are linked by two functions:
//!
//! - [`slider_position_for`] maps a value onto the track. The endpoints own
//!   the end cells exclusively (0 and the maximum, nothing else), interior
//!   values are spread over the cells in between.
//! - [`value_for_position`] maps a track cell back to a value such that
//!   `slider_position_for(value_for_position(p))` lands on `p` whenever some
//!   value is displayed there.
//!
//! Dragging goes through mouse capture: pressing on the slider captures the
//! bar in the host, and from then on every frame drives the slider until the
//! left button is released.

use tracing::debug;

use super::base::{MouseFrame, Outbox};
use super::{Control, ControlKind};
use crate::engine::{ControlId, EventKind};
use crate::error::{ControlError, Result};
use crate::renderer::Surface;
use crate::state::{Host, MouseState};
use crate::theme::{Theme, ThemeStates};
use crate::types::{ControlStates, Orientation, Point, Rect};

/// Shortest bar: the two buttons with no track between them.
pub const MIN_LENGTH: i32 = 2;

// =============================================================================
// Mapping
// =============================================================================

/// Track cell (0-based) showing `value`.
///
/// `track` is the number of track cells. Only 0 maps to the first cell and
/// only `maximum` maps to the last one. With fewer than three track cells
/// there is no interior, so interior values snap to the nearer end.
pub fn slider_position_for(value: i32, maximum: i32, track: i32) -> i32 {
    if track <= 1 || value <= 0 {
        return 0;
    }
    if value >= maximum {
        return track - 1;
    }

    // round(track * value / maximum) in integers
    let (value, maximum, track64) = (value as i64, maximum as i64, track as i64);
    let scaled = ((2 * track64 * value + maximum) / (2 * maximum)) as i32;

    if track <= 2 {
        scaled.clamp(0, track - 1)
    } else {
        scaled.clamp(1, track - 2)
    }
}

/// Value for a slider dropped on track cell `position`.
///
/// Starts from `maximum * position / track` and walks to the closest value
/// whose slider lands on `position`.
pub fn value_for_position(position: i32, maximum: i32, track: i32) -> i32 {
    if track <= 0 || position <= 0 {
        return 0;
    }
    if position >= track - 1 {
        return maximum;
    }
    if maximum <= 1 {
        // Only the endpoints exist; pick the nearer one
        return if position <= track - 1 - position { 0 } else { maximum };
    }

    let estimate = (maximum as i64 * position as i64 / track as i64) as i32;
    let mut value = estimate.clamp(1, maximum - 1);
    while slider_position_for(value, maximum, track) < position && value < maximum - 1 {
        value += 1;
    }
    while slider_position_for(value, maximum, track) > position && value > 1 {
        value -= 1;
    }
    value
}

// =============================================================================
// ScrollBar
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollBar {
    orientation: Orientation,
    length: i32,
    value: i32,
    maximum: i32,
    step: i32,
    slider_position: i32,
}

impl ScrollBar {
    /// A bar `length` cells long whose maximum is `length - 1`.
    pub fn new(orientation: Orientation, length: i32) -> Result<Self> {
        check_length(length)?;
        Ok(Self {
            orientation,
            length,
            value: 0,
            maximum: length - 1,
            step: 1,
            slider_position: 0,
        })
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn length(&self) -> i32 {
        self.length
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn maximum(&self) -> i32 {
        self.maximum
    }

    pub fn step(&self) -> i32 {
        self.step
    }

    /// Track cell the slider is drawn on.
    pub fn slider_position(&self) -> i32 {
        self.slider_position
    }

    /// Cells between the two end buttons.
    pub fn track_length(&self) -> i32 {
        self.length - 2
    }

    /// Width and height of a bar of this orientation and length.
    pub(crate) fn size(&self) -> (i32, i32) {
        match self.orientation {
            Orientation::Horizontal => (self.length, 1),
            Orientation::Vertical => (1, self.length),
        }
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Clamp and store a value, raising `ValueChanged` on change.
    pub(crate) fn change_value(&mut self, value: i32, out: &mut Outbox) {
        let value = value.clamp(0, self.maximum);
        if value == self.value {
            return;
        }
        let previous = std::mem::replace(&mut self.value, value);
        self.slider_position = slider_position_for(value, self.maximum, self.track_length());
        out.raise(EventKind::ValueChanged {
            previous,
            current: value,
        });
        out.invalidate();
    }

    /// Maximum is at least 1; the value is clamped into the new range.
    pub(crate) fn change_maximum(&mut self, maximum: i32, out: &mut Outbox) {
        let maximum = maximum.max(1);
        if maximum == self.maximum {
            return;
        }
        self.maximum = maximum;
        self.slider_position = slider_position_for(self.value.min(maximum), maximum, self.track_length());
        out.invalidate();
        if self.value > maximum {
            let previous = std::mem::replace(&mut self.value, maximum);
            out.raise(EventKind::ValueChanged {
                previous,
                current: maximum,
            });
        }
    }

    pub(crate) fn change_length(&mut self, length: i32, out: &mut Outbox) -> Result<()> {
        check_length(length)?;
        self.length = length;
        self.slider_position = slider_position_for(self.value, self.maximum, self.track_length());
        out.invalidate();
        Ok(())
    }

    /// Move the slider to a track cell, snapping it to the value's cell.
    fn drop_slider(&mut self, position: i32, out: &mut Outbox) {
        let track = self.track_length();
        if track <= 0 {
            return;
        }
        let position = position.clamp(0, track - 1);
        let value = value_for_position(position, self.maximum, track);
        self.change_value(value, out);
        let snapped = slider_position_for(self.value, self.maximum, track);
        if snapped != self.slider_position {
            self.slider_position = snapped;
            out.invalidate();
        }
    }

    // =========================================================================
    // Mouse
    // =========================================================================

    /// Buttons, wheel, track clicks and slider drag.
    ///
    /// Returns false while another control holds the capture.
    pub(crate) fn process_mouse(
        &mut self,
        id: ControlId,
        frame: MouseFrame,
        relative: Point,
        mouse: &MouseState,
        host: &mut Host,
        out: &mut Outbox,
    ) -> bool {
        let along = self.orientation.along(relative);
        let across = self.orientation.across(relative);

        match host.captured_control() {
            Some(captured) if captured == id => {
                if !mouse.left_down {
                    host.release_control();
                    debug!(?id, value = self.value, "scroll bar drag finished");
                    return false;
                }
                self.drop_slider(along - 1, out);
                true
            }
            Some(_) => false,
            None => {
                if !frame.over {
                    return false;
                }

                if mouse.scroll_delta != 0 {
                    self.change_value(self.value + mouse.scroll_delta.signum() * self.step, out);
                } else if mouse.left_clicked && frame.click_allowed {
                    if along == 0 {
                        self.change_value(self.value - self.step, out);
                    } else if along == self.length - 1 {
                        self.change_value(self.value + self.step, out);
                    } else if along - 1 != self.slider_position {
                        self.drop_slider(along - 1, out);
                    }
                } else if mouse.left_down
                    && frame.click_allowed
                    && self.track_length() > 0
                    && across == 0
                    && along == self.slider_position + 1
                    && host.capture_control(id)
                {
                    debug!(?id, "scroll bar drag started");
                }
                true
            }
        }
    }

    // =========================================================================
    // Redraw
    // =========================================================================

    pub(crate) fn redraw(
        &self,
        surface: &mut dyn Surface,
        states: ControlStates,
        theme: &Theme,
        custom: Option<&ThemeStates>,
    ) {
        let look = custom.unwrap_or(&theme.scroll_bar).appearance(states);
        let glyphs = &theme.scroll_bar_glyphs;
        let (width, height) = self.size();
        surface.fill(Rect::sized(width, height), look.foreground, look.background, glyphs.track);

        let (start, end) = match self.orientation {
            Orientation::Horizontal => (glyphs.left, glyphs.right),
            Orientation::Vertical => (glyphs.up, glyphs.down),
        };
        let cell = |along: i32| match self.orientation {
            Orientation::Horizontal => (along, 0),
            Orientation::Vertical => (0, along),
        };

        let (x, y) = cell(0);
        surface.print(x, y, &start.to_string(), look.foreground, look.background);
        let (x, y) = cell(self.length - 1);
        surface.print(x, y, &end.to_string(), look.foreground, look.background);
        if self.track_length() > 0 {
            let (x, y) = cell(self.slider_position + 1);
            surface.print(x, y, &glyphs.slider.to_string(), look.foreground, look.background);
        }
    }
}

fn check_length(length: i32) -> Result<()> {
    if length < MIN_LENGTH {
        return Err(ControlError::ScrollBarTooShort {
            length,
            minimum: MIN_LENGTH,
        });
    }
    Ok(())
}

// =============================================================================
// Control API
// =============================================================================

impl Control {
    /// A scroll bar `length` cells long.
    pub fn scroll_bar(orientation: Orientation, length: i32) -> Result<Control> {
        let bar = ScrollBar::new(orientation, length)?;
        let (width, height) = bar.size();
        let mut control = Control::new(ControlKind::ScrollBar(bar), width, height);
        control.base.min_width = width;
        control.base.min_height = height;
        Ok(control)
    }

    pub fn as_scroll_bar(&self) -> Option<&ScrollBar> {
        match &self.kind {
            ControlKind::ScrollBar(bar) => Some(bar),
            _ => None,
        }
    }

    fn scroll_bar_parts(&mut self) -> Result<(&mut ScrollBar, &mut Outbox)> {
        let found = self.kind_name();
        match &mut self.kind {
            ControlKind::ScrollBar(bar) => Ok((bar, &mut self.base.outbox)),
            _ => Err(ControlError::WrongKind {
                expected: "scroll bar",
                found,
            }),
        }
    }

    /// Set the scroll bar value (clamped to `0..=maximum`).
    pub fn set_value(&mut self, value: i32) -> Result<()> {
        let (bar, out) = self.scroll_bar_parts()?;
        bar.change_value(value, out);
        Ok(())
    }

    /// Set the scroll bar maximum (at least 1).
    pub fn set_maximum(&mut self, maximum: i32) -> Result<()> {
        let (bar, out) = self.scroll_bar_parts()?;
        bar.change_maximum(maximum, out);
        Ok(())
    }

    /// Amount moved by the end buttons and the wheel.
    pub fn set_step(&mut self, step: i32) -> Result<()> {
        let (bar, _) = self.scroll_bar_parts()?;
        bar.step = step.max(1);
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

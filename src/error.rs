//! Contract-violation errors.
//!
//! Soft conditions (pointer outside every control, values past their range)
//! are clamped where they happen and never reach this type.

use thiserror::Error;

use crate::engine::ControlId;

/// Programmer errors raised by tree and control operations.
///
/// Every operation that returns one of these leaves the tree untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControlError {
    /// Handle does not refer to a live control
    #[error("unknown control {0:?}")]
    UnknownControl(ControlId),

    /// Scroll bar track too short for two end buttons and a slider
    #[error("scroll bar length {length} is below the minimum of {minimum}")]
    ScrollBarTooShort { length: i32, minimum: i32 },

    /// Resize requested on a control that does not allow it
    #[error("control {0:?} cannot be resized")]
    NotResizable(ControlId),

    /// Resize below the control's minimum size
    #[error("size {width}x{height} is below the minimum of {min_width}x{min_height}")]
    BelowMinimumSize {
        width: i32,
        height: i32,
        min_width: i32,
        min_height: i32,
    },

    /// Item index outside the collection
    #[error("item index {index} is out of range for {len} items")]
    ItemOutOfRange { index: usize, len: usize },

    /// Selecting an item that is not in the collection
    #[error("item {0:?} is not in the collection")]
    ItemNotFound(String),

    /// Tab index outside the tab list
    #[error("tab index {index} is out of range for {len} tabs")]
    TabOutOfRange { index: usize, len: usize },

    /// Parent cannot hold children
    #[error("control {0:?} does not accept children")]
    NotAContainer(ControlId),

    /// Attaching would make a control its own ancestor
    #[error("attaching {child:?} to {parent:?} would create a cycle")]
    Cycle { parent: ControlId, child: ControlId },

    /// Another sibling already uses this name
    #[error("control name {0:?} is already used in this container")]
    DuplicateName(String),

    /// Operation does not apply to this kind of control
    #[error("expected a {expected} control, found a {found}")]
    WrongKind {
        expected: &'static str,
        found: &'static str,
    },

    /// Child is owned by its container and cannot be moved or removed alone
    #[error("control {0:?} is part of its container and cannot be detached")]
    OwnedChild(ControlId),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ControlError>;

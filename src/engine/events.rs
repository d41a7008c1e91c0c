//! Control events.
//!
//! Controls never call back into application code. They append events to the
//! tree's queue, and the host loop drains the queue after each tick. Every
//! event is raised once per edge (enter, exit, value change), never once per
//! frame while a condition holds.

use super::ControlId;
use crate::types::{ControlStates, Point};

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// Unsuppressed left click, or keyboard activation of a button.
    Click,
    /// Unsuppressed right click.
    RightClick,
    MouseEnter,
    MouseExit,
    /// Pointer moved while over the control (relative position).
    MouseMove(Point),
    StateChanged {
        previous: ControlStates,
        current: ControlStates,
    },
    IsDirtyChanged(bool),
    Focused,
    Unfocused,
    PositionChanged {
        previous: Point,
        current: Point,
    },
    Resized {
        width: i32,
        height: i32,
    },
    /// Scroll bar value change.
    ValueChanged {
        previous: i32,
        current: i32,
    },
    /// Check box / radio button toggled.
    IsSelectedChanged(bool),
    SelectedItemChanged {
        index: Option<usize>,
    },
    SelectedItemExecuted {
        index: usize,
    },
    ActiveTabChanged {
        previous: usize,
        current: usize,
    },
    CellEnter {
        row: usize,
        column: usize,
    },
    CellExit {
        row: usize,
        column: usize,
    },
    CellLeftClick {
        row: usize,
        column: usize,
    },
    CellRightClick {
        row: usize,
        column: usize,
    },
    CellDoubleClick {
        row: usize,
        column: usize,
    },
    SelectedCellChanged {
        previous: Option<(usize, usize)>,
        current: Option<(usize, usize)>,
    },
}

/// An event and the control that raised it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlEvent {
    pub source: ControlId,
    pub kind: EventKind,
}

/// FIFO of raised events.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Vec<ControlEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, source: ControlId, kind: EventKind) {
        self.events.push(ControlEvent { source, kind });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events not yet drained.
    pub fn as_slice(&self) -> &[ControlEvent] {
        &self.events
    }

    /// Events raised at or after `start`.
    pub fn since(&self, start: usize) -> &[ControlEvent] {
        self.events.get(start..).unwrap_or(&[])
    }

    /// Take every queued event.
    pub fn drain(&mut self) -> Vec<ControlEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Registry;

    #[test]
    fn test_queue_is_fifo_and_drains() {
        let mut registry = Registry::new();
        let id = registry.insert(());

        let mut queue = EventQueue::new();
        queue.push(id, EventKind::MouseEnter);
        queue.push(id, EventKind::Click);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.since(1)[0].kind, EventKind::Click);
        assert!(queue.since(5).is_empty());

        let drained = queue.drain();
        assert_eq!(drained[0].kind, EventKind::MouseEnter);
        assert!(queue.is_empty());
    }
}

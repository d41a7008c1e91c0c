//! Control Registry - Slot allocation for the control arena.
//!
//! Manages the lifecycle of control handles:
//! - Free slot pool for O(1) reuse
//! - Generation counters so a stale handle never reaches a reused slot
//! - Allocation-order iteration for deterministic traversal

// =============================================================================
// Handles
// =============================================================================

/// Stable handle to a control in a tree.
///
/// Handles stay valid until the control is removed. A removed handle never
/// resolves again, even after its slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId {
    index: u32,
    generation: u32,
}

impl ControlId {
    /// Slot index (stable for the handle's lifetime).
    #[inline]
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

// =============================================================================
// Registry
// =============================================================================

#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Generational arena.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Allocate a slot for `value`, reusing a freed one when possible.
    pub fn insert(&mut self, value: T) -> ControlId {
        self.len += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            return ControlId {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        ControlId { index, generation: 0 }
    }

    /// Release a slot back to the pool.
    pub fn remove(&mut self, id: ControlId) -> Option<T> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        Some(value)
    }

    /// Check if a handle is live.
    pub fn contains(&self, id: ControlId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: ControlId) -> Option<&T> {
        let slot = self.slots.get(id.index())?;
        if slot.generation != id.generation {
            return None;
        }
        slot.value.as_ref()
    }

    pub fn get_mut(&mut self, id: ControlId) -> Option<&mut T> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation {
            return None;
        }
        slot.value.as_mut()
    }

    /// Live handles in slot order.
    pub fn ids(&self) -> impl Iterator<Item = ControlId> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.value.as_ref().map(|_| ControlId {
                index: i as u32,
                generation: slot.generation,
            })
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

//! Generational slot storage for bodies.
//!
//! Handles stay valid until their body is removed. A removed slot may be
//! reused, but the generation bump makes old handles resolve to `None`
//! instead of silently pointing at the newcomer.

use serde::{Deserialize, Serialize};

/// Stable reference to a body owned by a physics backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyHandle {
    index: u32,
    generation: u32,
}

impl BodyHandle {
    /// Slot index (useful for debugging).
    pub fn index(self) -> u32 {
        self.index
    }
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

pub struct BodyArena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    /// Live handles in registration order.
    order: Vec<BodyHandle>,
}

impl<T> BodyArena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            order: Vec::new(),
        }
    }

    pub fn insert(&mut self, value: T) -> BodyHandle {
        let handle = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.value = Some(value);
                BodyHandle {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    value: Some(value),
                });
                BodyHandle {
                    index,
                    generation: 0,
                }
            }
        };
        self.order.push(handle);
        handle
    }

    pub fn remove(&mut self, handle: BodyHandle) -> Option<T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.order.retain(|h| *h != handle);
        Some(value)
    }

    pub fn get(&self, handle: BodyHandle) -> Option<&T> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_ref()
    }

    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_mut()
    }

    /// Handles of live bodies, oldest registration first.
    pub fn handles(&self) -> &[BodyHandle] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<T> Default for BodyArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

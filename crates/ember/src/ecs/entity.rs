//! # Entity — Monotonic Identifiers
//!
//! An [`Entity`] is just a number. It carries no data; the
//! [`World`](super::world::World) maps entities to their components.
//!
//! ## Design: No Recycling
//!
//! Ids come from a counter that only moves forward. Despawning an entity
//! retires its id for good, so a stale `Entity` held by a system can never
//! alias a newer entity. That removes the need for generation counters:
//!
//! ```text
//! create → 0, create → 1, despawn(0), create → 2   (0 is never handed out again)
//! ```
//!
//! The price is a finite id space. Running out of `u32` ids is treated as
//! fatal rather than wrapping around to 0.

use std::fmt;

use crate::error::EcsError;

/// A lightweight handle to an entity in the [`World`](super::world::World).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity(pub(crate) u32);

impl Entity {
    /// Returns the raw id.
    pub fn index(self) -> u32 {
        self.0
    }

    /// Rebuild a handle from a raw id. The world does not check that it ever
    /// issued this id.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out entity ids in strictly increasing order.
pub(crate) struct EntityAllocator {
    /// The next id to hand out. Kept wider than `u32` so "every id used" is
    /// representable.
    next: u64,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    #[cfg(test)]
    pub(crate) fn starting_at(next: u32) -> Self {
        Self { next: next as u64 }
    }

    /// Allocate the next id.
    pub fn allocate(&mut self) -> Result<Entity, EcsError> {
        let id = u32::try_from(self.next).map_err(|_| EcsError::IdsExhausted(self.next))?;
        self.next += 1;
        Ok(Entity(id))
    }

    /// Number of ids handed out so far (assuming a fresh start at 0).
    pub fn issued(&self) -> u64 {
        self.next
    }
}

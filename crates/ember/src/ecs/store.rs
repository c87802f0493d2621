//! Per-type component storage.

use std::collections::HashMap;

use super::component::Component;
use super::entity::Entity;

/// All instances of one component type, keyed by entity.
///
/// At most one instance per entity: inserting again replaces.
#[derive(Default)]
pub(crate) struct ComponentStore {
    entries: HashMap<Entity, Component>,
}

impl ComponentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace, returning the old instance.
    pub fn insert(&mut self, entity: Entity, component: Component) -> Option<Component> {
        self.entries.insert(entity, component)
    }

    pub fn remove(&mut self, entity: Entity) -> Option<Component> {
        self.entries.remove(&entity)
    }

    pub fn get(&self, entity: Entity) -> Option<&Component> {
        self.entries.get(&entity)
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut Component> {
        self.entries.get_mut(&entity)
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.entries.contains_key(&entity)
    }

    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Keep only the instances `keep` accepts. Returns how many were dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(&Component) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, component| keep(component));
        before - self.entries.len()
    }
}

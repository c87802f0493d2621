//! # World — The Central Container
//!
//! The [`World`] owns the entity id counter, one [`ComponentStore`] per
//! component type, and the [`ComponentRegistry`] used to turn names and data
//! into component instances.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │ World                                               │
//! │                                                     │
//! │  EntityAllocator: monotonic ids, never recycled     │
//! │                                                     │
//! │  stores: HashMap<String, ComponentStore>            │
//! │    key   = component type name                      │
//! │    value = HashMap<Entity, Component>               │
//! │                                                     │
//! │  registry: ComponentRegistry                        │
//! │    name → ComponentType (schema + hook)             │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Queries
//!
//! A query names K component types. The matching entities are the
//! intersection of the K stores' key sets; for each, the K instances are
//! handed out in the requested order. Stores are plain maps, so there is no
//! archetype bookkeeping: attaching a component makes the entity show up in
//! the next query that asks for it, and nothing else needs to happen.
//!
//! [`query`](World::query) materializes shared borrows. [`query_mut`](World::query_mut)
//! takes the world exclusively and runs a closure per match, which is how
//! systems mutate component data in place.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use super::component::{Component, StaticComponent};
use super::entity::{Entity, EntityAllocator};
use super::registry::ComponentRegistry;
use super::schema::{ComponentType, ConstructionHook};
use super::store::ComponentStore;
use crate::error::{ComponentError, EcsError, LoadError};
use crate::loader::{self, EntityDefinition, EntityLoadReport, SchemaLoadReport};

/// The central container for all game state.
pub struct World {
    allocator: EntityAllocator,
    /// One store per component type name.
    stores: HashMap<String, ComponentStore>,
    registry: ComponentRegistry,
}

/// One query match: an entity and its components, in requested order.
#[derive(Debug)]
pub struct QueryRow<'w> {
    pub entity: Entity,
    pub components: Vec<&'w Component>,
}

impl<'w> QueryRow<'w> {
    /// The `i`-th requested component.
    ///
    /// # Panics
    ///
    /// Panics if `i` is not less than the number of requested types.
    pub fn component(&self, i: usize) -> &'w Component {
        self.components[i]
    }
}

/// Why a component entry of a definition was not attached.
#[derive(Debug, PartialEq)]
pub enum SkipReason {
    /// No component type with that name is registered.
    Unregistered,
    /// The supplied data didn't fit the schema.
    Invalid(ComponentError),
}

#[derive(Debug, PartialEq)]
pub struct SkippedComponent {
    pub component: String,
    pub reason: SkipReason,
}

/// What happened when an [`EntityDefinition`] was turned into an entity.
#[derive(Debug)]
pub struct SpawnReport {
    pub entity: Entity,
    /// The definition's name.
    pub name: String,
    /// Component types attached, in definition order.
    pub attached: Vec<String>,
    /// Entries that were skipped, each with a reason. These were also logged
    /// as warnings.
    pub skipped: Vec<SkippedComponent>,
}

impl SpawnReport {
    pub fn has_warnings(&self) -> bool {
        !self.skipped.is_empty()
    }
}

impl World {
    /// An empty world with an empty registry.
    pub fn new() -> Self {
        Self::with_registry(ComponentRegistry::new())
    }

    /// A world built around an existing registry.
    pub fn with_registry(registry: ComponentRegistry) -> Self {
        Self {
            allocator: EntityAllocator::new(),
            stores: HashMap::new(),
            registry,
        }
    }

    /// A world with the built-in component types registered.
    pub fn with_core_components() -> Self {
        let mut registry = ComponentRegistry::new();
        crate::builtin::register_core_components(&mut registry);
        Self::with_registry(registry)
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    // ── Component Types ──────────────────────────────────────────────

    /// Register a component type.
    ///
    /// Replaces any type of the same name and returns it. Stored instances
    /// of that name whose field names and kinds don't match the new type are
    /// dropped, whether or not a type was registered before. Instances that
    /// still conform are kept, so changing only a default keeps them all.
    pub fn register_component(
        &mut self,
        ty: impl Into<Arc<ComponentType>>,
    ) -> Option<Arc<ComponentType>> {
        let ty: Arc<ComponentType> = ty.into();
        let previous = self.registry.register(Arc::clone(&ty));

        if let Some(store) = self.stores.get_mut(ty.name()) {
            let dropped = store.retain(|component| ty.conforms(component));
            if dropped > 0 {
                log::warn!(
                    "Component type '{}' registered with a new shape; dropped {} stored instance(s)",
                    ty.name(),
                    dropped
                );
            }
        }
        previous
    }

    /// Register a compiled-in component type.
    pub fn register_static<T: StaticComponent>(&mut self) -> Option<Arc<ComponentType>> {
        self.register_component(T::component_type())
    }

    /// Load and register one schema file.
    pub fn load_schema_file(
        &mut self,
        path: impl AsRef<Path>,
    ) -> Result<Arc<ComponentType>, LoadError> {
        let ty = Arc::new(loader::read_schema_file(path)?);
        self.register_component(Arc::clone(&ty));
        Ok(ty)
    }

    /// Register every `*.json` schema in a directory. See
    /// [`ComponentRegistry::load_from_schema_directory`]; this variant also
    /// applies the store policy of [`register_component`](Self::register_component).
    pub fn load_schema_directory(
        &mut self,
        dir: impl AsRef<Path>,
    ) -> Result<SchemaLoadReport, LoadError> {
        loader::register_schema_dir(dir, |ty| {
            self.register_component(ty);
        })
    }

    // ── Entities ─────────────────────────────────────────────────────

    /// Allocate a new entity id.
    ///
    /// # Panics
    ///
    /// Panics if the `u32` id space is exhausted. Ids are never recycled, so
    /// this is unrecoverable; use [`try_create_entity`](Self::try_create_entity)
    /// to observe it as an error instead.
    pub fn create_entity(&mut self) -> Entity {
        match self.try_create_entity() {
            Ok(entity) => entity,
            Err(e) => panic!("{e}"),
        }
    }

    /// Allocate a new entity id, reporting exhaustion as an error.
    pub fn try_create_entity(&mut self) -> Result<Entity, EcsError> {
        self.allocator.allocate()
    }

    /// Number of entity ids handed out so far, including despawned ones.
    pub fn entity_count(&self) -> u64 {
        self.allocator.issued()
    }

    /// Remove every component of an entity. The id is retired, not reused.
    ///
    /// Returns `true` if the entity had any components.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        let mut removed = false;
        for store in self.stores.values_mut() {
            removed |= store.remove(entity).is_some();
        }
        removed
    }

    // ── Components ───────────────────────────────────────────────────

    /// Attach a component, replacing any instance of the same type on that
    /// entity. Returns the replaced instance.
    ///
    /// The entity is not checked against this world's allocator.
    pub fn add_component(&mut self, entity: Entity, component: Component) -> Option<Component> {
        self.stores
            .entry(component.type_name().to_string())
            .or_insert_with(ComponentStore::new)
            .insert(entity, component)
    }

    /// Attach a compiled-in component.
    pub fn add<T: StaticComponent>(
        &mut self,
        entity: Entity,
        value: T,
    ) -> Result<Option<Component>, ComponentError> {
        let component = Component::from_static(&value)?;
        Ok(self.add_component(entity, component))
    }

    pub fn get(&self, entity: Entity, type_name: &str) -> Option<&Component> {
        self.stores.get(type_name)?.get(entity)
    }

    pub fn get_mut(&mut self, entity: Entity, type_name: &str) -> Option<&mut Component> {
        self.stores.get_mut(type_name)?.get_mut(entity)
    }

    pub fn has(&self, entity: Entity, type_name: &str) -> bool {
        self.stores
            .get(type_name)
            .is_some_and(|store| store.contains(entity))
    }

    /// Read a component back as its compiled-in type. Returns `None` if the
    /// entity doesn't have it or the record no longer converts.
    pub fn get_as<T: StaticComponent>(&self, entity: Entity) -> Option<T> {
        let component = self.get(entity, T::NAME)?;
        match component.to_static::<T>() {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Entity {entity}: {e}");
                None
            }
        }
    }

    pub fn remove_component(&mut self, entity: Entity, type_name: &str) -> Option<Component> {
        self.stores.get_mut(type_name)?.remove(entity)
    }

    /// Component type names attached to an entity, sorted.
    pub fn component_names(&self, entity: Entity) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .stores
            .iter()
            .filter(|(_, store)| store.contains(entity))
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Number of instances stored for a type (0 if it has no store).
    pub fn store_len(&self, type_name: &str) -> usize {
        self.stores.get(type_name).map_or(0, ComponentStore::len)
    }

    // ── Definitions ──────────────────────────────────────────────────

    /// Create an entity from a definition.
    ///
    /// Each component entry is resolved through the registry and validated
    /// against its schema. Entries that can't be resolved or built are logged
    /// and skipped; the rest are attached. The entity is created even if every
    /// entry is skipped.
    ///
    /// Types with a [`ConstructionHook::SeedFrom`] copy fields from the named
    /// source component *of the same definition*, for every target field the
    /// entry doesn't set explicitly. This happens once, here.
    pub fn create_entity_from_definition(&mut self, definition: &EntityDefinition) -> SpawnReport {
        let entity = self.create_entity();
        let mut report = SpawnReport {
            entity,
            name: definition.name.clone(),
            attached: Vec::new(),
            skipped: Vec::new(),
        };

        for (type_name, data) in &definition.components {
            let Some(ty) = self.registry.resolve(type_name) else {
                log::warn!(
                    "Entity '{}': component '{}' not registered; skipping it.",
                    definition.name,
                    type_name
                );
                report.skipped.push(SkippedComponent {
                    component: type_name.clone(),
                    reason: SkipReason::Unregistered,
                });
                continue;
            };

            let mut component = match ty.instantiate(data) {
                Ok(c) => c,
                Err(e) => {
                    log::warn!("Entity '{}': {e}; skipping it.", definition.name);
                    report.skipped.push(SkippedComponent {
                        component: type_name.clone(),
                        reason: SkipReason::Invalid(e),
                    });
                    continue;
                }
            };

            if let ConstructionHook::SeedFrom { source, fields } = ty.hook() {
                self.seed_from_definition(&mut component, data, definition, source, fields);
            }

            self.add_component(entity, component);
            report.attached.push(type_name.clone());
        }

        log::info!("Created entity '{}' with ID {}", definition.name, entity);
        report
    }

    /// Apply a `SeedFrom` hook using the source entry of the same definition.
    fn seed_from_definition(
        &self,
        component: &mut Component,
        data: &serde_json::Value,
        definition: &EntityDefinition,
        source: &str,
        fields: &[(String, String)],
    ) {
        let Some(source_data) = definition.components.get(source) else {
            return;
        };
        let Some(source_ty) = self.registry.resolve(source) else {
            return;
        };
        // A bad source entry is reported when that entry itself is built.
        let Ok(source_component) = source_ty.instantiate(source_data) else {
            return;
        };

        let explicit = data.as_object();
        for (target, from) in fields {
            if explicit.is_some_and(|obj| obj.contains_key(target)) {
                continue;
            }
            let Some(value) = source_component.get(from) else {
                continue;
            };
            if !component.set(target, value.clone()) {
                log::debug!(
                    "Cannot seed '{}.{}' from '{}.{}'",
                    component.type_name(),
                    target,
                    source,
                    from
                );
            }
        }
    }

    /// Load one entity definition file and create its entity.
    pub fn spawn_from_file(&mut self, path: impl AsRef<Path>) -> Result<SpawnReport, LoadError> {
        let definition = loader::read_entity_definition(path)?;
        Ok(self.create_entity_from_definition(&definition))
    }

    /// Create an entity for every `*.json` definition in a directory.
    ///
    /// A file that can't be read or parsed is logged, listed in the report,
    /// and creates no entity.
    pub fn load_entity_directory(
        &mut self,
        dir: impl AsRef<Path>,
    ) -> Result<EntityLoadReport, LoadError> {
        let mut report = EntityLoadReport::default();
        for path in loader::json_files_in(dir.as_ref())? {
            match self.spawn_from_file(&path) {
                Ok(spawned) => report.spawned.push(spawned),
                Err(e) => {
                    log::warn!("Skipping entity file: {e}");
                    report.failures.push(e);
                }
            }
        }
        Ok(report)
    }

    // ── Query ────────────────────────────────────────────────────────

    /// All entities that have every one of `types`, with their components in
    /// the same order as `types`.
    ///
    /// A type with no store simply matches nothing. Entities come back in
    /// ascending id order, but callers should treat the result as a set.
    ///
    /// # Panics
    ///
    /// Panics if `types` is empty or names a type twice.
    pub fn query(&self, types: &[&str]) -> Vec<QueryRow<'_>> {
        check_query_types(types);
        let Some(stores) = types
            .iter()
            .map(|t| self.stores.get(*t))
            .collect::<Option<Vec<_>>>()
        else {
            return Vec::new();
        };

        matching_entities(&stores)
            .into_iter()
            .filter_map(|entity| {
                let components = stores
                    .iter()
                    .map(|s| s.get(entity))
                    .collect::<Option<Vec<_>>>()?;
                Some(QueryRow { entity, components })
            })
            .collect()
    }

    /// Entities matching `types`, without their components.
    ///
    /// # Panics
    ///
    /// Same conditions as [`query`](Self::query).
    pub fn query_entities(&self, types: &[&str]) -> Vec<Entity> {
        self.query(types).into_iter().map(|row| row.entity).collect()
    }

    /// Run `f` on every entity that has all of `types`, with mutable access
    /// to its components (in the order of `types`).
    ///
    /// # Example
    ///
    /// ```ignore
    /// world.query_mut(&["Position", "Velocity"], |_, row| {
    ///     let [pos, vel] = row else { return };
    ///     let x = pos.get_f64("x").unwrap() + vel.get_f64("dx").unwrap() * dt;
    ///     pos.set("x", x);
    /// });
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `types` is empty or names a type twice.
    pub fn query_mut(&mut self, types: &[&str], mut f: impl FnMut(Entity, &mut [&mut Component])) {
        check_query_types(types);
        if !types.iter().all(|t| self.stores.contains_key(*t)) {
            return;
        }

        // Take the stores out so each can be borrowed mutably at the same time.
        let mut extracted: Vec<(String, ComponentStore)> = types
            .iter()
            .filter_map(|t| self.stores.remove_entry(*t))
            .collect();

        let matched = {
            let stores: Vec<&ComponentStore> = extracted.iter().map(|(_, s)| s).collect();
            matching_entities(&stores)
        };

        for entity in matched {
            let row = extracted
                .iter_mut()
                .map(|(_, s)| s.get_mut(entity))
                .collect::<Option<Vec<_>>>();
            if let Some(mut row) = row {
                f(entity, &mut row);
            }
        }

        for (name, store) in extracted {
            self.stores.insert(name, store);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

fn check_query_types(types: &[&str]) {
    assert!(!types.is_empty(), "query needs at least one component type");
    for (i, t) in types.iter().enumerate() {
        assert!(
            !types[..i].contains(t),
            "query lists component type `{t}` more than once"
        );
    }
}

/// Intersection of the stores' entity sets, ascending.
fn matching_entities(stores: &[&ComponentStore]) -> Vec<Entity> {
    let Some(smallest) = stores.iter().min_by_key(|s| s.len()) else {
        return Vec::new();
    };
    let mut matched: Vec<Entity> = smallest
        .entities()
        .filter(|&e| stores.iter().all(|s| s.contains(e)))
        .collect();
    matched.sort_unstable();
    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::{PlayerControlled, Position, Renderable, Velocity};
    use crate::ecs::FieldKind;
    use serde_json::json;

    fn health_type() -> ComponentType {
        ComponentType::new("Health")
            .field("current", FieldKind::Int)
            .field("max", FieldKind::Int)
    }

    fn health(current: i64, max: i64) -> Component {
        health_type()
            .instantiate(&json!({ "current": current, "max": max }))
            .unwrap()
    }

    fn sorted(mut entities: Vec<Entity>) -> Vec<Entity> {
        entities.sort();
        entities
    }

    #[test]
    fn entity_ids_strictly_increase() {
        let mut world = World::new();
        let ids: Vec<_> = (0..50).map(|_| world.create_entity()).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(ids[0].index(), 0);
        assert_eq!(world.entity_count(), 50);
    }

    #[test]
    fn despawned_ids_are_not_reused() {
        let mut world = World::with_core_components();
        let e0 = world.create_entity();
        world.add(e0, PlayerControlled).unwrap();
        assert!(world.despawn(e0));
        let e1 = world.create_entity();
        assert_ne!(e0, e1);
        assert!(world.query(&["PlayerControlled"]).is_empty());
    }

    #[test]
    fn despawn_without_components_returns_false() {
        let mut world = World::new();
        let e = world.create_entity();
        assert!(!world.despawn(e));
    }

    #[test]
    fn add_then_query_returns_same_instance() {
        let mut world = World::new();
        let e = world.create_entity();
        world.add_component(e, health(5, 10));

        let rows = world.query(&["Health"]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].entity, e);
        assert_eq!(rows[0].components, vec![&health(5, 10)]);
    }

    #[test]
    fn add_twice_overwrites() {
        let mut world = World::new();
        let e = world.create_entity();
        assert!(world.add_component(e, health(1, 10)).is_none());
        let replaced = world.add_component(e, health(2, 10));
        assert_eq!(replaced, Some(health(1, 10)));

        let rows = world.query(&["Health"]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].component(0), &health(2, 10));
    }

    #[test]
    fn query_requires_all_types() {
        let mut world = World::with_core_components();
        let e = world.create_entity();
        world.add(e, Position { x: 1.0, y: 2.0 }).unwrap();
        assert!(world.query(&["Position", "Velocity"]).is_empty());

        world.add(e, Velocity { dx: 0.0, dy: 0.0 }).unwrap();
        assert_eq!(world.query_entities(&["Position", "Velocity"]), vec![e]);
    }

    #[test]
    fn query_intersection_is_a_set() {
        let mut world = World::with_core_components();
        let a = world.create_entity();
        let b = world.create_entity();
        let c = world.create_entity();
        for &e in &[a, b, c] {
            world.add(e, Position::default()).unwrap();
        }
        world.add(b, Velocity::default()).unwrap();
        world.add(c, Velocity::default()).unwrap();

        let matched = sorted(world.query_entities(&["Velocity", "Position"]));
        assert_eq!(matched, vec![b, c]);
    }

    #[test]
    fn query_unknown_type_is_empty_not_error() {
        let mut world = World::with_core_components();
        let e = world.create_entity();
        world.add(e, Position::default()).unwrap();
        assert!(world.query(&["Nothing"]).is_empty());
        assert!(world.query(&["Position", "Nothing"]).is_empty());
        // Registered but never stored.
        assert!(world.query(&["Velocity"]).is_empty());
    }

    #[test]
    fn query_three_types_keeps_request_order() {
        let mut world = World::with_core_components();
        for i in 0..4 {
            let e = world.create_entity();
            world.add(e, Position { x: i as f64, y: 0.0 }).unwrap();
            world.add(e, Velocity { dx: 1.0, dy: 1.0 }).unwrap();
            if i % 2 == 0 {
                world.add(e, Renderable::default()).unwrap();
            }
        }

        let rows = world.query(&["Renderable", "Position", "Velocity"]);
        assert_eq!(rows.len(), 2);
        for row in &rows {
            let names: Vec<_> = row.components.iter().map(|c| c.type_name()).collect();
            assert_eq!(names, vec!["Renderable", "Position", "Velocity"]);
        }
    }

    #[test]
    fn query_mut_changes_are_visible_to_later_queries() {
        let mut world = World::with_core_components();
        let e = world.create_entity();
        world.add(e, Position { x: 0.0, y: 0.0 }).unwrap();
        world.add(e, Velocity { dx: 1.0, dy: 2.0 }).unwrap();

        world.query_mut(&["Position", "Velocity"], |_, row| {
            let [pos, vel] = row else { return };
            let x = pos.get_f64("x").unwrap() + vel.get_f64("dx").unwrap();
            let y = pos.get_f64("y").unwrap() + vel.get_f64("dy").unwrap();
            pos.set("x", x);
            pos.set("y", y);
        });

        assert_eq!(world.get_as::<Position>(e), Some(Position { x: 1.0, y: 2.0 }));
        // Stores are back in place after the mutable query.
        assert_eq!(world.store_len("Position"), 1);
        assert_eq!(world.store_len("Velocity"), 1);
    }

    #[test]
    fn query_mut_missing_store_does_nothing() {
        let mut world = World::with_core_components();
        let e = world.create_entity();
        world.add(e, Position::default()).unwrap();

        let mut calls = 0;
        world.query_mut(&["Position", "Velocity"], |_, _| calls += 1);
        assert_eq!(calls, 0);
        assert_eq!(world.store_len("Position"), 1);
    }

    #[test]
    #[should_panic(expected = "at least one component type")]
    fn empty_query_panics() {
        World::new().query(&[]);
    }

    #[test]
    #[should_panic(expected = "more than once")]
    fn duplicate_query_type_panics() {
        let mut world = World::new();
        world.query_mut(&["Health", "Health"], |_, _| {});
    }

    #[test]
    fn health_schema_scenario() {
        let mut world = World::new();
        world.register_component(health_type());

        let e = world.create_entity();
        let ty = world.registry().resolve("Health").unwrap();
        world.add_component(e, ty.instantiate(&json!({ "current": 5, "max": 10 })).unwrap());

        let rows = world.query(&["Health"]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].entity, Entity::from_raw(0));
        let h = rows[0].component(0);
        assert_eq!(h.get_f64("current"), Some(5.0));
        assert_eq!(h.get_f64("max"), Some(10.0));
    }

    #[test]
    fn renderable_seeded_from_position() {
        let mut world = World::with_core_components();
        let def = EntityDefinition::new("Player")
            .with("Position", json!({ "x": 50, "y": 50 }))
            .with("Renderable", json!({ "shape_type": "Rectangle" }));

        let report = world.create_entity_from_definition(&def);
        assert!(!report.has_warnings());
        assert_eq!(report.attached, vec!["Position", "Renderable"]);

        let r = world.get_as::<Renderable>(report.entity).unwrap();
        assert_eq!((r.x, r.y), (50.0, 50.0));
        assert_eq!(r.shape_type, "Rectangle");
    }

    #[test]
    fn seeding_works_regardless_of_entry_order() {
        let mut world = World::with_core_components();
        let def = EntityDefinition::new("Box")
            .with("Renderable", json!({}))
            .with("Position", json!({ "x": 3, "y": 4 }));

        let e = world.create_entity_from_definition(&def).entity;
        let r = world.get_as::<Renderable>(e).unwrap();
        assert_eq!((r.x, r.y), (3.0, 4.0));
    }

    #[test]
    fn explicit_anchor_wins_over_seed() {
        let mut world = World::with_core_components();
        let def = EntityDefinition::new("Box")
            .with("Position", json!({ "x": 50, "y": 50 }))
            .with("Renderable", json!({ "x": 1 }));

        let e = world.create_entity_from_definition(&def).entity;
        let r = world.get_as::<Renderable>(e).unwrap();
        assert_eq!((r.x, r.y), (1.0, 50.0));
    }

    #[test]
    fn seeding_is_one_time() {
        let mut world = World::with_core_components();
        let def = EntityDefinition::new("Box")
            .with("Position", json!({ "x": 50, "y": 50 }))
            .with("Renderable", json!({}));
        let e = world.create_entity_from_definition(&def).entity;

        world.get_mut(e, "Position").unwrap().set("x", 99.0);
        let r = world.get_as::<Renderable>(e).unwrap();
        assert_eq!(r.x, 50.0);
    }

    #[test]
    fn unregistered_component_is_skipped_with_warning() {
        let mut world = World::with_core_components();
        let def = EntityDefinition::new("Odd")
            .with("Position", json!({ "x": 1, "y": 2 }))
            .with("Foo", json!({ "bar": 1 }))
            .with("Velocity", json!({ "dx": 3 }));

        let report = world.create_entity_from_definition(&def);
        assert_eq!(report.attached, vec!["Position", "Velocity"]);
        assert_eq!(
            report.skipped,
            vec![SkippedComponent {
                component: "Foo".into(),
                reason: SkipReason::Unregistered,
            }]
        );

        let e = report.entity;
        assert!(world.has(e, "Position"));
        assert!(world.has(e, "Velocity"));
        assert!(world.query(&["Foo"]).is_empty());
        assert!(world.query(&["Position", "Foo"]).is_empty());
        assert_eq!(world.query_entities(&["Position", "Velocity"]), vec![e]);
    }

    #[test]
    fn invalid_component_data_is_skipped() {
        let mut world = World::with_core_components();
        let def = EntityDefinition::new("Bad")
            .with("Position", json!({ "x": "far" }))
            .with("Velocity", json!({ "dx": 1 }));

        let report = world.create_entity_from_definition(&def);
        assert_eq!(report.attached, vec!["Velocity"]);
        assert!(matches!(
            report.skipped[0].reason,
            SkipReason::Invalid(ComponentError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn unknown_shape_skips_only_the_renderable() {
        let mut world = World::with_core_components();
        let def = EntityDefinition::new("Fruit")
            .with("Position", json!({ "x": 1, "y": 2 }))
            .with("Renderable", json!({ "shape_type": "Banana" }))
            .with("Velocity", json!({ "dx": 3 }));

        let report = world.create_entity_from_definition(&def);
        assert_eq!(report.attached, vec!["Position", "Velocity"]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].component, "Renderable");
        assert!(matches!(
            report.skipped[0].reason,
            SkipReason::Invalid(ComponentError::UnknownValue { .. })
        ));
        assert!(!world.has(report.entity, "Renderable"));
    }

    #[test]
    fn empty_definition_still_creates_entity() {
        let mut world = World::new();
        let def = EntityDefinition::new("Ghost").with("Foo", json!({}));
        let report = world.create_entity_from_definition(&def);
        assert_eq!(report.entity.index(), 0);
        assert!(report.attached.is_empty());
        assert_eq!(world.entity_count(), 1);
    }

    #[test]
    fn reregistering_new_shape_clears_store() {
        let mut world = World::new();
        world.register_component(health_type());
        let e = world.create_entity();
        world.add_component(e, health(5, 10));

        let old = world.register_component(ComponentType::new("Health").field("hp", FieldKind::Int));
        assert!(old.is_some());
        assert_eq!(world.store_len("Health"), 0);
        assert!(world.query(&["Health"]).is_empty());
    }

    #[test]
    fn reregistering_same_shape_keeps_store() {
        let mut world = World::new();
        world.register_component(health_type());
        let e = world.create_entity();
        world.add_component(e, health(5, 10));

        world.register_component(health_type());
        assert_eq!(world.store_len("Health"), 1);
    }

    #[test]
    fn changing_only_a_default_keeps_store() {
        let mut world = World::new();
        world.register_component(health_type());
        let e = world.create_entity();
        world.add_component(e, health(5, 10));

        world.register_component(
            ComponentType::new("Health")
                .field("current", FieldKind::Int)
                .field_with_default("max", 100i64),
        );
        assert_eq!(world.store_len("Health"), 1);
        assert_eq!(world.get(e, "Health"), Some(&health(5, 10)));
    }

    #[test]
    fn first_registration_drops_instances_of_another_shape() {
        let mut world = World::new();
        let ad_hoc = ComponentType::new("Health").field("hp", FieldKind::Int);
        let stale = world.create_entity();
        world.add_component(stale, ad_hoc.instantiate(&json!({ "hp": 3 })).unwrap());
        let fits = world.create_entity();
        world.add_component(fits, health(5, 10));

        assert!(world.register_component(health_type()).is_none());

        assert_eq!(world.query_entities(&["Health"]), vec![fits]);
        let rows = world.query(&["Health"]);
        let names: Vec<_> = rows[0].component(0).fields().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["current", "max"]);
    }

    #[test]
    fn schema_directory_applies_store_policy() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("health.json"),
            r#"{ "name": "Health", "fields": { "hp": "int" } }"#,
        )
        .unwrap();

        let mut world = World::new();
        world.register_component(health_type());
        let e = world.create_entity();
        world.add_component(e, health(5, 10));

        let report = world.load_schema_directory(dir.path()).unwrap();
        assert_eq!(report.registered, vec!["Health"]);
        assert_eq!(world.store_len("Health"), 0);
    }

    #[test]
    fn try_create_entity_reports_exhaustion() {
        let mut world = World::new();
        world.allocator = EntityAllocator::starting_at(u32::MAX);
        assert_eq!(world.try_create_entity().unwrap().index(), u32::MAX);
        assert!(matches!(
            world.try_create_entity(),
            Err(EcsError::IdsExhausted(_))
        ));
    }

    #[test]
    #[should_panic(expected = "exhausted")]
    fn create_entity_panics_when_exhausted() {
        let mut world = World::new();
        world.allocator = EntityAllocator::starting_at(u32::MAX);
        world.create_entity();
        world.create_entity();
    }

    #[test]
    fn remove_component_and_names() {
        let mut world = World::with_core_components();
        let e = world.create_entity();
        world.add(e, Position::default()).unwrap();
        world.add(e, Velocity::default()).unwrap();
        assert_eq!(world.component_names(e), vec!["Position", "Velocity"]);

        assert!(world.remove_component(e, "Velocity").is_some());
        assert!(world.remove_component(e, "Velocity").is_none());
        assert_eq!(world.component_names(e), vec!["Position"]);
    }

    #[test]
    fn load_schema_and_entity_directories() {
        let schemas = tempfile::tempdir().unwrap();
        std::fs::write(
            schemas.path().join("health.json"),
            r#"{ "name": "Health", "fields": { "current": "int", "max": "int" } }"#,
        )
        .unwrap();

        let entities = tempfile::tempdir().unwrap();
        std::fs::write(
            entities.path().join("a_player.json"),
            r#"{ "name": "Player", "components": { "Position": { "x": 50, "y": 50 }, "Health": { "current": 5, "max": 10 } } }"#,
        )
        .unwrap();
        std::fs::write(entities.path().join("b_broken.json"), "{").unwrap();

        let mut world = World::with_core_components();
        let schema_report = world.load_schema_directory(schemas.path()).unwrap();
        assert_eq!(schema_report.registered, vec!["Health"]);

        let report = world.load_entity_directory(entities.path()).unwrap();
        assert_eq!(report.spawned.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.spawned[0].name, "Player");

        let rows = world.query(&["Health", "Position"]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].component(0).get_f64("current"), Some(5.0));
    }
}

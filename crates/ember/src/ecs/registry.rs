//! # Component Type Registry
//!
//! Maps a component type name to its [`ComponentType`]. This is the explicit
//! registration list the rest of the engine resolves names against: static
//! types are added by direct calls, dynamic types by the schema loader. There
//! is no discovery by introspection, so what's registered is exactly what was
//! asked for.
//!
//! ```ignore
//! let mut registry = ComponentRegistry::new();
//! registry.register_static::<Position>();
//! let report = registry.load_from_schema_directory("assets/components")?;
//!
//! let health = registry.resolve("Health").expect("loaded from schema");
//! let c = health.instantiate(&json!({ "current": 5, "max": 10 }))?;
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use super::component::StaticComponent;
use super::schema::{ComponentType, ConstructionHook};
use crate::error::LoadError;
use crate::loader::{self, SchemaLoadReport};

/// Name → component type lookup.
#[derive(Default, Clone)]
pub struct ComponentRegistry {
    types: HashMap<String, Arc<ComponentType>>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component type under its name.
    ///
    /// Upsert: a type already registered under the same name is replaced and
    /// returned. The registry does not know about stored instances; use
    /// [`World::register_component`](super::World::register_component) to
    /// keep stores consistent with the registry.
    pub fn register(&mut self, ty: impl Into<Arc<ComponentType>>) -> Option<Arc<ComponentType>> {
        let ty: Arc<ComponentType> = ty.into();
        let previous = self.types.insert(ty.name().to_string(), ty);
        if let Some(prev) = &previous {
            log::debug!("Component type '{}' re-registered", prev.name());
        }
        previous
    }

    /// Register a compiled-in component type.
    pub fn register_static<T: StaticComponent>(&mut self) -> Option<Arc<ComponentType>> {
        self.register(T::component_type())
    }

    /// Look up a type by name. `None` just means "not registered".
    pub fn resolve(&self, name: &str) -> Option<Arc<ComponentType>> {
        self.types.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// The construction hook of a registered type.
    pub fn hook(&self, name: &str) -> Option<&ConstructionHook> {
        self.types.get(name).map(|ty| ty.hook())
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Load and register a single schema file.
    pub fn load_schema_file(
        &mut self,
        path: impl AsRef<Path>,
    ) -> Result<Arc<ComponentType>, LoadError> {
        let ty = Arc::new(loader::read_schema_file(path)?);
        self.register(Arc::clone(&ty));
        Ok(ty)
    }

    /// Register every `*.json` schema in a directory.
    ///
    /// Files that fail to load are logged and listed in the report; types
    /// from the other files are still registered. The order files are
    /// processed in is unspecified.
    pub fn load_from_schema_directory(
        &mut self,
        dir: impl AsRef<Path>,
    ) -> Result<SchemaLoadReport, LoadError> {
        loader::register_schema_dir(dir, |ty| {
            self.register(ty);
        })
    }
}

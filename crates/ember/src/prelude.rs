//! Convenience re-exports — `use ember::prelude::*` for the common items.

pub use crate::app::{App, CorePlugin, Plugin, StartupReport};
pub use crate::builtin::{
    PlayerControlled, Position, Renderable, SHAPE_TYPES, Velocity, core_component_types,
    movement_system, register_core_components, render_sync_system,
};
pub use crate::config::{Config, WindowConfig};
pub use crate::ecs::{
    Component, ComponentRegistry, ComponentType, ConstructionHook, Entity, FieldDef, FieldKind,
    QueryRow, Schedule, SpawnReport, StaticComponent, System, Value, World,
};
pub use crate::error::{ComponentError, EcsError, LoadError};
pub use crate::loader::{EntityDefinition, EntityLoadReport, SchemaLoadReport};
pub use crate::time::Time;

//! # Map-Based ECS With Runtime Schemas
//!
//! Component types here are data, not Rust types. A [`ComponentType`] is a
//! name plus an ordered list of typed fields, and a [`Component`] is a record
//! of [`Value`]s that conforms to one. That lets a game declare new component
//! types in JSON without recompiling, while compiled-in types go through the
//! same path via [`StaticComponent`].
//!
//! ## Module Overview
//!
//! - [`value`] — Field kinds and tagged field values
//! - [`schema`] — Component type descriptors and construction hooks
//! - [`component`] — Component instances and the `StaticComponent` bridge
//! - [`registry`] — Name → type lookup, schema directory loading
//! - [`entity`] — Monotonic entity IDs
//! - [`store`] — Per-type entity → component maps
//! - [`world`] — Central container, definition pipeline, queries
//! - [`system`] — System trait and schedule runner

pub mod component;
pub mod entity;
pub mod registry;
pub mod schema;
pub(crate) mod store;
pub mod system;
pub mod value;
pub mod world;

pub use component::{Component, StaticComponent};
pub use entity::Entity;
pub use registry::ComponentRegistry;
pub use schema::{ComponentType, ConstructionHook, FieldDef};
pub use system::{Schedule, System};
pub use value::{FieldKind, Value};
pub use world::{QueryRow, SkipReason, SkippedComponent, SpawnReport, World};

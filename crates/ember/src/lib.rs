//! # Ember — Data-Driven ECS Core
//!
//! A small entity-component-system for 2D games where component types can be
//! compiled in *or* described by JSON schema files that are loaded at startup.
//! Entities themselves are built from JSON definition files, and gameplay
//! systems find their data with multi-component queries.
//!
//! Start with `use ember::prelude::*` and build an [`App`](app::App), or drive
//! a [`World`](ecs::World) directly.

pub mod app;
pub mod builtin;
pub mod config;
pub mod ecs;
pub mod error;
pub mod loader;
pub mod prelude;
pub mod time;

//! # Built-in Components and Systems
//!
//! The compiled-in component types every game gets, plus the two systems that
//! tie them together each tick:
//!
//! - [`movement_system`] — integrates [`Velocity`] into [`Position`].
//! - [`render_sync_system`] — copies [`Position`] into the [`Renderable`]'s
//!   anchor. This is the only place position and visual state are
//!   reconciled; drawing itself happens outside the ECS.
//!
//! [`Renderable`] carries a [`ConstructionHook::SeedFrom`] so that an entity
//! definition with a `Position` starts out with its shape in the right place,
//! before the first render sync runs.

use serde::{Deserialize, Serialize};

use crate::ecs::{
    ComponentRegistry, ComponentType, ConstructionHook, FieldKind, StaticComponent, World,
};

/// Position of an entity in 2D space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl StaticComponent for Position {
    const NAME: &'static str = "Position";

    fn component_type() -> ComponentType {
        ComponentType::new(Self::NAME)
            .field("x", FieldKind::Float)
            .field("y", FieldKind::Float)
    }
}

/// Velocity in units per second.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Velocity {
    pub dx: f64,
    pub dy: f64,
}

impl StaticComponent for Velocity {
    const NAME: &'static str = "Velocity";

    fn component_type() -> ComponentType {
        ComponentType::new(Self::NAME)
            .field("dx", FieldKind::Float)
            .field("dy", FieldKind::Float)
    }
}

/// Shapes the drawing side knows how to build. A `Renderable` with any other
/// `shape_type` fails construction.
pub const SHAPE_TYPES: &[&str] = &[
    "Rectangle", "Circle", "Ellipse", "Line", "Triangle", "Star", "Arc",
];

/// What to draw for an entity. `x`/`y` is the shape's anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Renderable {
    pub shape_type: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: String,
}

impl Default for Renderable {
    fn default() -> Self {
        Self {
            shape_type: "Rectangle".to_string(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            color: "#ffffff".to_string(),
        }
    }
}

impl StaticComponent for Renderable {
    const NAME: &'static str = "Renderable";

    fn component_type() -> ComponentType {
        ComponentType::new(Self::NAME)
            .field_with_default("shape_type", "Rectangle")
            .field("x", FieldKind::Float)
            .field("y", FieldKind::Float)
            .field("width", FieldKind::Float)
            .field("height", FieldKind::Float)
            .field_with_default("color", "#ffffff")
            .one_of("shape_type", SHAPE_TYPES.iter().copied())
            .with_hook(ConstructionHook::SeedFrom {
                source: Position::NAME.to_string(),
                fields: vec![
                    ("x".to_string(), "x".to_string()),
                    ("y".to_string(), "y".to_string()),
                ],
            })
    }
}

/// Tag marking the entity the player controls.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerControlled;

impl StaticComponent for PlayerControlled {
    const NAME: &'static str = "PlayerControlled";

    fn component_type() -> ComponentType {
        ComponentType::new(Self::NAME)
    }
}

/// The built-in component types.
pub fn core_component_types() -> [ComponentType; 4] {
    [
        Position::component_type(),
        Velocity::component_type(),
        Renderable::component_type(),
        PlayerControlled::component_type(),
    ]
}

/// Register all built-in component types.
pub fn register_core_components(registry: &mut ComponentRegistry) {
    for ty in core_component_types() {
        registry.register(ty);
    }
}

/// Move every entity with a position and a velocity.
pub fn movement_system(world: &mut World, dt: f32) {
    let dt = f64::from(dt);
    world.query_mut(&[Position::NAME, Velocity::NAME], |_, row| {
        let [pos, vel] = row else { return };
        let dx = vel.get_f64("dx").unwrap_or(0.0);
        let dy = vel.get_f64("dy").unwrap_or(0.0);
        let x = pos.get_f64("x").unwrap_or(0.0) + dx * dt;
        let y = pos.get_f64("y").unwrap_or(0.0) + dy * dt;
        if !(pos.set("x", x) && pos.set("y", y)) {
            log::debug!("movement: Position has no float x/y; left unchanged");
        }
    });
}

/// Copy each entity's position into its renderable's anchor.
pub fn render_sync_system(world: &mut World, _dt: f32) {
    world.query_mut(&[Position::NAME, Renderable::NAME], |entity, row| {
        let [pos, renderable] = row else { return };
        for axis in ["x", "y"] {
            if let Some(v) = pos.get_f64(axis) {
                if !renderable.set(axis, v) {
                    log::debug!("render sync: cannot set Renderable.{axis} on entity {entity}");
                }
            }
        }
    });
}

//! App builder and tick driver.
//!
//! The [`App`] wires the pieces together: config → registry → world →
//! schedule. It loads schemas and entity definitions once at startup, then
//! runs its systems once per tick. There is no window here; the app is a
//! headless driver, and a frontend only needs to call [`App::tick`].
//!
//! ## Example
//!
//! ```ignore
//! use ember::prelude::*;
//!
//! fn main() -> Result<(), LoadError> {
//!     let mut app = App::from_config_file("game.json")?
//!         .add_system(print_positions);
//!     app.run_ticks(120);
//!     Ok(())
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use crate::builtin::{core_component_types, movement_system, render_sync_system};
use crate::config::Config;
use crate::ecs::system::{Schedule, System};
use crate::ecs::world::World;
use crate::error::LoadError;
use crate::loader::{EntityLoadReport, SchemaLoadReport};
use crate::time::Time;

/// A plugin can register component types and add systems to the app.
pub trait Plugin {
    fn build(&self, app: &mut App);
}

/// The app. Configure it, then drive it with [`tick`](App::tick) or
/// [`run_ticks`](App::run_ticks).
pub struct App {
    pub world: World,
    pub systems: Schedule,
    time: Time,
    config: Config,
}

/// What startup loading did, for callers that want more than the log.
#[derive(Debug, Default)]
pub struct StartupReport {
    pub schemas: Option<SchemaLoadReport>,
    pub entities: Option<EntityLoadReport>,
}

impl App {
    /// Create an app with an empty world and no systems.
    pub fn new() -> Self {
        Self::with_config(Config {
            core_components: false,
            ..Config::default()
        })
    }

    /// Create an app from a config, without touching the filesystem.
    ///
    /// With `core_components` set, the [`CorePlugin`] is applied.
    pub fn with_config(config: Config) -> Self {
        let mut app = Self {
            world: World::new(),
            systems: Schedule::new(),
            time: Time::new(),
            config,
        };
        if app.config.core_components {
            CorePlugin.build(&mut app);
        }
        app
    }

    /// Read a config file, build the app and run [`startup`](Self::startup).
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let mut app = Self::with_config(Config::load(path)?);
        app.startup()?;
        Ok(app)
    }

    /// Load the configured schema directory, then the configured entity
    /// directory.
    ///
    /// Schemas come first so entity definitions can use the types they
    /// declare. Per-file problems are logged and collected in the report;
    /// only an unreadable directory is an error.
    pub fn startup(&mut self) -> Result<StartupReport, LoadError> {
        let mut report = StartupReport::default();
        if let Some(dir) = self.config.schema_dir.clone() {
            report.schemas = Some(self.world.load_schema_directory(&dir)?);
        }
        if let Some(dir) = self.config.entity_dir.clone() {
            let entities = self.world.load_entity_directory(&dir)?;
            log::info!(
                "Spawned {} entit(ies) from '{}', {} file(s) failed",
                entities.spawned.len(),
                dir.display(),
                entities.failures.len()
            );
            report.entities = Some(entities);
        }
        Ok(report)
    }

    /// Add a system that runs every tick, after the ones already added.
    pub fn add_system<S: System + 'static>(mut self, system: S) -> Self {
        self.systems.add_system(system);
        self
    }

    /// Apply a plugin.
    pub fn add_plugin<P: Plugin>(mut self, plugin: P) -> Self {
        plugin.build(&mut self);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn time(&self) -> &Time {
        &self.time
    }

    /// Run every system once with the given delta (seconds).
    pub fn tick(&mut self, dt: f32) {
        let delta = Duration::try_from_secs_f32(dt.max(0.0)).unwrap_or_else(|_| {
            log::warn!("Tick delta {dt} is not a valid duration; counting it as zero");
            Duration::ZERO
        });
        self.time.advance(delta);
        self.systems.run(&mut self.world, dt);
    }

    /// Run `n` ticks at the configured fixed step, as fast as possible.
    pub fn run_ticks(&mut self, n: u64) {
        let dt = self.config.tick_interval().as_secs_f32();
        for _ in 0..n {
            self.tick(dt);
        }
        log::debug!("Ran {n} tick(s), {:.3}s simulated", self.time.elapsed_secs());
    }

    /// Run in real time, paced to the configured tick rate, until `done`
    /// returns true. Systems receive the measured wall-clock delta.
    pub fn run_until(&mut self, mut done: impl FnMut(&App) -> bool) {
        let interval = self.config.tick_interval();
        self.time.reset_frame_start();
        while !done(self) {
            let frame_start = std::time::Instant::now();
            self.time.update();
            let dt = self.time.delta_secs();
            self.systems.run(&mut self.world, dt);
            if let Some(rest) = interval.checked_sub(frame_start.elapsed()) {
                std::thread::sleep(rest);
            }
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Built-in component types plus the movement and render-sync systems.
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        for ty in core_component_types() {
            app.world.register_component(ty);
        }
        app.systems.add_system(movement_system);
        app.systems.add_system(render_sync_system);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::{Position, Renderable, Velocity};
    use crate::loader::EntityDefinition;
    use serde_json::json;

    #[test]
    fn new_app_is_empty() {
        let app = App::new();
        assert!(app.world.registry().is_empty());
        assert!(app.systems.is_empty());
    }

    #[test]
    fn default_config_installs_core_plugin() {
        let app = App::with_config(Config::default());
        assert!(app.world.registry().contains("Position"));
        assert!(app.world.registry().contains("PlayerControlled"));
        assert_eq!(
            app.systems.system_names(),
            vec!["movement_system", "render_sync_system"]
        );
    }

    #[test]
    fn tick_moves_and_syncs() {
        let mut app = App::with_config(Config::default());
        let def = EntityDefinition::new("Ball")
            .with("Position", json!({ "x": 10, "y": 20 }))
            .with("Velocity", json!({ "dx": 4, "dy": -2 }))
            .with("Renderable", json!({}));
        let e = app.world.create_entity_from_definition(&def).entity;

        app.tick(0.5);

        let pos: Position = app.world.get_as(e).unwrap();
        assert_eq!((pos.x, pos.y), (12.0, 19.0));
        let r: Renderable = app.world.get_as(e).unwrap();
        assert_eq!((r.x, r.y), (12.0, 19.0));
        assert_eq!(app.time().frame_count(), 1);
    }

    #[test]
    fn unrepresentable_delta_counts_as_zero() {
        let mut app = App::new();
        app.tick(f32::INFINITY);
        app.tick(f32::NAN);
        assert_eq!(app.time().frame_count(), 2);
        assert_eq!(app.time().elapsed(), Duration::ZERO);
    }

    #[test]
    fn core_plugin_matches_core_component_list() {
        let app = App::with_config(Config::default());
        let mut expected: Vec<String> = core_component_types()
            .iter()
            .map(|ty| ty.name().to_string())
            .collect();
        expected.sort();
        assert_eq!(app.world.registry().names(), expected);
    }

    #[test]
    fn run_ticks_uses_fixed_step() {
        let mut app = App::with_config(Config {
            tick_rate: 4.0,
            ..Config::default()
        });
        let e = app.world.create_entity();
        app.world.add(e, Position { x: 0.0, y: 0.0 }).unwrap();
        app.world.add(e, Velocity { dx: 1.0, dy: 0.0 }).unwrap();

        app.run_ticks(8);

        let pos: Position = app.world.get_as(e).unwrap();
        assert!((pos.x - 2.0).abs() < 1e-5);
        assert_eq!(app.time().frame_count(), 8);
    }

    #[test]
    fn startup_loads_schemas_before_entities() {
        let dir = tempfile::tempdir().unwrap();
        let components = dir.path().join("components");
        let entities = dir.path().join("entities");
        std::fs::create_dir(&components).unwrap();
        std::fs::create_dir(&entities).unwrap();
        std::fs::write(
            components.join("health.json"),
            r#"{ "name": "Health", "fields": { "current": "int", "max": "int" } }"#,
        )
        .unwrap();
        std::fs::write(
            entities.join("player.json"),
            r#"{ "name": "Player", "components": {
                "Position": { "x": 50, "y": 50 },
                "Health": { "current": 5, "max": 10 }
            } }"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("game.json"),
            r#"{ "schema_dir": "components", "entity_dir": "entities" }"#,
        )
        .unwrap();

        let app = App::from_config_file(dir.path().join("game.json")).unwrap();
        let rows = app.world.query(&["Health", "Position"]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].component(0).get_f64("current"), Some(5.0));
    }

    #[test]
    fn missing_entity_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::with_config(Config {
            entity_dir: Some(dir.path().join("nope")),
            ..Config::default()
        });
        assert!(app.startup().is_err());
    }

    struct CountingPlugin;

    impl Plugin for CountingPlugin {
        fn build(&self, app: &mut App) {
            app.systems.add_system(|world: &mut World, _dt: f32| {
                world.create_entity();
            });
        }
    }

    #[test]
    fn plugin_systems_run_each_tick() {
        let mut app = App::new().add_plugin(CountingPlugin);
        app.tick(0.016);
        app.tick(0.016);
        assert_eq!(app.world.entity_count(), 2);
    }
}

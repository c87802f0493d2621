//! # System — Functions That Operate on the World
//!
//! A system is a function that takes the world and the frame's delta time:
//! `FnMut(&mut World, f32)`. It queries entities, mutates components, maybe
//! creates entities, and returns nothing. All communication between systems
//! goes through component data.
//!
//! ## Schedule
//!
//! A [`Schedule`] is an ordered list of systems. [`Schedule::run`] executes
//! each one to completion, in the order they were added, once per tick. There
//! is no parallelism and no dependency graph; order of registration is the
//! order of execution.

use super::world::World;

/// A system that can be executed on a [`World`].
///
/// Any `FnMut(&mut World, f32)` implements this trait, so plain functions and
/// closures work directly.
pub trait System {
    fn run(&mut self, world: &mut World, dt: f32);
}

impl<F: FnMut(&mut World, f32)> System for F {
    fn run(&mut self, world: &mut World, dt: f32) {
        (self)(world, dt);
    }
}

/// A boxed [`System`] with a short name for logs and diagnostics.
struct NamedSystem {
    name: String,
    system: Box<dyn System>,
}

/// Per-system timing recorded during a single tick.
#[cfg(feature = "diagnostics")]
#[derive(Debug, Clone)]
pub struct SystemTiming {
    pub name: String,
    pub duration_us: f64,
}

/// An ordered list of systems to run.
pub struct Schedule {
    systems: Vec<NamedSystem>,
    /// Per-system timings from the most recent `run()` call.
    #[cfg(feature = "diagnostics")]
    timings: Vec<SystemTiming>,
}

impl Schedule {
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
            #[cfg(feature = "diagnostics")]
            timings: Vec::new(),
        }
    }

    /// Add a system to the end of the schedule.
    pub fn add_system<S: System + 'static>(&mut self, system: S) {
        let name = short_system_name(std::any::type_name::<S>());
        log::debug!("Scheduled system '{name}'");
        self.systems.push(NamedSystem {
            name,
            system: Box::new(system),
        });
    }

    /// Run all systems in order on the given world.
    pub fn run(&mut self, world: &mut World, dt: f32) {
        #[cfg(feature = "diagnostics")]
        {
            self.timings.clear();
            for ns in &mut self.systems {
                let start = std::time::Instant::now();
                ns.system.run(world, dt);
                let elapsed = start.elapsed();
                self.timings.push(SystemTiming {
                    name: ns.name.clone(),
                    duration_us: elapsed.as_secs_f64() * 1_000_000.0,
                });
            }
        }
        #[cfg(not(feature = "diagnostics"))]
        {
            for ns in &mut self.systems {
                ns.system.run(world, dt);
            }
        }
    }

    /// Timings from the most recent [`run`](Self::run), in execution order.
    #[cfg(feature = "diagnostics")]
    pub fn timings(&self) -> &[SystemTiming] {
        &self.timings
    }

    /// Names of the scheduled systems, in execution order.
    pub fn system_names(&self) -> Vec<&str> {
        self.systems.iter().map(|ns| ns.name.as_str()).collect()
    }

    /// Returns the number of systems in this schedule.
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip the module path from a fully-qualified type name, keeping only the
/// last meaningful segment (e.g. `my_game::movement_system` → `movement_system`,
/// `{{closure}}` → `<closure>`).
fn short_system_name(full: &str) -> String {
    let name = full.rsplit("::").next().unwrap_or(full);
    if name.contains("closure") {
        "<closure>".to_string()
    } else {
        name.to_string()
    }
}

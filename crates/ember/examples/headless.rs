//! Headless demo: loads component schemas and entity definitions from
//! `examples/assets`, runs two seconds of ticks, and logs where everything
//! ended up.
//!
//! ```sh
//! RUST_LOG=info cargo run -p ember --example headless [path/to/game.json]
//! ```

use std::path::PathBuf;

use ember::prelude::*;

/// Advance every `Spin` angle by its speed. `Spin` is declared in JSON, so
/// this system only knows it by name.
fn spin_system(world: &mut World, dt: f32) {
    world.query_mut(&["Spin"], |_, row| {
        let [spin] = row else { return };
        let angle = spin.get_f64("angle").unwrap_or(0.0);
        let speed = spin.get_f64("speed").unwrap_or(0.0);
        spin.set("angle", (angle + speed * f64::from(dt)) % std::f64::consts::TAU);
    });
}

fn main() -> Result<(), LoadError> {
    env_logger::init();

    let config_path = std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("examples/assets/game.json")
    });

    let mut app = App::from_config_file(&config_path)?.add_system(spin_system);
    log::info!(
        "'{}' ({}x{}), {} component type(s): {:?}",
        app.config().window.title,
        app.config().window.width,
        app.config().window.height,
        app.world.registry().len(),
        app.world.registry().names()
    );

    let ticks = (app.config().tick_rate.max(1.0) * 2.0) as u64;
    app.run_ticks(ticks);

    for row in app.world.query(&[Position::NAME, Renderable::NAME]) {
        let pos = row.component(0);
        let shape = row.component(1);
        log::info!(
            "Entity {}: {} at ({:.1}, {:.1}) with components {:?}",
            row.entity,
            shape.get_str("shape_type").unwrap_or("?"),
            pos.get_f64("x").unwrap_or(0.0),
            pos.get_f64("y").unwrap_or(0.0),
            app.world.component_names(row.entity)
        );
    }

    for player in app.world.query_entities(&[PlayerControlled::NAME, "Health"]) {
        if let Some(health) = app.world.get(player, "Health") {
            log::info!("Player health: {health:?}");
        }
    }

    #[cfg(feature = "diagnostics")]
    for timing in app.systems.timings() {
        log::debug!("{}: {:.1}us", timing.name, timing.duration_us);
    }

    Ok(())
}

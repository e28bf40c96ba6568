use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_rapier2d::prelude::*;

use svg_sandbox::config::{load_sandbox_config, SandboxConfig};
use svg_sandbox::fetch::{AssetDirFetcher, SvgSource};
use svg_sandbox::rng::seed_spawn_rng;
use svg_sandbox::simulation::{setup_physics_config, SandboxPlugin, SandboxWindowPlugin};
use svg_sandbox::site::{SitePlugin, WINDOW_SIZE};

/// Point the fetcher at the configured asset directory.
fn setup_svg_source(mut source: ResMut<SvgSource>, config: Res<SandboxConfig>) {
    *source = SvgSource::new(AssetDirFetcher::new(config.asset_root.clone()));
}

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "SVG Sandbox".into(),
            resolution: WindowResolution::new(WINDOW_SIZE.x as u32, WINDOW_SIZE.y as u32),
            ..Default::default()
        }),
        ..Default::default()
    }))
    .insert_resource(ClearColor(Color::srgb(0.07, 0.07, 0.09)))
    // Compiled defaults; load_sandbox_config overwrites them from
    // assets/sandbox.toml (if present) in the Startup schedule.
    .insert_resource(SandboxConfig::default())
    // One world unit per pixel so canvas sizes, velocities and gravity keep
    // their pixel meaning.
    .add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(1.0))
    .add_plugins((SandboxPlugin, SandboxWindowPlugin, SitePlugin))
    .add_systems(
        Startup,
        (
            // Load config first so every other startup system sees the final values.
            load_sandbox_config,
            seed_spawn_rng.after(load_sandbox_config),
            setup_svg_source.after(load_sandbox_config),
            setup_physics_config.after(load_sandbox_config),
        ),
    );

    app.run();
}

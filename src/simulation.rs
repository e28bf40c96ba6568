//! Sandbox plugins.
//!
//! | Plugin                 | Adds                                                        |
//! |------------------------|-------------------------------------------------------------|
//! | [`SandboxPlugin`]      | Resources, messages, session lifecycle, reconciler, interaction |
//! | [`SandboxWindowPlugin`]| Window pointer/keyboard input, camera, gizmo rendering      |
//!
//! `SandboxPlugin` is headless: it needs only `MinimalPlugins` and drives
//! Rapier components without stepping them, so tests run without a window or
//! physics pipeline.  The binary adds `RapierPhysicsPlugin` itself.
//!
//! ## Update order
//!
//! ```text
//! teardown → restart → start → reconcile → complete batches
//!          → surface events → pointer move → pointer press
//! ```

use crate::config::SandboxConfig;
use crate::fetch::SvgSource;
use crate::graphics::setup_camera;
use crate::interaction::{
    keyboard_focus_system, pointer_move_system, pointer_press_system, surface_events_system,
    window_pointer_system, ContextMenuSuppressed, NavigationRequest, ObjectClicked,
    PointerMessage, PointerTracker, SurfaceMessage,
};
use crate::reconcile::{complete_pending_batches_system, reconcile_objects_system};
use crate::rendering::{draw_bodies_system, draw_canvas_bounds_system};
use crate::rng::SpawnRng;
use crate::session::{
    restart_resized_sessions_system, start_sessions_system, teardown_removed_views_system,
    SessionGenerations,
};
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

/// Core sandbox plugin.
pub struct SandboxPlugin;

impl Plugin for SandboxPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SandboxConfig>()
            .init_resource::<SpawnRng>()
            .init_resource::<SvgSource>()
            .init_resource::<SessionGenerations>()
            .add_message::<SurfaceMessage>()
            .add_message::<PointerMessage>()
            .add_message::<NavigationRequest>()
            .add_message::<ObjectClicked>()
            .add_message::<ContextMenuSuppressed>()
            .add_systems(
                Update,
                (
                    teardown_removed_views_system,
                    restart_resized_sessions_system,
                    start_sessions_system,
                    reconcile_objects_system,
                    complete_pending_batches_system,
                    surface_events_system,
                    pointer_move_system,
                    pointer_press_system,
                )
                    .chain(),
            );
    }
}

/// Window input and rendering on top of [`SandboxPlugin`].
pub struct SandboxWindowPlugin;

impl Plugin for SandboxWindowPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerTracker>()
            .add_systems(Startup, setup_camera)
            .add_systems(
                Update,
                (window_pointer_system, keyboard_focus_system)
                    .chain()
                    .before(surface_events_system),
            )
            .add_systems(
                Update,
                (draw_bodies_system, draw_canvas_bounds_system).after(pointer_press_system),
            );
    }
}

/// Configure Rapier gravity from `SandboxConfig` (canvas space, +y down).
pub fn setup_physics_config(
    mut rapier: Query<&mut RapierConfiguration>,
    config: Res<SandboxConfig>,
) {
    let gravity = Vec2::new(config.gravity[0], -config.gravity[1]);
    for mut cfg in rapier.iter_mut() {
        cfg.gravity = gravity;
    }
    info!("[setup] gravity {gravity} px/s²");
}

use bevy::prelude::*;

/// Setup camera for 2D rendering.
///
/// World units are pixels: the default orthographic projection maps one
/// world unit to one logical window pixel, so canvas sizes read as on screen.
pub fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
    info!("[setup] camera spawned");
}

//! Window input → canvas surface and pointer messages.
//!
//! The cursor is mapped through the 2D camera into world space and then into
//! the canvas under it.  Crossing a canvas edge produces enter/leave, a
//! mouse-down on a canvas focuses it, `Tab` cycles focus across canvases and
//! `Escape` drops it.

use super::{PointerEvent, PointerMessage, SurfaceEvent, SurfaceMessage};
use crate::config::SandboxConfig;
use crate::descriptor::{Modifiers, PointerButton, PointerPress};
use crate::session::SimulationSession;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

/// Which canvas the cursor is over and which one has focus.
#[derive(Resource, Debug, Default)]
pub struct PointerTracker {
    pub hovered: Option<Entity>,
    pub focused: Option<Entity>,
    pub last_local: Option<Vec2>,
}

fn modifiers(keys: &ButtonInput<KeyCode>) -> Modifiers {
    Modifiers {
        ctrl: keys.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]),
        meta: keys.any_pressed([KeyCode::SuperLeft, KeyCode::SuperRight]),
    }
}

fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Middle => Some(PointerButton::Auxiliary),
        MouseButton::Right => Some(PointerButton::Secondary),
        _ => None,
    }
}

fn move_focus(
    tracker: &mut PointerTracker,
    to: Option<Entity>,
    surface: &mut MessageWriter<SurfaceMessage>,
) {
    if tracker.focused == to {
        return;
    }
    if let Some(old) = tracker.focused {
        surface.write(SurfaceMessage {
            canvas: old,
            event: SurfaceEvent::Blur,
        });
    }
    if let Some(new) = to {
        surface.write(SurfaceMessage {
            canvas: new,
            event: SurfaceEvent::Focus,
        });
    }
    tracker.focused = to;
}

/// Track the cursor across canvases and forward presses.
#[allow(clippy::too_many_arguments)]
pub fn window_pointer_system(
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    sessions: Query<(Entity, &SimulationSession)>,
    buttons: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    config: Res<SandboxConfig>,
    mut tracker: ResMut<PointerTracker>,
    mut surface: MessageWriter<SurfaceMessage>,
    mut pointer: MessageWriter<PointerMessage>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    let world = window
        .cursor_position()
        .and_then(|cursor| camera.viewport_to_world_2d(camera_transform, cursor).ok());

    let under_cursor = world.and_then(|world| {
        sessions.iter().find_map(|(canvas, session)| {
            let geometry = session.geometry()?;
            (session.is_running() && geometry.contains_world(world))
                .then(|| (canvas, geometry.frame(config.frame_rate_reference).to_canvas(world)))
        })
    });
    let hovered = under_cursor.map(|(canvas, _)| canvas);

    if hovered != tracker.hovered {
        if let Some(old) = tracker.hovered {
            surface.write(SurfaceMessage {
                canvas: old,
                event: SurfaceEvent::PointerLeave,
            });
        }
        if let Some(new) = hovered {
            surface.write(SurfaceMessage {
                canvas: new,
                event: SurfaceEvent::PointerEnter,
            });
        }
        tracker.hovered = hovered;
        tracker.last_local = None;
    }

    let Some((canvas, local)) = under_cursor else {
        if buttons.get_just_pressed().next().is_some() {
            move_focus(&mut tracker, None, &mut surface);
        }
        return;
    };

    if tracker.last_local != Some(local) {
        pointer.write(PointerMessage {
            canvas,
            event: PointerEvent::Move(local),
        });
        tracker.last_local = Some(local);
    }

    let held = modifiers(&keys);
    for button in buttons.get_just_pressed() {
        let Some(button) = pointer_button(*button) else {
            continue;
        };
        move_focus(&mut tracker, Some(canvas), &mut surface);
        pointer.write(PointerMessage {
            canvas,
            event: PointerEvent::Down(PointerPress {
                button,
                modifiers: held,
            }),
        });
        if button == PointerButton::Secondary {
            pointer.write(PointerMessage {
                canvas,
                event: PointerEvent::ContextMenu,
            });
        }
    }
}

/// `Tab` moves focus to the next canvas, `Escape` clears it.
pub fn keyboard_focus_system(
    keys: Res<ButtonInput<KeyCode>>,
    sessions: Query<(Entity, &SimulationSession)>,
    mut tracker: ResMut<PointerTracker>,
    mut surface: MessageWriter<SurfaceMessage>,
) {
    if keys.just_pressed(KeyCode::Escape) {
        move_focus(&mut tracker, None, &mut surface);
        return;
    }
    if !keys.just_pressed(KeyCode::Tab) {
        return;
    }

    let mut canvases: Vec<Entity> = sessions
        .iter()
        .filter(|(_, s)| s.is_running())
        .map(|(e, _)| e)
        .collect();
    if canvases.is_empty() {
        return;
    }
    canvases.sort();
    let next = match tracker.focused.and_then(|f| canvases.iter().position(|c| *c == f)) {
        Some(i) => canvases[(i + 1) % canvases.len()],
        None => canvases[0],
    };
    move_focus(&mut tracker, Some(next), &mut surface);
}

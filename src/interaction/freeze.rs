//! Hover / focus freeze.
//!
//! Freezing turns every live body fixed and remembers its velocity; unfreezing
//! makes them dynamic again and hands the remembered velocities back.  A
//! freeze/unfreeze pair with no interaction in between leaves every body's
//! velocity exactly as it was.

use super::{SurfaceEvent, SurfaceMessage};
use crate::body::{CanvasBody, SpriteOutline};
use crate::session::{CanvasView, FreezeState, FrozenVelocity, SimulationSession};
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

/// Body components the freeze and selection logic touch.
pub type BodyStateQuery<'w, 's> = Query<
    'w,
    's,
    (
        &'static mut RigidBody,
        &'static mut Velocity,
        &'static mut SpriteOutline,
    ),
    With<CanvasBody>,
>;

/// `Unfrozen → Frozen`.  A session without bodies stays unfrozen.
pub fn freeze_session(session: &mut SimulationSession, bodies: &mut BodyStateQuery) {
    if session.is_frozen() || session.bodies.is_empty() {
        return;
    }
    for entity in session.body_entities() {
        let Ok((mut rigid_body, velocity, _)) = bodies.get_mut(entity) else {
            continue;
        };
        if *rigid_body == RigidBody::Fixed {
            continue;
        }
        session.velocity_cache.insert(
            entity,
            FrozenVelocity {
                linvel: velocity.linvel,
                angvel: velocity.angvel,
            },
        );
        *rigid_body = RigidBody::Fixed;
    }
    session.freeze = FreezeState::Frozen;
}

/// `Frozen → Unfrozen`.  Bodies without a cached velocity keep their own.
pub fn unfreeze_session(session: &mut SimulationSession, bodies: &mut BodyStateQuery) {
    if !session.is_frozen() {
        return;
    }
    for entity in session.body_entities() {
        let Ok((mut rigid_body, mut velocity, _)) = bodies.get_mut(entity) else {
            continue;
        };
        *rigid_body = RigidBody::Dynamic;
        if let Some(saved) = session.velocity_cache.get(&entity) {
            velocity.linvel = saved.linvel;
            velocity.angvel = saved.angvel;
        }
    }
    session.velocity_cache.clear();
    clear_selection(session, bodies);
    session.freeze = FreezeState::Unfrozen;
}

/// Drop the highlight and put the sprite back at its original scale.
pub(crate) fn clear_selection(session: &mut SimulationSession, bodies: &mut BodyStateQuery) {
    let Some(selection) = session.selection.take() else {
        return;
    };
    if let Ok((_, _, mut outline)) = bodies.get_mut(selection.body) {
        outline.scale = selection.original_scale;
    }
}

/// Apply enter/leave/focus/blur messages to their sessions.
pub fn surface_events_system(
    mut messages: MessageReader<SurfaceMessage>,
    mut sessions: Query<(&CanvasView, &mut SimulationSession)>,
    mut bodies: BodyStateQuery,
) {
    for message in messages.read() {
        let Ok((view, mut session)) = sessions.get_mut(message.canvas) else {
            continue;
        };
        if !session.is_running() {
            continue;
        }
        match message.event {
            SurfaceEvent::PointerEnter | SurfaceEvent::Focus => {
                if view.disable_freeze_on_hover {
                    continue;
                }
                freeze_session(&mut session, &mut bodies);
                debug!("[interaction] canvas {} frozen", message.canvas);
            }
            SurfaceEvent::PointerLeave | SurfaceEvent::Blur => {
                unfreeze_session(&mut session, &mut bodies);
            }
        }
    }
}

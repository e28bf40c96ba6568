//! Nearest-body selection while a canvas is frozen.

use super::freeze::{clear_selection, BodyStateQuery};
use super::{PointerEvent, PointerMessage};
use crate::config::SandboxConfig;
use crate::session::{CanvasView, Selection, SimulationSession};
use bevy::prelude::*;

/// Closest candidate to `pointer` by Euclidean distance.
///
/// Ties keep the earlier candidate.
pub fn nearest_body(
    pointer: Vec2,
    candidates: impl IntoIterator<Item = (Entity, Vec2)>,
) -> Option<Entity> {
    let mut best: Option<(Entity, f32)> = None;
    for (entity, position) in candidates {
        let dist = position.distance(pointer);
        if best.is_none_or(|(_, d)| dist < d) {
            best = Some((entity, dist));
        }
    }
    best.map(|(entity, _)| entity)
}

/// Move the highlight to whichever body is nearest the pointer.
pub fn pointer_move_system(
    mut messages: MessageReader<PointerMessage>,
    mut sessions: Query<(&CanvasView, &mut SimulationSession)>,
    transforms: Query<&Transform>,
    mut bodies: BodyStateQuery,
    config: Res<SandboxConfig>,
) {
    for message in messages.read() {
        let PointerEvent::Move(local) = message.event else {
            continue;
        };
        let Ok((view, mut session)) = sessions.get_mut(message.canvas) else {
            continue;
        };
        if view.disable_freeze_on_hover || !session.is_frozen() {
            continue;
        }
        let Some(frame) = session.frame(config.frame_rate_reference) else {
            continue;
        };
        let pointer = frame.to_world(local);

        let candidates = session.body_entities().into_iter().filter_map(|entity| {
            transforms
                .get(entity)
                .ok()
                .map(|t| (entity, t.translation.truncate()))
        });
        let Some(closest) = nearest_body(pointer, candidates) else {
            clear_selection(&mut session, &mut bodies);
            continue;
        };
        if session.selected() == Some(closest) {
            continue;
        }

        clear_selection(&mut session, &mut bodies);
        if let Ok((_, _, mut outline)) = bodies.get_mut(closest) {
            session.selection = Some(Selection {
                body: closest,
                original_scale: outline.scale,
            });
            outline.scale *= config.selection_scale;
        }
    }
}

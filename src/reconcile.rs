//! Live object reconciliation.
//!
//! Whenever a `CanvasView`'s object list changes, the running session is
//! diffed against it by id:
//!
//! - live bodies whose id left the list are despawned immediately;
//! - ids that are neither live nor already in flight are marked pending and
//!   created together in **one** IO task per pass.
//!
//! When a batch finishes, every successful body is inserted in the same
//! frame.  A batch launched for an older session generation is discarded
//! whole; a body whose id left the list while in flight, or became live in
//! the meantime, is dropped.

use crate::body::{create_blueprint, resolve_spawn, spawn_body, BodyBlueprint, SpawnParams};
use crate::config::SandboxConfig;
use crate::descriptor::ObjectDescriptor;
use crate::error::SandboxResult;
use crate::fetch::SvgSource;
use crate::rng::SpawnRng;
use crate::session::{CanvasView, SimulationSession};
use bevy::prelude::*;
use bevy::tasks::{block_on, futures_lite::future, IoTaskPool, Task};
use std::collections::HashSet;

/// What one reconciliation pass has to do.
#[derive(Debug, Default)]
pub struct ReconcilePlan {
    pub remove: Vec<Entity>,
    pub add: Vec<ObjectDescriptor>,
}

impl ReconcilePlan {
    pub fn is_empty(&self) -> bool {
        self.remove.is_empty() && self.add.is_empty()
    }
}

/// Diff the live session against `objects` by id.
///
/// Repeated ids count once; the first occurrence is the one created.
pub fn plan_reconcile(session: &SimulationSession, objects: &[ObjectDescriptor]) -> ReconcilePlan {
    let wanted: HashSet<&str> = objects.iter().map(|d| d.id.as_str()).collect();

    let remove = session
        .bodies
        .iter()
        .filter(|b| !wanted.contains(b.id.as_str()))
        .map(|b| b.entity)
        .collect();

    let mut seen = HashSet::new();
    let add = objects
        .iter()
        .filter(|d| seen.insert(d.id.as_str()))
        .filter(|d| session.body(&d.id).is_none() && !session.is_pending(&d.id))
        .cloned()
        .collect();

    ReconcilePlan { remove, add }
}

/// Outcome of creating one object inside a batch.
pub struct Creation {
    pub descriptor: ObjectDescriptor,
    pub outcome: SandboxResult<BodyBlueprint>,
}

/// One in-flight creation batch.
#[derive(Component)]
pub struct PendingBatch {
    pub canvas: Entity,
    pub generation: u64,
    task: Task<Vec<Creation>>,
}

/// Diff every changed view against its session and launch creation batches.
pub fn reconcile_objects_system(
    mut commands: Commands,
    mut views: Query<(Entity, Ref<CanvasView>, &mut SimulationSession)>,
    config: Res<SandboxConfig>,
    source: Res<SvgSource>,
    mut rng: ResMut<SpawnRng>,
) {
    for (canvas, view, mut session) in views.iter_mut() {
        if !session.is_running() || !(view.is_changed() || session.needs_reconcile) {
            continue;
        }
        session.needs_reconcile = false;

        let plan = plan_reconcile(&session, &view.objects);
        if plan.is_empty() {
            continue;
        }

        for entity in &plan.remove {
            session.remove_body(*entity);
            commands.entity(*entity).try_despawn();
        }

        let Some(geometry) = session.geometry() else {
            continue;
        };
        let jobs: Vec<(ObjectDescriptor, SpawnParams)> = plan
            .add
            .into_iter()
            .map(|desc| {
                let params = resolve_spawn(&desc, geometry.size, &config, &mut rng);
                (desc, params)
            })
            .collect();

        debug!(
            "[reconcile] canvas {canvas}: -{} +{}",
            plan.remove.len(),
            jobs.len()
        );
        if jobs.is_empty() {
            continue;
        }

        for (desc, _) in &jobs {
            session.pending.insert(desc.id.clone());
        }
        let fetcher = source.0.clone();
        let cfg = config.clone();
        let task = IoTaskPool::get().spawn(async move {
            jobs.into_iter()
                .map(|(descriptor, params)| {
                    let outcome = create_blueprint(fetcher.as_ref(), &descriptor, params, &cfg);
                    Creation {
                        descriptor,
                        outcome,
                    }
                })
                .collect::<Vec<_>>()
        });
        commands.spawn(PendingBatch {
            canvas,
            generation: session.generation(),
            task,
        });
    }
}

/// Insert the bodies of every finished batch.
pub fn complete_pending_batches_system(
    mut commands: Commands,
    mut batches: Query<(Entity, &mut PendingBatch)>,
    mut sessions: Query<(&CanvasView, &mut SimulationSession)>,
    config: Res<SandboxConfig>,
) {
    for (batch_entity, mut batch) in batches.iter_mut() {
        let Some(creations) = block_on(future::poll_once(&mut batch.task)) else {
            continue;
        };
        commands.entity(batch_entity).despawn();

        let Ok((view, mut session)) = sessions.get_mut(batch.canvas) else {
            debug!("[reconcile] discarding batch for vanished canvas {}", batch.canvas);
            continue;
        };
        if !session.is_current(batch.generation) {
            debug!(
                "[reconcile] discarding stale batch (generation {} vs {})",
                batch.generation,
                session.generation()
            );
            continue;
        }
        let Some(frame) = session.frame(config.frame_rate_reference) else {
            continue;
        };

        for Creation {
            descriptor,
            outcome,
        } in creations
        {
            session.pending.remove(&descriptor.id);
            let blueprint = match outcome {
                Ok(blueprint) => blueprint,
                Err(e) => {
                    debug!("[reconcile] '{}' skipped: {e}", descriptor.id);
                    continue;
                }
            };
            let still_wanted = view.objects.iter().any(|d| d.id == descriptor.id);
            if !still_wanted || session.body(&descriptor.id).is_some() {
                continue;
            }
            let entity = spawn_body(&mut commands, batch.canvas, &frame, blueprint, &config);
            session.insert_body(descriptor, entity);
        }
        debug!(
            "[reconcile] canvas {} now has {} bodies",
            batch.canvas,
            session.bodies.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::CanvasGeometry;

    fn session() -> SimulationSession {
        SimulationSession::start(
            CanvasGeometry {
                size: Vec2::new(200.0, 200.0),
                padding: 30.0,
                origin: Vec2::ZERO,
            },
            1,
        )
    }

    fn desc(id: &str) -> ObjectDescriptor {
        ObjectDescriptor::new(id, "/a.svg", "/a.svg")
    }

    #[test]
    fn new_ids_are_added_once() {
        let plan = plan_reconcile(&session(), &[desc("a"), desc("b"), desc("a")]);
        let ids: Vec<&str> = plan.add.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert!(plan.remove.is_empty());
    }

    #[test]
    fn first_duplicate_wins() {
        let plan = plan_reconcile(&session(), &[desc("a").with_scale(2.0), desc("a")]);
        assert_eq!(plan.add.len(), 1);
        assert_eq!(plan.add[0].scale, Some(2.0));
    }

    #[test]
    fn live_and_pending_ids_are_not_recreated() {
        let mut world = World::new();
        let mut s = session();
        let a = world.spawn_empty().id();
        s.insert_body(desc("a"), a);
        s.pending.insert("b".into());

        let plan = plan_reconcile(&s, &[desc("a"), desc("b"), desc("c")]);
        let ids: Vec<&str> = plan.add.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["c"]);
    }

    #[test]
    fn absent_ids_are_removed() {
        let mut world = World::new();
        let mut s = session();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();
        s.insert_body(desc("a"), a);
        s.insert_body(desc("b"), b);

        let plan = plan_reconcile(&s, &[desc("b")]);
        assert_eq!(plan.remove, vec![a]);
        assert!(plan.add.is_empty());
    }

    #[test]
    fn unchanged_list_is_a_no_op() {
        let mut world = World::new();
        let mut s = session();
        s.insert_body(desc("a"), world.spawn_empty().id());
        assert!(plan_reconcile(&s, &[desc("a")]).is_empty());
    }
}

//! Simulation sessions: one bounded physics box per canvas.
//!
//! ## Lifecycle
//!
//! | State           | Entered when                                   |
//! |-----------------|------------------------------------------------|
//! | `Uninitialized` | never observable; a session is built running   |
//! | `Running`       | a `CanvasView` appears, or its geometry changed |
//! | `TornDown`      | geometry changed or the view was removed       |
//!
//! A geometry change (width, height, padding, placement) tears the running
//! session down and starts a **fresh** one with a new generation; nothing is
//! resumed.  Asynchronous body batches remember the generation they were
//! launched for and are discarded if it is no longer current.
//!
//! ## Systems
//!
//! | System                              | Purpose                                    |
//! |-------------------------------------|--------------------------------------------|
//! | `start_sessions_system`             | Start sessions for new / restarted views   |
//! | `restart_resized_sessions_system`   | Tear down + restart on geometry change     |
//! | `teardown_removed_views_system`     | Tear down sessions whose view disappeared  |

use crate::body::CanvasBody;
use crate::config::SandboxConfig;
use crate::descriptor::ObjectDescriptor;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use std::collections::{HashMap, HashSet};

// ── Page-facing component ─────────────────────────────────────────────────────

/// The canvas-view contract exposed to the page layer.
///
/// Spawn an entity with this component to get an interactive physics box of
/// `canvas_width × canvas_height` pixels whose top-left corner sits at
/// `origin` in world space.  Edit `objects` to add or remove bodies.
#[derive(Component, Debug, Clone)]
pub struct CanvasView {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub objects: Vec<ObjectDescriptor>,
    /// Wall inset; `None` uses `SandboxConfig::default_padding`.
    pub padding: Option<f32>,
    pub disable_freeze_on_hover: bool,
    /// World-space position of the canvas's top-left corner.
    pub origin: Vec2,
}

impl CanvasView {
    pub fn new(canvas_width: f32, canvas_height: f32) -> Self {
        Self {
            canvas_width,
            canvas_height,
            objects: Vec::new(),
            padding: None,
            disable_freeze_on_hover: false,
            origin: Vec2::ZERO,
        }
    }

    pub fn with_objects(mut self, objects: Vec<ObjectDescriptor>) -> Self {
        self.objects = objects;
        self
    }

    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = Some(padding);
        self
    }

    pub fn without_freeze_on_hover(mut self) -> Self {
        self.disable_freeze_on_hover = true;
        self
    }

    pub fn placed_at(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    /// Geometry that defines session identity.
    pub fn geometry(&self, config: &SandboxConfig) -> CanvasGeometry {
        CanvasGeometry {
            size: Vec2::new(self.canvas_width, self.canvas_height),
            padding: self.padding.unwrap_or(config.default_padding),
            origin: self.origin,
        }
    }
}

/// Command that edits a canvas's object list in place.
///
/// Meant for click handlers, which only get `Commands`:
///
/// ```ignore
/// commands.queue(edit_objects(click.canvas, move |objects| objects.retain(|d| d.id != id)));
/// ```
pub fn edit_objects(
    canvas: Entity,
    edit: impl FnOnce(&mut Vec<ObjectDescriptor>) + Send + 'static,
) -> impl Command {
    move |world: &mut World| {
        if let Some(mut view) = world.get_mut::<CanvasView>(canvas) {
            edit(&mut view.objects);
        }
    }
}

// ── Geometry & coordinate frame ───────────────────────────────────────────────

/// Size, wall inset and world placement of one canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasGeometry {
    pub size: Vec2,
    pub padding: f32,
    pub origin: Vec2,
}

impl CanvasGeometry {
    pub fn frame(&self, frame_rate: f32) -> CanvasFrame {
        CanvasFrame {
            origin: self.origin,
            size: self.size,
            frame_rate,
        }
    }

    /// Whether a world-space point lies on the canvas surface.
    pub fn contains_world(&self, world: Vec2) -> bool {
        let local = Vec2::new(world.x - self.origin.x, self.origin.y - world.y);
        local.cmpge(Vec2::ZERO).all() && local.cmplt(self.size).all()
    }
}

/// Canvas space ↔ world space.
///
/// Canvas space: origin top-left, +y down, velocities per reference frame,
/// positive angular velocity clockwise.  World space: Bevy 2D, +y up,
/// velocities per second, positive angular velocity counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasFrame {
    pub origin: Vec2,
    pub size: Vec2,
    pub frame_rate: f32,
}

impl CanvasFrame {
    pub fn to_world(&self, p: Vec2) -> Vec2 {
        Vec2::new(self.origin.x + p.x, self.origin.y - p.y)
    }

    pub fn to_canvas(&self, world: Vec2) -> Vec2 {
        Vec2::new(world.x - self.origin.x, self.origin.y - world.y)
    }

    pub fn velocity_to_world(&self, v: Vec2) -> Vec2 {
        Vec2::new(v.x, -v.y) * self.frame_rate
    }

    pub fn velocity_to_canvas(&self, v: Vec2) -> Vec2 {
        Vec2::new(v.x, -v.y) / self.frame_rate
    }

    pub fn angular_to_world(&self, w: f32) -> f32 {
        -w * self.frame_rate
    }

    pub fn angular_to_canvas(&self, w: f32) -> f32 {
        -w / self.frame_rate
    }
}

// ── Session state ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Uninitialized,
    Running,
    TornDown,
}

/// Hover/focus freeze state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FreezeState {
    #[default]
    Unfrozen,
    Frozen,
}

/// World-space velocity captured when a body was frozen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrozenVelocity {
    pub linvel: Vec2,
    pub angvel: f32,
}

/// The highlighted body and the sprite scale to restore on deselection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub body: Entity,
    pub original_scale: f32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LiveBody {
    pub(crate) id: String,
    pub(crate) entity: Entity,
}

/// Per-canvas simulation state.
///
/// The body list, velocity cache, callback registry and selection all key on
/// the body `Entity`; every removal path goes through
/// [`SimulationSession::remove_body`] so they are purged together.
#[derive(Component, Debug, Default)]
pub struct SimulationSession {
    state: SessionState,
    generation: u64,
    geometry: Option<CanvasGeometry>,
    pub(crate) needs_reconcile: bool,
    /// Insertion-ordered; nearest-body ties resolve to the earlier entry.
    pub(crate) bodies: Vec<LiveBody>,
    pub(crate) pending: HashSet<String>,
    pub(crate) velocity_cache: HashMap<Entity, FrozenVelocity>,
    pub(crate) callbacks: HashMap<Entity, ObjectDescriptor>,
    pub(crate) selection: Option<Selection>,
    pub(crate) freeze: FreezeState,
}

impl SimulationSession {
    /// A running session for `geometry`; the reconciler picks it up this frame.
    pub fn start(geometry: CanvasGeometry, generation: u64) -> Self {
        Self {
            state: SessionState::Running,
            generation,
            geometry: Some(geometry),
            needs_reconcile: true,
            ..Default::default()
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether async work launched for `generation` may still touch this session.
    pub fn is_current(&self, generation: u64) -> bool {
        self.is_running() && self.generation == generation
    }

    pub fn geometry(&self) -> Option<CanvasGeometry> {
        self.geometry
    }

    pub fn frame(&self, frame_rate: f32) -> Option<CanvasFrame> {
        self.geometry.map(|g| g.frame(frame_rate))
    }

    pub fn is_frozen(&self) -> bool {
        self.freeze == FreezeState::Frozen
    }

    pub fn freeze_state(&self) -> FreezeState {
        self.freeze
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn selected(&self) -> Option<Entity> {
        self.selection.map(|s| s.body)
    }

    /// Live ids in insertion order.
    pub fn live_ids(&self) -> Vec<&str> {
        self.bodies.iter().map(|b| b.id.as_str()).collect()
    }

    pub fn body(&self, id: &str) -> Option<Entity> {
        self.bodies.iter().find(|b| b.id == id).map(|b| b.entity)
    }

    pub fn body_entities(&self) -> Vec<Entity> {
        self.bodies.iter().map(|b| b.entity).collect()
    }

    pub fn is_pending(&self, id: &str) -> bool {
        self.pending.contains(id)
    }

    pub fn cached_velocity(&self, body: Entity) -> Option<FrozenVelocity> {
        self.velocity_cache.get(&body).copied()
    }

    pub fn callback(&self, body: Entity) -> Option<&ObjectDescriptor> {
        self.callbacks.get(&body)
    }

    pub(crate) fn insert_body(&mut self, descriptor: ObjectDescriptor, entity: Entity) {
        self.bodies.push(LiveBody {
            id: descriptor.id.clone(),
            entity,
        });
        self.callbacks.insert(entity, descriptor);
    }

    /// Forget a body everywhere.  Returns `false` if it was not live.
    pub(crate) fn remove_body(&mut self, entity: Entity) -> bool {
        let before = self.bodies.len();
        self.bodies.retain(|b| b.entity != entity);
        self.velocity_cache.remove(&entity);
        self.callbacks.remove(&entity);
        if self.selected() == Some(entity) {
            self.selection = None;
        }
        self.bodies.len() != before
    }

    /// Release every per-body structure and return the bodies to despawn.
    pub(crate) fn teardown(&mut self) -> Vec<Entity> {
        let bodies = self.body_entities();
        self.bodies.clear();
        self.pending.clear();
        self.velocity_cache.clear();
        self.callbacks.clear();
        self.selection = None;
        self.freeze = FreezeState::Unfrozen;
        self.needs_reconcile = false;
        self.state = SessionState::TornDown;
        bodies
    }
}

/// Monotonic source of session generations, unique across all canvases.
#[derive(Resource, Debug, Default)]
pub struct SessionGenerations {
    last: u64,
}

impl SessionGenerations {
    pub fn next(&mut self) -> u64 {
        self.last += 1;
        self.last
    }
}

// ── Walls ─────────────────────────────────────────────────────────────────────

/// Invisible static boundary wall belonging to one canvas.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasWall {
    pub canvas: Entity,
}

/// `(centre, size)` of the top, bottom, left and right walls in canvas space.
///
/// The inner face of each wall sits `padding` px inside the canvas edge.
pub fn wall_rects(size: Vec2, padding: f32, thickness: f32) -> [(Vec2, Vec2); 4] {
    let (w, h, t, p) = (size.x, size.y, thickness, padding);
    [
        (Vec2::new(w / 2.0, p - t / 2.0), Vec2::new(w, t)),
        (Vec2::new(w / 2.0, h - p + t / 2.0), Vec2::new(w, t)),
        (Vec2::new(p - t / 2.0, h / 2.0), Vec2::new(t, h)),
        (Vec2::new(w - p + t / 2.0, h / 2.0), Vec2::new(t, h)),
    ]
}

fn spawn_walls(commands: &mut Commands, canvas: Entity, frame: &CanvasFrame, padding: f32, thickness: f32) {
    for (centre, size) in wall_rects(frame.size, padding, thickness) {
        commands.spawn((
            CanvasWall { canvas },
            RigidBody::Fixed,
            Collider::cuboid(size.x / 2.0, size.y / 2.0),
            Transform::from_translation(frame.to_world(centre).extend(0.0)),
        ));
    }
}

fn despawn_canvas_entities(
    commands: &mut Commands,
    canvas: Entity,
    walls: &Query<(Entity, &CanvasWall)>,
    bodies: &Query<(Entity, &CanvasBody)>,
) {
    for (entity, wall) in walls.iter() {
        if wall.canvas == canvas {
            commands.entity(entity).try_despawn();
        }
    }
    for (entity, body) in bodies.iter() {
        if body.canvas == canvas {
            commands.entity(entity).try_despawn();
        }
    }
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Start a session for every view that has none, or whose session was torn
/// down while the view stayed.
pub fn start_sessions_system(
    mut commands: Commands,
    mut views: Query<(Entity, &CanvasView, Option<&mut SimulationSession>)>,
    mut generations: ResMut<SessionGenerations>,
    config: Res<SandboxConfig>,
) {
    for (canvas, view, session) in views.iter_mut() {
        if session.as_ref().is_some_and(|s| s.state() != SessionState::TornDown) {
            continue;
        }
        let geometry = view.geometry(&config);
        let fresh = SimulationSession::start(geometry, generations.next());
        info!(
            "[session] canvas {canvas} running ({}x{}, generation {})",
            geometry.size.x,
            geometry.size.y,
            fresh.generation()
        );
        match session {
            Some(mut existing) => *existing = fresh,
            None => {
                commands.entity(canvas).insert(fresh);
            }
        }
        spawn_walls(
            &mut commands,
            canvas,
            &geometry.frame(config.frame_rate_reference),
            geometry.padding,
            config.wall_thickness,
        );
    }
}

/// Geometry changed: tear down and immediately start a fresh session.
pub fn restart_resized_sessions_system(
    mut commands: Commands,
    mut views: Query<(Entity, &CanvasView, &mut SimulationSession), Changed<CanvasView>>,
    walls: Query<(Entity, &CanvasWall)>,
    bodies: Query<(Entity, &CanvasBody)>,
    mut generations: ResMut<SessionGenerations>,
    config: Res<SandboxConfig>,
) {
    for (canvas, view, mut session) in views.iter_mut() {
        let geometry = view.geometry(&config);
        if !session.is_running() || session.geometry() == Some(geometry) {
            continue;
        }
        session.teardown();
        despawn_canvas_entities(&mut commands, canvas, &walls, &bodies);

        *session = SimulationSession::start(geometry, generations.next());
        info!(
            "[session] canvas {canvas} restarted after resize (generation {})",
            session.generation()
        );
        spawn_walls(
            &mut commands,
            canvas,
            &geometry.frame(config.frame_rate_reference),
            geometry.padding,
            config.wall_thickness,
        );
    }
}

/// The view was removed (or its entity despawned): release everything.
pub fn teardown_removed_views_system(
    mut commands: Commands,
    mut removed: RemovedComponents<CanvasView>,
    mut sessions: Query<&mut SimulationSession>,
    walls: Query<(Entity, &CanvasWall)>,
    bodies: Query<(Entity, &CanvasBody)>,
) {
    for canvas in removed.read() {
        if let Ok(mut session) = sessions.get_mut(canvas) {
            session.teardown();
        }
        despawn_canvas_entities(&mut commands, canvas, &walls, &bodies);
        info!("[session] canvas {canvas} torn down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> CanvasGeometry {
        CanvasGeometry {
            size: Vec2::new(300.0, 200.0),
            padding: 30.0,
            origin: Vec2::new(-100.0, 50.0),
        }
    }

    #[test]
    fn frame_round_trips_points() {
        let frame = geometry().frame(60.0);
        let p = Vec2::new(100.0, 50.0);
        assert_eq!(frame.to_world(p), Vec2::new(0.0, 0.0));
        assert_eq!(frame.to_canvas(frame.to_world(p)), p);
    }

    #[test]
    fn velocity_conversion_is_exact_for_descriptor_values() {
        let frame = geometry().frame(60.0);
        let world = frame.velocity_to_world(Vec2::new(1.0, -2.5));
        assert_eq!(world, Vec2::new(60.0, 150.0));
        assert_eq!(frame.velocity_to_canvas(world), Vec2::new(1.0, -2.5));
        assert_eq!(frame.angular_to_canvas(frame.angular_to_world(0.02)), 0.02);
    }

    #[test]
    fn contains_world_covers_the_canvas_rect() {
        let g = geometry();
        assert!(g.contains_world(Vec2::new(-100.0, 50.0)));
        assert!(g.contains_world(Vec2::new(199.0, -149.0)));
        assert!(!g.contains_world(Vec2::new(200.0, 0.0)));
        assert!(!g.contains_world(Vec2::new(0.0, 51.0)));
    }

    #[test]
    fn walls_sit_outside_the_padded_box() {
        let [top, bottom, left, right] = wall_rects(Vec2::new(300.0, 200.0), 30.0, 50.0);
        // Inner faces at the padding inset.
        assert_eq!(top.0.y + top.1.y / 2.0, 30.0);
        assert_eq!(bottom.0.y - bottom.1.y / 2.0, 170.0);
        assert_eq!(left.0.x + left.1.x / 2.0, 30.0);
        assert_eq!(right.0.x - right.1.x / 2.0, 270.0);
        assert_eq!(top.1, Vec2::new(300.0, 50.0));
        assert_eq!(left.1, Vec2::new(50.0, 200.0));
    }

    #[test]
    fn generations_are_unique() {
        let mut generations = SessionGenerations::default();
        let a = generations.next();
        let b = generations.next();
        assert_ne!(a, b);
    }

    #[test]
    fn remove_body_purges_every_structure() {
        let mut session = SimulationSession::start(geometry(), 1);
        let e = World::new().spawn_empty().id();
        session.insert_body(ObjectDescriptor::new("a", "/a.svg", "/a.svg"), e);
        session.velocity_cache.insert(
            e,
            FrozenVelocity {
                linvel: Vec2::ONE,
                angvel: 1.0,
            },
        );
        session.selection = Some(Selection {
            body: e,
            original_scale: 1.0,
        });

        assert!(session.remove_body(e));
        assert!(session.live_ids().is_empty());
        assert!(session.cached_velocity(e).is_none());
        assert!(session.callback(e).is_none());
        assert!(session.selected().is_none());
        assert!(!session.remove_body(e));
    }

    #[test]
    fn teardown_is_terminal_and_clears_state() {
        let mut session = SimulationSession::start(geometry(), 3);
        let e = World::new().spawn_empty().id();
        session.insert_body(ObjectDescriptor::new("a", "/a.svg", "/a.svg"), e);
        session.pending.insert("b".into());

        let despawn = session.teardown();
        assert_eq!(despawn, vec![e]);
        assert_eq!(session.state(), SessionState::TornDown);
        assert!(!session.is_current(3));
        assert!(!session.is_pending("b"));
    }
}

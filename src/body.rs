//! Body factory: descriptor + SVG documents → physics body.
//!
//! Creation is split so the expensive half can run off the main thread:
//!
//! 1. [`resolve_spawn`] draws any randomised defaults on the main thread,
//!    in reconcile order, from the shared [`SpawnRng`].
//! 2. [`create_blueprint`] fetches both documents, extracts rings and builds
//!    the collider.  It runs inside the reconciler's IO task.
//! 3. [`spawn_body`] turns a finished [`BodyBlueprint`] into an entity.
//!
//! Collision rings are scaled, recentred on their area centroid and flipped
//! into world orientation (+y up), so the body's origin is its centre of
//! mass.  The texture is shifted by the same amount relative to its own
//! bounding box, which keeps it aligned with the outline.

use crate::config::{SandboxConfig, ShapeMode};
use crate::constants::{BODY_FRICTION, BODY_RESTITUTION};
use crate::descriptor::ObjectDescriptor;
use crate::error::{SandboxError, SandboxResult};
use crate::fetch::SvgFetcher;
use crate::rng::SpawnRng;
use crate::session::CanvasFrame;
use crate::svg::{extract_shape, ShapeRing, SvgShape};
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

/// Rings with a smaller absolute area (px²) cannot carry a collider part.
const MIN_RING_AREA: f32 = 1.0;

/// Marks a simulated body and ties it to its canvas.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct CanvasBody {
    pub canvas: Entity,
    pub id: String,
}

/// Visual outline of a body.
///
/// `rings` are centred and in world orientation but unscaled; the renderer
/// multiplies them by `scale`, which selection temporarily enlarges.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct SpriteOutline {
    pub rings: Vec<ShapeRing>,
    pub scale: f32,
}

/// Initial kinematic state in canvas units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnParams {
    pub position: Vec2,
    pub velocity: Vec2,
    pub angular_velocity: f32,
}

/// Fill in a descriptor's missing initial state.
///
/// Random positions keep `spawn_margin_fraction` of each axis clear on both
/// sides.
pub fn resolve_spawn(
    descriptor: &ObjectDescriptor,
    canvas_size: Vec2,
    config: &SandboxConfig,
    rng: &mut SpawnRng,
) -> SpawnParams {
    let m = config.spawn_margin_fraction;
    let position = descriptor.initial_position.unwrap_or_else(|| {
        Vec2::new(
            rng.range(canvas_size.x * m, canvas_size.x * (1.0 - m)),
            rng.range(canvas_size.y * m, canvas_size.y * (1.0 - m)),
        )
    });
    let velocity = descriptor.initial_velocity.unwrap_or_else(|| {
        Vec2::new(
            rng.symmetric(config.random_velocity_range),
            rng.symmetric(config.random_velocity_range),
        )
    });
    let angular_velocity = descriptor
        .angular_velocity
        .unwrap_or_else(|| rng.symmetric(config.random_angular_velocity_range));

    SpawnParams {
        position,
        velocity,
        angular_velocity,
    }
}

/// Everything needed to spawn one body, built off the main thread.
#[derive(Debug, Clone)]
pub struct BodyBlueprint {
    pub id: String,
    pub collider: Collider,
    pub sprite: SpriteOutline,
    pub params: SpawnParams,
}

/// Fetch a descriptor's documents and build its blueprint.
///
/// A failing collision document fails the whole object.  A failing texture
/// only costs the visual: the collision outline is drawn instead.
pub fn create_blueprint(
    fetcher: &dyn SvgFetcher,
    descriptor: &ObjectDescriptor,
    params: SpawnParams,
    config: &SandboxConfig,
) -> SandboxResult<BodyBlueprint> {
    let collision_doc = fetcher.fetch(&descriptor.collision_svg_path)?;
    let texture_doc = if descriptor.texture_svg_path == descriptor.collision_svg_path {
        Some(collision_doc.clone())
    } else {
        match fetcher.fetch(&descriptor.texture_svg_path) {
            Ok(doc) => Some(doc),
            Err(e) => {
                debug!("[body] '{}' texture unavailable: {e}", descriptor.id);
                None
            }
        }
    };
    build_blueprint(
        descriptor,
        &collision_doc,
        texture_doc.as_deref(),
        params,
        config,
    )
}

/// Build a blueprint from already-fetched documents.
pub fn build_blueprint(
    descriptor: &ObjectDescriptor,
    collision_doc: &str,
    texture_doc: Option<&str>,
    params: SpawnParams,
    config: &SandboxConfig,
) -> SandboxResult<BodyBlueprint> {
    let scale = descriptor.scale.unwrap_or(config.default_scale);
    let collision = extract_shape(collision_doc, scale, config.curve_sample_length)?;
    let box_centre = collision.bounds().map_or(Vec2::ZERO, |b| b.center());
    let mass_centre = area_centroid(&collision.rings).unwrap_or(box_centre);
    let collision_rings = centre_and_flip(&collision, mass_centre);
    debug!(
        "[body] '{}' outline: {} rings, {} vertices",
        descriptor.id,
        collision.rings.len(),
        collision.vertex_count()
    );

    let collider = collider_from_rings(&collision_rings, config.shape_mode).ok_or_else(|| {
        SandboxError::DegenerateShape {
            id: descriptor.id.clone(),
            rings: collision_rings.len(),
        }
    })?;

    let texture = texture_doc.and_then(|doc| {
        extract_shape(doc, 1.0, config.curve_sample_length)
            .map_err(|e| debug!("[body] '{}' texture unusable: {e}", descriptor.id))
            .ok()
    });
    let sprite = match texture {
        Some(shape) => {
            let shift = (mass_centre - box_centre) / scale;
            let centre = shape.bounds().map_or(Vec2::ZERO, |b| b.center()) + shift;
            SpriteOutline {
                rings: centre_and_flip(&shape, centre),
                scale,
            }
        }
        // Collision rings are already scaled.
        None => SpriteOutline {
            rings: collision_rings,
            scale: 1.0,
        },
    };

    Ok(BodyBlueprint {
        id: descriptor.id.clone(),
        collider,
        sprite,
        params,
    })
}

/// Move `centre` to the origin and flip +y down into +y up.
fn centre_and_flip(shape: &SvgShape, centre: Vec2) -> Vec<ShapeRing> {
    shape
        .rings
        .iter()
        .map(|ring| ShapeRing {
            points: ring
                .points
                .iter()
                .map(|p| {
                    let local = *p - centre;
                    Vec2::new(local.x, -local.y)
                })
                .collect(),
            color: ring.color,
        })
        .collect()
}

/// Centroid and unsigned area of one closed ring.
fn ring_centroid(points: &[Vec2]) -> Option<(Vec2, f32)> {
    let n = points.len();
    let mut twice_area = 0.0;
    let mut moment = Vec2::ZERO;
    for i in 0..n {
        let (a, b) = (points[i], points[(i + 1) % n]);
        let cross = a.perp_dot(b);
        twice_area += cross;
        moment += (a + b) * cross;
    }
    if twice_area.abs() < f32::EPSILON {
        return None;
    }
    Some((moment / (3.0 * twice_area), twice_area.abs() / 2.0))
}

/// Area-weighted centroid of the rings that can carry a collider part.
pub fn area_centroid(rings: &[ShapeRing]) -> Option<Vec2> {
    let (weighted, total) = rings
        .iter()
        .filter(|r| r.points.len() >= 3 && ring_area(&r.points) >= MIN_RING_AREA)
        .filter_map(|r| ring_centroid(&r.points))
        .fold((Vec2::ZERO, 0.0), |(sum, total), (c, area)| {
            (sum + c * area, total + area)
        });
    (total > 0.0).then(|| weighted / total)
}

/// Shoelace area of a closed ring.
pub fn ring_area(points: &[Vec2]) -> f32 {
    let n = points.len();
    let twice: f32 = (0..n)
        .map(|i| points[i].perp_dot(points[(i + 1) % n]))
        .sum();
    twice.abs() / 2.0
}

/// Combine every usable ring into one compound collider.
///
/// Returns `None` if no ring has enough area to collide with.
pub fn collider_from_rings(rings: &[ShapeRing], mode: ShapeMode) -> Option<Collider> {
    let usable: Vec<&[Vec2]> = rings
        .iter()
        .map(|r| r.points.as_slice())
        .filter(|points| points.len() >= 3 && ring_area(points) >= MIN_RING_AREA)
        .collect();
    if usable.is_empty() {
        return None;
    }

    match mode {
        ShapeMode::ConvexHull => {
            let parts: Vec<(Vect, Rot, Collider)> = usable
                .iter()
                .filter_map(|points| Collider::convex_hull(points))
                .map(|hull| (Vect::ZERO, 0.0, hull))
                .collect();
            (!parts.is_empty()).then(|| Collider::compound(parts))
        }
        ShapeMode::Decomposition => {
            // One pass over every ring: the result is already a compound
            // and compounds cannot nest.
            let mut vertices: Vec<Vect> = Vec::new();
            let mut indices: Vec<[u32; 2]> = Vec::new();
            for points in usable {
                let base = vertices.len() as u32;
                let n = points.len() as u32;
                indices.extend((0..n).map(|i| [base + i, base + (i + 1) % n]));
                vertices.extend_from_slice(points);
            }
            Some(Collider::convex_decomposition(&vertices, &indices))
        }
    }
}

/// Spawn a finished blueprint into `canvas`'s box.
pub fn spawn_body(
    commands: &mut Commands,
    canvas: Entity,
    frame: &CanvasFrame,
    blueprint: BodyBlueprint,
    config: &SandboxConfig,
) -> Entity {
    let BodyBlueprint {
        id,
        collider,
        sprite,
        params,
    } = blueprint;

    commands
        .spawn((
            (
                CanvasBody { canvas, id },
                sprite,
                Transform::from_translation(frame.to_world(params.position).extend(0.1)),
                RigidBody::Dynamic,
                collider,
                Velocity {
                    linvel: frame.velocity_to_world(params.velocity),
                    angvel: frame.angular_to_world(params.angular_velocity),
                },
            ),
            (
                Restitution {
                    coefficient: BODY_RESTITUTION,
                    combine_rule: CoefficientCombineRule::Max,
                },
                Friction {
                    coefficient: BODY_FRICTION,
                    combine_rule: CoefficientCombineRule::Min,
                },
                Damping {
                    linear_damping: 0.0,
                    angular_damping: 0.0,
                },
                // Contacts must not change the spin a body was given.
                AdditionalMassProperties::MassProperties(MassProperties {
                    local_center_of_mass: Vec2::ZERO,
                    mass: 0.0,
                    principal_inertia: config.spin_inertia,
                }),
                Sleeping::disabled(),
                Ccd::enabled(),
            ),
        ))
        .id()
}

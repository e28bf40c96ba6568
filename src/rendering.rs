//! Rendering systems: body outlines and the canvas-bounds overlay.
//!
//! Bevy has no SVG loader, so a body's texture is drawn as the gizmo outline
//! of its texture rings every frame, coloured by the path's stroke or fill.
//!
//! ## Layer Model
//!
//! | Layer          | Technology | Default | Controlled by         |
//! |----------------|------------|---------|-----------------------|
//! | Body outlines  | Gizmos     | ON      | always                |
//! | Canvas bounds  | Gizmos     | OFF     | `show_canvas_bounds`  |
//!
//! ## System Responsibilities
//!
//! | System                        | Schedule | Purpose                                |
//! |-------------------------------|----------|----------------------------------------|
//! | `draw_bodies_system`          | Update   | Outline every body at its sprite scale |
//! | `draw_canvas_bounds_system`   | Update   | Canvas rect + padded wall box          |

use crate::body::SpriteOutline;
use crate::config::SandboxConfig;
use crate::session::SimulationSession;
use bevy::prelude::*;

/// Transform a local ring into world space for drawing.
pub fn outline_points(outline_points: &[Vec2], scale: f32, transform: &Transform) -> Vec<Vec2> {
    let pos = transform.translation.truncate();
    let rot = transform.rotation;
    outline_points
        .iter()
        .map(|v| pos + rot.mul_vec3((*v * scale).extend(0.0)).truncate())
        .collect()
}

/// Draw every body's outline rings.
pub fn draw_bodies_system(
    mut gizmos: Gizmos,
    bodies: Query<(&Transform, &SpriteOutline)>,
    config: Res<SandboxConfig>,
) {
    let default_color = config.outline_color();
    for (transform, outline) in bodies.iter() {
        for ring in &outline.rings {
            if ring.points.len() < 2 {
                continue;
            }
            let pts = outline_points(&ring.points, outline.scale, transform);
            let color = ring.color.unwrap_or(default_color);
            let n = pts.len();
            for i in 0..n {
                gizmos.line_2d(pts[i], pts[(i + 1) % n], color);
            }
        }
    }
}

/// Draw each canvas's outer rectangle and the padded box the walls enclose.
pub fn draw_canvas_bounds_system(
    mut gizmos: Gizmos,
    sessions: Query<&SimulationSession>,
    config: Res<SandboxConfig>,
) {
    if !config.show_canvas_bounds {
        return;
    }
    for session in sessions.iter().filter(|s| s.is_running()) {
        let Some(geometry) = session.geometry() else {
            continue;
        };
        let frame = geometry.frame(config.frame_rate_reference);
        let centre = frame.to_world(geometry.size / 2.0);
        gizmos.rect_2d(centre, geometry.size, Color::srgba(1.0, 1.0, 1.0, 0.25));
        let inner = (geometry.size - Vec2::splat(geometry.padding * 2.0)).max(Vec2::ZERO);
        gizmos.rect_2d(centre, inner, Color::srgba(1.0, 0.85, 0.2, 0.35));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn outline_points_apply_scale_rotation_and_translation() {
        let transform = Transform::from_xyz(10.0, 20.0, 0.0)
            .with_rotation(Quat::from_rotation_z(FRAC_PI_2));
        let pts = outline_points(&[Vec2::new(2.0, 0.0)], 0.5, &transform);
        assert!((pts[0] - Vec2::new(10.0, 21.0)).length() < 1e-5);
    }
}

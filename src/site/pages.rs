//! Routed page canvases.

use super::{layout_origin, HEADER_HEIGHT};
use crate::descriptor::ObjectDescriptor;
use crate::session::CanvasView;
use bevy::prelude::*;

/// Root of the current page; despawned when the page is left.
#[derive(Component)]
pub struct PageCanvas;

fn page_origin() -> Vec2 {
    layout_origin() - Vec2::new(0.0, HEADER_HEIGHT)
}

fn greeting(id: &str, x: f32, y: f32, vy: f32) -> ObjectDescriptor {
    ObjectDescriptor::new(
        id,
        format!("/main/{id}.svg"),
        format!("/main/{id}_outline.svg"),
    )
    .with_scale(1.0)
    .at(x, y)
    .moving(0.0, vy)
    .spinning(0.0)
}

pub fn spawn_home_page(mut commands: Commands) {
    commands.spawn((
        PageCanvas,
        CanvasView::new(1500.0, 600.0)
            .with_objects(vec![
                greeting("hi", 150.0, 150.0, 1.8),
                greeting("i_am", 400.0, 250.0, 2.0),
                greeting("student", 950.0, 300.0, 0.5),
            ])
            .without_freeze_on_hover()
            .placed_at(page_origin()),
    ));
}

pub fn spawn_contacts_page(mut commands: Commands) {
    let github = ObjectDescriptor::new(
        "github",
        "/contacts/github.svg",
        "/contacts/github_outline.svg",
    )
    .with_scale(0.2)
    .linking("https://github.com/rhusiev")
    .at(150.0, 150.0)
    .moving(-3.4, 1.8)
    .spinning(0.02);

    commands.spawn((
        PageCanvas,
        CanvasView::new(1200.0, 500.0)
            .with_objects(vec![github])
            .placed_at(page_origin() + Vec2::new(150.0, 0.0)),
    ));
}

/// Despawn the page canvas; its session tears itself down.
pub fn cleanup_page(mut commands: Commands, query: Query<Entity, With<PageCanvas>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn();
    }
}

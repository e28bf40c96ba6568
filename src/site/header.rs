//! Header row: home link, cookie spawner, navigation.

use super::{layout_origin, HEADER_HEIGHT};
use crate::descriptor::{ObjectClick, ObjectDescriptor};
use crate::session::{edit_objects, CanvasView};
use bevy::prelude::*;
use uuid::Uuid;

/// Marks the header canvases, which live for the whole run.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderCanvas {
    Home,
    Click,
    Navigation,
}

/// The "click" sign: every primary click drops a new cookie into its canvas.
pub fn click_spawner_descriptor() -> ObjectDescriptor {
    ObjectDescriptor::new("click", "/header/click.svg", "/header/click_outline.svg")
        .with_scale(0.4)
        .at(150.0, 50.0)
        .moving(-0.9, 1.5)
        .spinning(0.015)
        .on_click(spawn_cookie)
}

fn spawn_cookie(click: &ObjectClick, commands: &mut Commands) {
    let cookie = cookie_descriptor(format!("cookie-{}", Uuid::new_v4()));
    debug!("[site] new cookie {}", cookie.id);
    commands.queue(edit_objects(click.canvas, move |objects| objects.push(cookie)));
}

/// A cookie that takes itself out of its canvas when clicked.
pub fn cookie_descriptor(id: String) -> ObjectDescriptor {
    let own_id = id.clone();
    ObjectDescriptor::new(id, "/header/cookie.svg", "/header/cookie_outline.svg")
        .with_scale(0.07)
        .on_click(move |click, commands| {
            let own_id = own_id.clone();
            commands.queue(edit_objects(click.canvas, move |objects| {
                objects.retain(|d| d.id != own_id)
            }));
        })
}

fn home_objects() -> Vec<ObjectDescriptor> {
    vec![ObjectDescriptor::new(
        "hamster",
        "/header/hamster_short.svg",
        "/header/hamster_short_outline.svg",
    )
    .with_scale(0.15)
    .linking("/")
    .at(100.0, 50.0)
    .moving(1.0, -2.5)
    .spinning(0.035)]
}

fn navigation_objects() -> Vec<ObjectDescriptor> {
    vec![
        ObjectDescriptor::new("conspectus", "/header/notebook.svg", "/header/notebook_outline.svg")
            .with_scale(1.0)
            .linking("https://conspectus.r1a.nl/readme")
            .at(150.0, 100.0)
            .moving(-0.9, 1.5)
            .spinning(0.015),
        ObjectDescriptor::new("contacts", "/header/contacts.svg", "/header/contacts_outline.svg")
            .with_scale(1.0)
            .linking("/contacts")
            .at(400.0, 150.0)
            .moving(3.7, 5.5)
            .spinning(-0.025),
    ]
}

/// Spawn the three header canvases side by side along the top edge.
pub fn spawn_header(mut commands: Commands) {
    let origin = layout_origin();
    commands.spawn((
        HeaderCanvas::Home,
        CanvasView::new(300.0, HEADER_HEIGHT)
            .with_objects(home_objects())
            .placed_at(origin),
    ));
    commands.spawn((
        HeaderCanvas::Click,
        CanvasView::new(500.0, HEADER_HEIGHT)
            .with_objects(vec![click_spawner_descriptor()])
            .with_padding(50.0)
            .placed_at(origin + Vec2::new(300.0, 0.0)),
    ));
    commands.spawn((
        HeaderCanvas::Navigation,
        CanvasView::new(600.0, HEADER_HEIGHT)
            .with_objects(navigation_objects())
            .placed_at(origin + Vec2::new(800.0, 0.0)),
    ));
    info!("[site] header spawned");
}

//! Headless tests for the site layer: routing, page canvases, header objects.
//!
//! These tests use [`MinimalPlugins`] + [`StatesPlugin`], no window and no
//! physics, and load the real SVGs from `assets/`.
//!
//! Covered scenarios:
//! 1. Default page is `Home`.
//! 2. An in-app `NavigationRequest` switches the page and swaps its canvas.
//! 3. External links never change the page.
//! 4. The header spawns three canvases whose bodies all load.
//! 5. Clicking the "click" sign adds a cookie; clicking a cookie removes it.
//! 6. Every shipped SVG yields a usable shape, and `sandbox.toml` parses.

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use std::time::Duration;
use svg_sandbox::config::SandboxConfig;
use svg_sandbox::descriptor::PointerPress;
use svg_sandbox::fetch::{AssetDirFetcher, SvgFetcher, SvgSource};
use svg_sandbox::interaction::{
    Navigation, NavigationRequest, PointerEvent, PointerMessage, SurfaceEvent, SurfaceMessage,
};
use svg_sandbox::reconcile::PendingBatch;
use svg_sandbox::rng::SpawnRng;
use svg_sandbox::session::{CanvasView, SimulationSession};
use svg_sandbox::simulation::SandboxPlugin;
use svg_sandbox::site::{HeaderCanvas, Page, PageCanvas, SitePlugin};
use svg_sandbox::svg::extract_shape;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Build a headless app with the sandbox core and the site layer.
fn site_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin))
        .insert_resource(SpawnRng::seeded(3))
        .insert_resource(SvgSource::new(AssetDirFetcher::new("assets")))
        .add_plugins((SandboxPlugin, SitePlugin));
    app
}

fn settle(app: &mut App) {
    app.update();
    for _ in 0..2000 {
        let mut q = app.world_mut().query::<&PendingBatch>();
        if q.iter(app.world()).count() == 0 {
            app.update();
            return;
        }
        std::thread::sleep(Duration::from_millis(1));
        app.update();
    }
    panic!("creation batches never finished");
}

fn page(app: &App) -> Page {
    *app.world().resource::<State<Page>>().get()
}

fn navigate(app: &mut App, navigation: Navigation) {
    app.world_mut().write_message(NavigationRequest(navigation));
    // Router runs in Update; the transition applies on the next frame.
    app.update();
    settle(app);
}

fn header(app: &mut App, which: HeaderCanvas) -> Entity {
    let mut q = app.world_mut().query::<(Entity, &HeaderCanvas)>();
    q.iter(app.world())
        .find(|(_, h)| **h == which)
        .map(|(e, _)| e)
        .expect("header canvas exists")
}

fn page_canvas_ids(app: &mut App) -> Vec<Vec<String>> {
    let mut q = app
        .world_mut()
        .query_filtered::<&CanvasView, With<PageCanvas>>();
    q.iter(app.world())
        .map(|v| v.objects.iter().map(|d| d.id.clone()).collect())
        .collect()
}

fn live_ids(app: &App, canvas: Entity) -> Vec<String> {
    let mut ids: Vec<String> = app
        .world()
        .get::<SimulationSession>(canvas)
        .expect("session")
        .live_ids()
        .into_iter()
        .map(String::from)
        .collect();
    ids.sort();
    ids
}

/// Freeze `canvas`, highlight the body `id` and press the primary button.
fn click_body(app: &mut App, canvas: Entity, id: &str) {
    app.world_mut().write_message(SurfaceMessage {
        canvas,
        event: SurfaceEvent::PointerEnter,
    });
    app.update();

    let session = app.world().get::<SimulationSession>(canvas).expect("session");
    let body = session.body(id).expect("body is live");
    let frame = session.frame(60.0).expect("running");
    let world = app
        .world()
        .get::<Transform>(body)
        .expect("transform")
        .translation
        .truncate();

    app.world_mut().write_message(PointerMessage {
        canvas,
        event: PointerEvent::Move(frame.to_canvas(world)),
    });
    app.world_mut().write_message(PointerMessage {
        canvas,
        event: PointerEvent::Down(PointerPress::primary()),
    });
    app.update();

    app.world_mut().write_message(SurfaceMessage {
        canvas,
        event: SurfaceEvent::PointerLeave,
    });
    settle(app);
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn default_page_is_home() {
    let mut app = site_app();
    settle(&mut app);
    assert_eq!(page(&app), Page::Home);
    assert_eq!(page_canvas_ids(&mut app), [["hi", "i_am", "student"]]);
}

#[test]
fn in_app_navigation_swaps_the_page_canvas() {
    let mut app = site_app();
    settle(&mut app);

    navigate(&mut app, Navigation::InApp("/contacts".into()));
    assert_eq!(page(&app), Page::Contacts);
    assert_eq!(page_canvas_ids(&mut app), [["github"]]);

    navigate(&mut app, Navigation::InApp("/".into()));
    assert_eq!(page(&app), Page::Home);
    assert_eq!(page_canvas_ids(&mut app), [["hi", "i_am", "student"]]);
}

#[test]
fn external_links_do_not_change_the_page() {
    let mut app = site_app();
    settle(&mut app);

    navigate(
        &mut app,
        Navigation::Open {
            href: "https://github.com/rhusiev".into(),
            target: "_self".into(),
        },
    );
    navigate(
        &mut app,
        Navigation::Open {
            href: "/contacts".into(),
            target: "_blank".into(),
        },
    );
    assert_eq!(page(&app), Page::Home);
}

#[test]
fn header_canvases_load_all_bodies() {
    let mut app = site_app();
    settle(&mut app);

    let home = header(&mut app, HeaderCanvas::Home);
    let click = header(&mut app, HeaderCanvas::Click);
    let nav = header(&mut app, HeaderCanvas::Navigation);
    assert_eq!(live_ids(&app, home), ["hamster"]);
    assert_eq!(live_ids(&app, click), ["click"]);
    assert_eq!(live_ids(&app, nav), ["conspectus", "contacts"]);
}

#[test]
fn hamster_click_routes_home() {
    let mut app = site_app();
    settle(&mut app);
    navigate(&mut app, Navigation::InApp("/contacts".into()));

    let home = header(&mut app, HeaderCanvas::Home);
    click_body(&mut app, home, "hamster");
    assert_eq!(page(&app), Page::Home);
}

#[test]
fn cookies_come_and_go() {
    let mut app = site_app();
    settle(&mut app);
    let click = header(&mut app, HeaderCanvas::Click);

    click_body(&mut app, click, "click");
    let ids = live_ids(&app, click);
    assert_eq!(ids.len(), 2);
    let cookie = ids
        .iter()
        .find(|id| id.starts_with("cookie-"))
        .cloned()
        .expect("a cookie was added");

    click_body(&mut app, click, &cookie);
    assert_eq!(live_ids(&app, click), ["click"]);
}

#[test]
fn shipped_svgs_are_usable() {
    let fetcher = AssetDirFetcher::new("assets");
    let config = SandboxConfig::default();
    let dirs = ["assets/header", "assets/main", "assets/contacts"];
    let mut checked = 0;
    for dir in dirs {
        for entry in std::fs::read_dir(dir).expect("asset dir") {
            let path = entry.expect("entry").path();
            let url = format!("/{}", path.strip_prefix("assets").unwrap().display());
            let doc = fetcher.fetch(&url).expect("fetch");
            let shape = extract_shape(&doc, 1.0, config.curve_sample_length)
                .unwrap_or_else(|e| panic!("{url}: {e}"));
            assert!(shape.vertex_count() >= 3, "{url}");
            checked += 1;
        }
    }
    assert_eq!(checked, 18);
}

#[test]
fn shipped_config_parses() {
    let contents = std::fs::read_to_string("assets/sandbox.toml").expect("config file");
    let config = SandboxConfig::from_toml_str(&contents).expect("valid TOML");
    assert_eq!(config.default_padding, 30.0);
    assert!(!config.show_canvas_bounds);
}

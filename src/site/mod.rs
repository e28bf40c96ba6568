//! Personal-site demo: header canvases, routed pages, navigation.
//!
//! ## States
//!
//! | State      | Route       | Page canvas                          |
//! |------------|-------------|--------------------------------------|
//! | `Home`     | `/`         | 1500×600 greeting, freeze disabled   |
//! | `Contacts` | `/contacts` | 1200×500 with the GitHub link        |
//!
//! ## Systems (registered by `SitePlugin`)
//!
//! | System                  | Schedule           | Purpose                            |
//! |-------------------------|--------------------|------------------------------------|
//! | `spawn_header`          | `Startup`          | Three always-present header canvases |
//! | `spawn_home_page`       | `OnEnter(Home)`    | Home page canvas                   |
//! | `spawn_contacts_page`   | `OnEnter(Contacts)`| Contacts page canvas               |
//! | `cleanup_page`          | `OnExit(*)`        | Despawn the page canvas            |
//! | `navigation_router_system` | `Update`        | `NavigationRequest` → `Page`       |

pub mod header;
pub mod pages;

pub use header::{click_spawner_descriptor, cookie_descriptor, spawn_header, HeaderCanvas};
pub use pages::{cleanup_page, spawn_contacts_page, spawn_home_page, PageCanvas};

use crate::interaction::{Navigation, NavigationRequest};
use bevy::prelude::*;

/// Logical window size the layout is designed for.
pub const WINDOW_SIZE: Vec2 = Vec2::new(1500.0, 860.0);

/// Height of the header row.
pub const HEADER_HEIGHT: f32 = 250.0;

/// World position of the window's top-left corner with a centred camera.
pub fn layout_origin() -> Vec2 {
    Vec2::new(-WINDOW_SIZE.x / 2.0, WINDOW_SIZE.y / 2.0)
}

/// Routed page.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Page {
    #[default]
    Home,
    Contacts,
}

impl Page {
    pub fn from_route(href: &str) -> Option<Self> {
        match href.trim_end_matches('/') {
            "" => Some(Self::Home),
            "/contacts" => Some(Self::Contacts),
            _ => None,
        }
    }
}

pub struct SitePlugin;

impl Plugin for SitePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<Page>()
            .add_systems(Startup, spawn_header)
            .add_systems(OnEnter(Page::Home), spawn_home_page)
            .add_systems(OnExit(Page::Home), cleanup_page)
            .add_systems(OnEnter(Page::Contacts), spawn_contacts_page)
            .add_systems(OnExit(Page::Contacts), cleanup_page)
            .add_systems(Update, navigation_router_system);
    }
}

/// Follow in-app links; external ones are only logged.
pub fn navigation_router_system(
    mut requests: MessageReader<NavigationRequest>,
    mut next_page: ResMut<NextState<Page>>,
) {
    for NavigationRequest(navigation) in requests.read() {
        let route = match navigation {
            Navigation::InApp(href) => Some(href.as_str()),
            Navigation::Open { href, target } if href.starts_with('/') && target == "_self" => {
                Some(href.as_str())
            }
            Navigation::Open { href, target } => {
                info!("[site] open {href} in {target}");
                None
            }
        };
        let Some(href) = route else {
            continue;
        };
        match Page::from_route(href) {
            Some(page) => {
                info!("[site] navigate to {href}");
                next_page.set(page);
            }
            None => warn!("[site] no page for route {href}"),
        }
    }
}

//! Interaction layer: hover freeze, nearest-body selection, click dispatch.
//!
//! ## Sub-module layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`freeze`] | Surface enter/leave/focus/blur → freeze and unfreeze a session |
//! | [`selection`] | Pointer move while frozen → nearest-body highlight |
//! | [`dispatch`] | Pointer press / context menu on the selected body → navigation or callback |
//! | [`input`] | Window cursor, mouse buttons and keyboard focus → canvas messages |
//!
//! Everything except [`input`] is driven by messages, so headless tests (and
//! any other caller) can inject surface and pointer events directly.

pub mod dispatch;
pub mod freeze;
pub mod input;
pub mod selection;

pub use dispatch::{
    pointer_press_system, resolve_click, suppresses_context_menu, ClickOutcome,
    ContextMenuSuppressed, Navigation, NavigationRequest, ObjectClicked,
};
pub use freeze::{freeze_session, surface_events_system, unfreeze_session};
pub use input::{keyboard_focus_system, window_pointer_system, PointerTracker};
pub use selection::{nearest_body, pointer_move_system};

use crate::descriptor::PointerPress;
use bevy::prelude::*;

/// Canvas surface state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    PointerEnter,
    PointerLeave,
    Focus,
    Blur,
}

#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMessage {
    pub canvas: Entity,
    pub event: SurfaceEvent,
}

/// Pointer activity on a canvas.  Positions are in canvas space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Move(Vec2),
    Down(PointerPress),
    ContextMenu,
}

#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct PointerMessage {
    pub canvas: Entity,
    pub event: PointerEvent,
}

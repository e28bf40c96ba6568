//! Click and context-menu dispatch for the selected body.

use super::{PointerEvent, PointerMessage};
use crate::descriptor::{ClickHandler, ObjectClick, ObjectDescriptor, PointerButton, PointerPress};
use crate::session::SimulationSession;
use bevy::prelude::*;

/// Where a linked body asks to go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Route inside the application.
    InApp(String),
    /// Open in a named browsing context (`_self`, `_blank`, ...).
    Open { href: String, target: String },
}

#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest(pub Navigation);

/// Emitted for every press that reached a body's link or handler.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct ObjectClicked {
    pub canvas: Entity,
    pub id: String,
    pub press: PointerPress,
}

/// The default context menu was withheld because the selected body is a link.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct ContextMenuSuppressed {
    pub canvas: Entity,
    pub id: String,
}

#[derive(Debug, Clone)]
pub enum ClickOutcome {
    Navigate(Navigation),
    Invoke(ClickHandler),
    Ignored,
}

/// Decide what a press on a body does.
///
/// A link always wins over a handler.  Middle button or ctrl/meta asks for a
/// new context; a `/`-rooted link clicked plainly with the primary button
/// stays in the app.
pub fn resolve_click(descriptor: &ObjectDescriptor, press: &PointerPress) -> ClickOutcome {
    if let Some(href) = &descriptor.href {
        let new_context = press.button == PointerButton::Auxiliary
            || press.modifiers.ctrl
            || press.modifiers.meta;
        let local = href.starts_with('/');

        if local && press.button == PointerButton::Primary && !new_context {
            return ClickOutcome::Navigate(Navigation::InApp(href.clone()));
        }
        let target = if new_context {
            "_blank".to_string()
        } else {
            descriptor.target.clone().unwrap_or_else(|| "_self".to_string())
        };
        return ClickOutcome::Navigate(Navigation::Open {
            href: href.clone(),
            target,
        });
    }

    match &descriptor.on_click {
        Some(handler) if press.button == PointerButton::Primary => {
            ClickOutcome::Invoke(handler.clone())
        }
        _ => ClickOutcome::Ignored,
    }
}

pub fn suppresses_context_menu(descriptor: &ObjectDescriptor) -> bool {
    descriptor.href.is_some()
}

/// Route presses and context-menu requests to the selected body's descriptor.
pub fn pointer_press_system(
    mut commands: Commands,
    mut messages: MessageReader<PointerMessage>,
    sessions: Query<&SimulationSession>,
    mut navigation: MessageWriter<NavigationRequest>,
    mut clicked: MessageWriter<ObjectClicked>,
    mut suppressed: MessageWriter<ContextMenuSuppressed>,
) {
    for message in messages.read() {
        let Ok(session) = sessions.get(message.canvas) else {
            continue;
        };
        let Some(descriptor) = session.selected().and_then(|body| session.callback(body)) else {
            continue;
        };

        match message.event {
            PointerEvent::Down(press) => {
                let outcome = resolve_click(descriptor, &press);
                match outcome {
                    ClickOutcome::Navigate(nav) => {
                        debug!("[interaction] '{}' navigates to {nav:?}", descriptor.id);
                        navigation.write(NavigationRequest(nav));
                    }
                    ClickOutcome::Invoke(handler) => {
                        let click = ObjectClick {
                            canvas: message.canvas,
                            id: descriptor.id.clone(),
                            press,
                        };
                        handler.call(&click, &mut commands);
                    }
                    ClickOutcome::Ignored => continue,
                }
                clicked.write(ObjectClicked {
                    canvas: message.canvas,
                    id: descriptor.id.clone(),
                    press,
                });
            }
            PointerEvent::ContextMenu => {
                if suppresses_context_menu(descriptor) {
                    suppressed.write(ContextMenuSuppressed {
                        canvas: message.canvas,
                        id: descriptor.id.clone(),
                    });
                }
            }
            PointerEvent::Move(_) => {}
        }
    }
}

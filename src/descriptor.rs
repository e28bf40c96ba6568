//! Declarative object descriptors supplied by the page layer.
//!
//! A [`CanvasView`](crate::session::CanvasView) holds a list of
//! [`ObjectDescriptor`]s.  The page layer may replace or edit that list at any
//! time; the reconciler only looks at which ids appeared or disappeared.
//! Editing any other field of an id that is already live has no effect on its
//! body.

use bevy::prelude::*;
use std::fmt;
use std::sync::Arc;

/// Which pointer button produced a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Usually the left button.
    Primary,
    /// Usually the middle button / wheel click.
    Auxiliary,
    /// Usually the right button.
    Secondary,
}

/// Modifier keys held during a press that ask for a new browsing context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
}

/// A pointer press on a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerPress {
    pub button: PointerButton,
    pub modifiers: Modifiers,
}

impl PointerPress {
    pub fn primary() -> Self {
        Self {
            button: PointerButton::Primary,
            modifiers: Modifiers::default(),
        }
    }
}

/// Context handed to a [`ClickHandler`].
#[derive(Debug, Clone)]
pub struct ObjectClick {
    /// Canvas entity owning the clicked body.
    pub canvas: Entity,
    /// Descriptor id of the clicked body.
    pub id: String,
    pub press: PointerPress,
}

type ClickFn = dyn Fn(&ObjectClick, &mut Commands) + Send + Sync;

/// Click callback attached to a descriptor.
///
/// Handlers run inside the dispatch system and change the world through
/// [`Commands`], e.g. by queueing an edit of a canvas's object list.
#[derive(Clone)]
pub struct ClickHandler(Arc<ClickFn>);

impl ClickHandler {
    pub fn new(f: impl Fn(&ObjectClick, &mut Commands) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self, click: &ObjectClick, commands: &mut Commands) {
        (self.0)(click, commands)
    }
}

impl fmt::Debug for ClickHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClickHandler(..)")
    }
}

/// One simulated object as described by the page layer.
///
/// Positions are in canvas space (top-left origin, +y down).  Velocities are
/// pixels per reference frame; angular velocity is radians per reference
/// frame, positive clockwise on screen.
#[derive(Debug, Clone)]
pub struct ObjectDescriptor {
    /// Stable identity, unique within one canvas.
    pub id: String,
    pub texture_svg_path: String,
    pub collision_svg_path: String,
    pub scale: Option<f32>,
    pub initial_position: Option<Vec2>,
    pub initial_velocity: Option<Vec2>,
    pub angular_velocity: Option<f32>,
    pub on_click: Option<ClickHandler>,
    /// Navigation target; takes precedence over `on_click`.
    pub href: Option<String>,
    /// Browsing-context name used when `href` opens outside the app.
    pub target: Option<String>,
}

impl ObjectDescriptor {
    pub fn new(
        id: impl Into<String>,
        texture_svg_path: impl Into<String>,
        collision_svg_path: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            texture_svg_path: texture_svg_path.into(),
            collision_svg_path: collision_svg_path.into(),
            scale: None,
            initial_position: None,
            initial_velocity: None,
            angular_velocity: None,
            on_click: None,
            href: None,
            target: None,
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.initial_position = Some(Vec2::new(x, y));
        self
    }

    pub fn moving(mut self, vx: f32, vy: f32) -> Self {
        self.initial_velocity = Some(Vec2::new(vx, vy));
        self
    }

    pub fn spinning(mut self, angular_velocity: f32) -> Self {
        self.angular_velocity = Some(angular_velocity);
        self
    }

    pub fn on_click(
        mut self,
        f: impl Fn(&ObjectClick, &mut Commands) + Send + Sync + 'static,
    ) -> Self {
        self.on_click = Some(ClickHandler::new(f));
        self
    }

    pub fn linking(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }
}

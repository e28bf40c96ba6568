//! SVG physics sandbox.
//!
//! SVG icons are turned into rigid bodies and dropped into bounded canvases
//! that simulate continuously.  Hovering or focusing a canvas freezes it, the
//! body nearest the pointer is highlighted, and clicking it follows its link
//! or runs its handler.  Each canvas is driven by a declarative object list
//! that can be edited while the simulation keeps running.

pub mod body;
pub mod config;
pub mod constants;
pub mod descriptor;
pub mod error;
pub mod fetch;
pub mod graphics;
pub mod interaction;
pub mod reconcile;
pub mod rendering;
pub mod rng;
pub mod session;
pub mod simulation;
pub mod site;
pub mod svg;

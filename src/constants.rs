//! Centralised sandbox constants.
//!
//! Every tuneable default lives here.  [`crate::config::SandboxConfig`]
//! mirrors these values and lets `assets/sandbox.toml` override any subset at
//! startup, so this file stays the **authoritative default** source.
//!
//! ## Units
//!
//! Caller-facing values are in *canvas space*: pixels, origin at the top-left
//! corner of a canvas, +y pointing down.  Velocities are pixels per reference
//! frame (see [`FRAME_RATE_REFERENCE`]) so descriptor numbers read the same as
//! the page definitions that use them.

// ── Canvas Geometry ───────────────────────────────────────────────────────────

/// Inset (px) between the visible canvas edge and the inner face of each wall.
pub const DEFAULT_PADDING: f32 = 30.0;

/// Thickness (px) of the four invisible boundary walls.
///
/// Thick enough that a body moving a few hundred px/s cannot tunnel through
/// in a single physics step even without CCD.
pub const WALL_THICKNESS: f32 = 50.0;

// ── Vertex Extraction ─────────────────────────────────────────────────────────

/// Scale applied to both collision and sprite geometry when a descriptor does
/// not specify one.
pub const DEFAULT_SCALE: f32 = 0.5;

/// Maximum arc length (px, pre-scale) between consecutive samples on a curved
/// path segment.
pub const CURVE_SAMPLE_LENGTH: f32 = 10.0;

/// Minimum distance (px) between two consecutive ring vertices; closer points
/// are merged.
pub const VERTEX_DEDUP_MIN_DIST: f32 = 1e-3;

// ── Randomised Spawn Defaults ─────────────────────────────────────────────────

/// Fraction of the canvas kept clear on each side when picking a random spawn
/// position.  0.1 → bodies spawn within the central 80 % of each axis.
pub const SPAWN_MARGIN_FRACTION: f32 = 0.1;

/// Random initial velocity is drawn uniformly from ±this value per axis
/// (px per reference frame).
pub const RANDOM_VELOCITY_RANGE: f32 = 1.0;

/// Random initial angular velocity is drawn uniformly from ±this value
/// (rad per reference frame).
pub const RANDOM_ANGULAR_VELOCITY_RANGE: f32 = 0.025;

// ── Physics ───────────────────────────────────────────────────────────────────

/// Frames per second that descriptor velocities are expressed against.
///
/// A descriptor velocity of `1.0` moves a body one pixel per frame at this
/// rate, i.e. `FRAME_RATE_REFERENCE` px/s in the physics world.
pub const FRAME_RATE_REFERENCE: f32 = 60.0;

/// Gravity in canvas space (px/s², +y down).
///
/// 1000 px/s² downward is the classic 0.001 px/ms² browser-physics default.
pub const GRAVITY: [f32; 2] = [0.0, 1000.0];

/// Additional principal inertia given to every body.
///
/// Large enough that contacts cannot measurably change the spin, so a body
/// keeps rotating at exactly the angular velocity it was given.
pub const SPIN_INERTIA: f32 = 1.0e12;

/// Restitution coefficient for sandbox bodies (1.0 = lossless bounce).
pub const BODY_RESTITUTION: f32 = 1.0;

/// Friction coefficient for sandbox bodies.
pub const BODY_FRICTION: f32 = 0.0;

// ── Interaction ───────────────────────────────────────────────────────────────

/// Visual scale multiplier applied to the selected body's sprite.
pub const SELECTION_SCALE: f32 = 1.25;

// ── Rendering ─────────────────────────────────────────────────────────────────

/// Default outline colour (sRGB hex) for rings that carry no colour of their own.
pub const OUTLINE_COLOR: &str = "#f2f2f2";

// ── Assets ────────────────────────────────────────────────────────────────────

/// Directory that `/`-rooted SVG urls are resolved against.
pub const ASSET_ROOT: &str = "assets";

/// Path of the optional TOML override file.
pub const CONFIG_PATH: &str = "assets/sandbox.toml";

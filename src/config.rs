//! Runtime sandbox configuration loaded from `assets/sandbox.toml`.
//!
//! [`SandboxConfig`] is a Bevy [`Resource`] that mirrors every default in
//! [`crate::constants`].  At startup, [`load_sandbox_config`] reads the TOML
//! file and replaces the defaults with whatever it contains.  Missing keys
//! fall back to the compile-time defaults, so a minimal file can override just
//! the values you care about:
//!
//! ```toml
//! selection_scale = 1.4
//! gravity = [0.0, 0.0]
//! rng_seed = 7
//! ```

use crate::constants::*;
use crate::error::{SandboxError, SandboxResult};
use bevy::prelude::*;
use serde::Deserialize;

/// How a ring of vertices becomes collision geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeMode {
    /// One convex hull per ring.  Cheap; concave outlines get filled in.
    ConvexHull,
    /// Convex decomposition per ring; follows concave outlines.
    #[default]
    Decomposition,
}

/// Runtime-tunable sandbox configuration.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    // ── Canvas Geometry ──────────────────────────────────────────────────────
    pub default_padding: f32,
    pub wall_thickness: f32,

    // ── Vertex Extraction ────────────────────────────────────────────────────
    pub default_scale: f32,
    pub curve_sample_length: f32,
    pub shape_mode: ShapeMode,

    // ── Randomised Spawn Defaults ────────────────────────────────────────────
    pub spawn_margin_fraction: f32,
    pub random_velocity_range: f32,
    pub random_angular_velocity_range: f32,
    /// Fixed seed for reproducible spawns; `None` seeds from entropy.
    pub rng_seed: Option<u64>,

    // ── Physics ──────────────────────────────────────────────────────────────
    pub frame_rate_reference: f32,
    pub gravity: [f32; 2],
    pub spin_inertia: f32,

    // ── Interaction ──────────────────────────────────────────────────────────
    pub selection_scale: f32,

    // ── Rendering ────────────────────────────────────────────────────────────
    pub outline_color: String,
    pub show_canvas_bounds: bool,

    // ── Assets ───────────────────────────────────────────────────────────────
    pub asset_root: String,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            default_padding: DEFAULT_PADDING,
            wall_thickness: WALL_THICKNESS,
            default_scale: DEFAULT_SCALE,
            curve_sample_length: CURVE_SAMPLE_LENGTH,
            shape_mode: ShapeMode::default(),
            spawn_margin_fraction: SPAWN_MARGIN_FRACTION,
            random_velocity_range: RANDOM_VELOCITY_RANGE,
            random_angular_velocity_range: RANDOM_ANGULAR_VELOCITY_RANGE,
            rng_seed: None,
            frame_rate_reference: FRAME_RATE_REFERENCE,
            gravity: GRAVITY,
            spin_inertia: SPIN_INERTIA,
            selection_scale: SELECTION_SCALE,
            outline_color: OUTLINE_COLOR.to_string(),
            show_canvas_bounds: false,
            asset_root: ASSET_ROOT.to_string(),
        }
    }
}

impl SandboxConfig {
    /// Parse a TOML document, filling absent keys with defaults.
    pub fn from_toml_str(contents: &str) -> SandboxResult<Self> {
        toml::from_str(contents).map_err(|e| SandboxError::Config(e.to_string()))
    }

    /// Default outline colour, falling back to white on a malformed hex string.
    pub fn outline_color(&self) -> Color {
        Srgba::hex(&self.outline_color)
            .map(Color::from)
            .unwrap_or(Color::WHITE)
    }
}

/// Startup system: load `assets/sandbox.toml` over the compiled defaults.
///
/// A missing file is not an error.  A malformed file is reported and the
/// defaults stay in place.
pub fn load_sandbox_config(mut config: ResMut<SandboxConfig>) {
    match std::fs::read_to_string(CONFIG_PATH) {
        Ok(contents) => match SandboxConfig::from_toml_str(&contents) {
            Ok(loaded) => {
                *config = loaded;
                info!("[config] loaded {CONFIG_PATH}");
            }
            Err(e) => warn!("[config] {e}; using defaults"),
        },
        Err(_) => info!("[config] no {CONFIG_PATH} found; using compiled defaults"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg = SandboxConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.default_padding, DEFAULT_PADDING);
        assert_eq!(cfg.selection_scale, SELECTION_SCALE);
        assert_eq!(cfg.shape_mode, ShapeMode::Decomposition);
        assert!(cfg.rng_seed.is_none());
    }

    #[test]
    fn partial_toml_overrides_only_given_keys() {
        let cfg = SandboxConfig::from_toml_str(
            "selection_scale = 1.5\nrng_seed = 42\nshape_mode = \"convex_hull\"\ngravity = [0.0, 0.0]",
        )
        .unwrap();
        assert_eq!(cfg.selection_scale, 1.5);
        assert_eq!(cfg.rng_seed, Some(42));
        assert_eq!(cfg.shape_mode, ShapeMode::ConvexHull);
        assert_eq!(cfg.gravity, [0.0, 0.0]);
        assert_eq!(cfg.wall_thickness, WALL_THICKNESS);
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = SandboxConfig::from_toml_str("selection_scale = \"big\"").unwrap_err();
        assert!(matches!(err, SandboxError::Config(_)));
    }

    #[test]
    fn bad_outline_hex_falls_back_to_white() {
        let cfg = SandboxConfig {
            outline_color: "not-a-colour".into(),
            ..Default::default()
        };
        assert_eq!(cfg.outline_color(), Color::WHITE);
    }
}

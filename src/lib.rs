//! Page Ball - roll a ball around a web page and bump into content cards
//!
//! Core modules:
//! - `sim`: Ball physics (fixed step integrator, AABB collision against page surfaces)
//! - `catalog`: Registry of collidable page surfaces, measured fresh every frame
//! - `game`: Activation lifecycle, keyboard input, auto-scroll and card triggers
//! - `settings`: Data-driven tuning, persisted like any other preference
//! - `platform`: Host bindings (headless page for tests/native, DOM on wasm)

pub mod catalog;
pub mod game;
pub mod platform;
pub mod settings;
pub mod sim;

pub use catalog::{SurfaceCatalog, SurfaceHandle};
pub use game::{Game, GameEvent, HostEffects, Scheduler, Timer};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Ball radius in CSS pixels
    pub const BALL_RADIUS: f32 = 10.0;
    /// Constant vertical acceleration per tick (supported, off by default)
    pub const GRAVITY: f32 = 0.0;
    /// Velocity retained per tick on both axes
    pub const FRICTION: f32 = 0.97;
    /// Velocity retained (and inverted) on a bounce
    pub const BOUNCE_FACTOR: f32 = 0.5;
    /// Velocity added per tick per held direction
    pub const MOVE_ACCEL: f32 = 0.45;
    /// Per-axis speed caps (pixels per tick)
    pub const MAX_VX: f32 = 7.0;
    pub const MAX_VY: f32 = 7.0;
    /// Below this speed a collision stops the ball instead of bouncing it
    pub const MIN_BOUNCE_VEL: f32 = 0.4;
    /// Velocity components under this are snapped to zero
    pub const DRIFT_EPSILON: f32 = 0.05;
    /// Vertical speed under which a top contact counts as resting
    pub const GROUNDED_SPEED: f32 = 2.0;

    /// Auto-scroll dead zone, as fractions of viewport height
    pub const SCROLL_MARGIN_TOP: f32 = 0.3;
    pub const SCROLL_MARGIN_BOTTOM: f32 = 0.3;
    /// Auto-scroll speed at the viewport edge (pixels per frame)
    pub const MAX_SCROLL_SPEED: f32 = 8.0;

    /// Smooth scrolling stays enabled this long after centering on a card
    pub const SMOOTH_SCROLL_RESTORE_MS: u32 = 600;
    /// Card highlight auto-clears after this long
    pub const HIGHLIGHT_CLEAR_MS: u32 = 1500;
}

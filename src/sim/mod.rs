//! Ball simulation module
//!
//! Pure and platform-free:
//! - Fixed step per call, no wall-clock time
//! - Surfaces are handed in fresh every tick, nothing is remembered
//! - Stable resolution order (the order surfaces are supplied in)

pub mod physics;
pub mod surface;

pub use physics::{BallPhysics, PhysicsParams};
pub use surface::{Rect, Surface, SurfaceKind};

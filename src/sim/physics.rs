//! Fixed-step ball physics
//!
//! One call to [`BallPhysics::tick`] is one frame of motion. There is no
//! delta time: the integrator adds a fixed increment per call, so the ball
//! moves faster on high refresh rate displays.
//!
//! Collision uses the Minkowski trick: each surface rectangle is inflated by
//! the ball radius, after which the ball is a point. Surfaces are resolved one
//! after another in the order they were supplied, each seeing the position
//! already corrected by the ones before it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::surface::{Rect, Surface};
use crate::consts::*;

/// Tunable constants for the integrator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsParams {
    pub radius: f32,
    /// Added to vy every tick
    pub gravity: f32,
    /// Multiplier applied to velocity every tick (< 1)
    pub friction: f32,
    /// Fraction of speed kept on a bounce (< 1)
    pub bounce: f32,
    pub move_accel: f32,
    /// Per-axis speed cap
    pub max_speed: Vec2,
    pub min_bounce_speed: f32,
    pub drift_epsilon: f32,
    pub grounded_speed: f32,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            radius: BALL_RADIUS,
            gravity: GRAVITY,
            friction: FRICTION,
            bounce: BOUNCE_FACTOR,
            move_accel: MOVE_ACCEL,
            max_speed: Vec2::new(MAX_VX, MAX_VY),
            min_bounce_speed: MIN_BOUNCE_VEL,
            drift_epsilon: DRIFT_EPSILON,
            grounded_speed: GROUNDED_SPEED,
        }
    }
}

impl PhysicsParams {
    /// Invert and damp a velocity component, or stop it if it is too slow to bounce
    #[inline]
    fn bounce_or_stop(&self, v: f32) -> f32 {
        if v.abs() > self.min_bounce_speed {
            -v * self.bounce
        } else {
            0.0
        }
    }
}

/// Side of an inflated rectangle the ball is pushed out through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Face {
    Top,
    Bottom,
    Left,
    Right,
}

/// Face with the smallest penetration for a point inside `r`.
/// Ties go to top, then bottom, then left, then right.
fn shallowest_face(r: &Rect, p: Vec2) -> Face {
    let depths = [
        (Face::Top, p.y - r.top),
        (Face::Bottom, r.bottom - p.y),
        (Face::Left, p.x - r.left),
        (Face::Right, r.right - p.x),
    ];
    let mut best = depths[0];
    for candidate in &depths[1..] {
        if candidate.1 < best.1 {
            best = *candidate;
        }
    }
    best.0
}

/// The single simulated ball and everything it collides with this frame
#[derive(Debug, Clone)]
pub struct BallPhysics {
    params: PhysicsParams,
    pos: Vec2,
    vel: Vec2,
    grounded: bool,
    /// Direction for the next tick only
    input: Vec2,
    platforms: Vec<Surface>,
    world_left: f32,
    world_right: f32,
}

impl Default for BallPhysics {
    fn default() -> Self {
        Self::new(PhysicsParams::default())
    }
}

impl BallPhysics {
    pub fn new(params: PhysicsParams) -> Self {
        Self {
            params,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            grounded: false,
            input: Vec2::ZERO,
            platforms: Vec::new(),
            world_left: 0.0,
            world_right: f32::INFINITY,
        }
    }

    pub fn params(&self) -> &PhysicsParams {
        &self.params
    }

    pub fn set_params(&mut self, params: PhysicsParams) {
        self.params = params;
    }

    /// Place the ball at rest
    pub fn init(&mut self, x: f32, y: f32) {
        self.pos = Vec2::new(x, y);
        self.vel = Vec2::ZERO;
        self.grounded = false;
    }

    /// Desired direction for the next tick, each axis coerced into [-1, 1]
    pub fn set_input(&mut self, dx: f32, dy: f32) {
        self.input = Vec2::new(dx, dy).clamp(Vec2::NEG_ONE, Vec2::ONE);
    }

    pub fn set_platforms(&mut self, surfaces: Vec<Surface>) {
        self.platforms = surfaces;
    }

    pub fn set_world_bounds(&mut self, left: f32, right: f32) {
        self.world_left = left;
        self.world_right = right;
    }

    /// Advance one fixed step
    pub fn tick(&mut self) {
        let p = self.params;
        let input = std::mem::take(&mut self.input);

        self.vel.y += p.gravity;
        self.vel += input * p.move_accel;
        self.vel = self.vel.clamp(-p.max_speed, p.max_speed);

        self.vel *= p.friction;
        if self.vel.x.abs() < p.drift_epsilon {
            self.vel.x = 0.0;
        }
        if self.vel.y.abs() < p.drift_epsilon {
            self.vel.y = 0.0;
        }

        let mut next = self.pos + self.vel;
        self.grounded = false;

        for surface in &self.platforms {
            let e = surface.rect.expand(p.radius);
            if !e.contains(next) {
                continue;
            }

            match shallowest_face(&e, next) {
                Face::Top => {
                    next.y = e.top;
                    if self.vel.y > 0.0 {
                        self.vel.y = p.bounce_or_stop(self.vel.y);
                        self.grounded = self.vel.y.abs() < p.grounded_speed;
                    }
                }
                Face::Bottom => {
                    next.y = e.bottom;
                    if self.vel.y < 0.0 {
                        self.vel.y = p.bounce_or_stop(self.vel.y);
                    }
                }
                Face::Left => {
                    next.x = e.left;
                    if self.vel.x > 0.0 {
                        self.vel.x = p.bounce_or_stop(self.vel.x);
                    }
                }
                Face::Right => {
                    next.x = e.right;
                    if self.vel.x < 0.0 {
                        self.vel.x = p.bounce_or_stop(self.vel.x);
                    }
                }
            }
        }

        let min_x = self.world_left + p.radius;
        let max_x = self.world_right - p.radius;
        if next.x < min_x {
            next.x = min_x;
            if self.vel.x < 0.0 {
                self.vel.x = p.bounce_or_stop(self.vel.x);
            }
        } else if next.x > max_x {
            next.x = max_x;
            if self.vel.x > 0.0 {
                self.vel.x = p.bounce_or_stop(self.vel.x);
            }
        }

        self.pos = next;
    }

    pub fn position(&self) -> Vec2 {
        self.pos
    }

    pub fn velocity(&self) -> Vec2 {
        self.vel
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn radius(&self) -> f32 {
        self.params.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn shelf() -> Surface {
        Surface::solid("shelf", Rect::new(50.0, 150.0, 150.0, 160.0))
    }

    #[test]
    fn test_at_rest_without_input() {
        let mut ball = BallPhysics::default();
        ball.init(100.0, 100.0);
        ball.set_platforms(vec![shelf()]);
        ball.tick();
        assert_eq!(ball.position(), Vec2::new(100.0, 100.0));
        assert_eq!(ball.velocity(), Vec2::ZERO);
        assert!(!ball.is_grounded());
    }

    #[test]
    fn test_tick_before_init() {
        let mut ball = BallPhysics::default();
        ball.tick();
        // World left defaults to 0, so the ball is pushed in by its radius
        assert_eq!(ball.position(), Vec2::new(BALL_RADIUS, 0.0));
        assert_eq!(ball.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_input_is_consumed() {
        let mut ball = BallPhysics::default();
        ball.init(100.0, 100.0);
        ball.set_input(1.0, 0.0);
        ball.tick();
        let after_push = ball.velocity().x;
        assert!((after_push - MOVE_ACCEL * FRICTION).abs() < 1e-6);
        ball.tick();
        // No new input: only friction acts
        assert!((ball.velocity().x - after_push * FRICTION).abs() < 1e-6);
    }

    #[test]
    fn test_input_coerced_to_unit() {
        let mut ball = BallPhysics::default();
        ball.init(100.0, 100.0);
        ball.set_input(5.0, -3.0);
        ball.tick();
        let expected = MOVE_ACCEL * FRICTION;
        assert!((ball.velocity().x - expected).abs() < 1e-6);
        assert!((ball.velocity().y + expected).abs() < 1e-6);
    }

    #[test]
    fn test_fast_landing_bounces() {
        let mut ball = BallPhysics::default();
        ball.init(100.0, 0.0);
        ball.set_platforms(vec![shelf()]);

        let mut bounced = false;
        for _ in 0..200 {
            let before = ball.velocity().y;
            ball.set_input(0.0, 1.0);
            ball.tick();
            if ball.velocity().y < 0.0 {
                assert!(before > 1.0, "should have been falling fast");
                assert!(ball.velocity().y.abs() < before);
                assert_eq!(ball.position().y, 140.0);
                bounced = true;
                break;
            }
        }
        assert!(bounced);
    }

    #[test]
    fn test_slow_landing_stops_and_grounds() {
        let params = PhysicsParams {
            move_accel: 0.3,
            ..Default::default()
        };
        let mut ball = BallPhysics::new(params);
        ball.init(100.0, 139.9);
        ball.set_platforms(vec![shelf()]);
        ball.set_input(0.0, 1.0);
        ball.tick();

        assert_eq!(ball.velocity().y, 0.0);
        assert!(ball.is_grounded());
        assert_eq!(ball.position().y, 140.0);
    }

    #[test]
    fn test_held_down_settles_on_top() {
        let mut ball = BallPhysics::default();
        ball.init(100.0, 100.0);
        ball.set_platforms(vec![shelf()]);

        for _ in 0..600 {
            ball.set_input(0.0, 1.0);
            ball.tick();
            assert!(ball.velocity().y.abs() <= MAX_VY);
        }

        assert_eq!(ball.position().y, 150.0 - BALL_RADIUS);
        assert_eq!(ball.position().x, 100.0);
        assert!(ball.is_grounded());
    }

    #[test]
    fn test_ceiling_hit_from_below() {
        let mut ball = BallPhysics::default();
        ball.init(100.0, 200.0);
        ball.set_platforms(vec![shelf()]);

        for _ in 0..100 {
            ball.set_input(0.0, -1.0);
            ball.tick();
            if ball.velocity().y > 0.0 {
                break;
            }
        }
        assert_eq!(ball.position().y, 170.0);
        assert!(ball.velocity().y > 0.0);
        assert!(!ball.is_grounded());
    }

    #[test]
    fn test_side_hit() {
        let wall = Surface::solid("wall", Rect::new(200.0, 0.0, 220.0, 400.0));
        let mut ball = BallPhysics::default();
        ball.init(100.0, 200.0);
        ball.set_platforms(vec![wall]);

        for _ in 0..100 {
            ball.set_input(1.0, 0.0);
            ball.tick();
            if ball.velocity().x < 0.0 {
                break;
            }
        }
        assert_eq!(ball.position().x, 190.0);
        assert!(ball.velocity().x < 0.0);
    }

    #[test]
    fn test_surfaces_resolve_in_order() {
        // Two overlapping slabs: the first pushes the ball up onto the
        // second, which then pushes it up again.
        let lower = Surface::solid("lower", Rect::new(0.0, 100.0, 200.0, 140.0));
        let upper = Surface::solid("upper", Rect::new(0.0, 80.0, 200.0, 100.0));
        let mut ball = BallPhysics::default();
        ball.init(100.0, 95.0);
        ball.set_platforms(vec![lower.clone(), upper.clone()]);
        ball.tick();
        assert_eq!(ball.position().y, 70.0);

        // Reversed order stops after the lower slab
        let mut ball = BallPhysics::default();
        ball.init(100.0, 95.0);
        ball.set_platforms(vec![upper, lower]);
        ball.tick();
        assert_eq!(ball.position().y, 90.0);
    }

    #[test]
    fn test_world_bounds_bounce() {
        let mut ball = BallPhysics::default();
        ball.init(20.0, 100.0);
        ball.set_world_bounds(0.0, 500.0);

        let mut incoming = 0.0;
        for _ in 0..20 {
            incoming = ball.velocity().x;
            ball.set_input(-1.0, 0.0);
            ball.tick();
            assert!(ball.position().x >= BALL_RADIUS);
            if ball.velocity().x > 0.0 {
                break;
            }
        }

        // Reversed and damped, pinned to the bound
        assert_eq!(ball.position().x, BALL_RADIUS);
        let vx = ball.velocity().x;
        assert!(vx > 0.0);
        assert!(vx < incoming.abs());
        assert!((vx - 1.396925).abs() < 1e-4);
    }

    #[test]
    fn test_world_bounds_slow_hit_stops() {
        let params = PhysicsParams {
            move_accel: 0.3,
            ..Default::default()
        };
        let mut ball = BallPhysics::new(params);
        ball.init(10.2, 100.0);
        ball.set_world_bounds(0.0, 500.0);

        // -0.3 after friction is -0.291, under the bounce threshold
        ball.set_input(-1.0, 0.0);
        ball.tick();
        assert_eq!(ball.position().x, BALL_RADIUS);
        assert_eq!(ball.velocity().x, 0.0);
    }

    #[test]
    fn test_world_bounds_right_edge_mirrors_left() {
        let mut ball = BallPhysics::default();
        ball.init(480.0, 100.0);
        ball.set_world_bounds(0.0, 500.0);

        let mut incoming = 0.0;
        for _ in 0..20 {
            incoming = ball.velocity().x;
            ball.set_input(1.0, 0.0);
            ball.tick();
            assert!(ball.position().x <= 500.0 - BALL_RADIUS);
            if ball.velocity().x < 0.0 {
                break;
            }
        }

        assert_eq!(ball.position().x, 500.0 - BALL_RADIUS);
        let vx = ball.velocity().x;
        assert!(vx < 0.0);
        assert!(vx.abs() < incoming);
        assert!((vx + 1.396925).abs() < 1e-4);
    }

    #[test]
    fn test_params_replace_takes_effect_next_tick() {
        let mut ball = BallPhysics::default();
        assert_eq!(ball.params().move_accel, MOVE_ACCEL);

        ball.set_params(PhysicsParams {
            move_accel: 1.0,
            ..Default::default()
        });
        assert_eq!(ball.params().move_accel, 1.0);

        ball.init(100.0, 100.0);
        ball.set_input(1.0, 0.0);
        ball.tick();
        assert_eq!(ball.velocity().x, FRICTION);
    }

    #[test]
    fn test_friction_converges_to_zero() {
        let mut ball = BallPhysics::default();
        ball.init(500.0, 500.0);
        for _ in 0..30 {
            ball.set_input(1.0, 1.0);
            ball.tick();
        }

        let mut last = ball.velocity().length();
        let mut ticks = 0;
        while ball.velocity() != Vec2::ZERO {
            ball.tick();
            let speed = ball.velocity().length();
            assert!(speed < last);
            last = speed;
            ticks += 1;
            assert!(ticks < 500, "velocity never snapped to zero");
        }
    }

    proptest! {
        #[test]
        fn prop_velocity_stays_clamped(
            inputs in prop::collection::vec((-1i8..=1, -1i8..=1), 1..200),
        ) {
            let mut ball = BallPhysics::default();
            ball.init(300.0, 300.0);
            ball.set_world_bounds(0.0, 600.0);
            ball.set_platforms(vec![shelf()]);
            for (dx, dy) in inputs {
                ball.set_input(dx as f32, dy as f32);
                ball.tick();
                let v = ball.velocity();
                prop_assert!(v.x.abs() <= MAX_VX);
                prop_assert!(v.y.abs() <= MAX_VY);
            }
        }

        #[test]
        fn prop_x_within_world(
            start_x in -200.0f32..1200.0,
            left in 0.0f32..100.0,
            width in 40.0f32..800.0,
            inputs in prop::collection::vec(-1i8..=1, 1..100),
        ) {
            let right = left + width;
            let mut ball = BallPhysics::default();
            ball.init(start_x, 50.0);
            ball.set_world_bounds(left, right);
            for dx in inputs {
                ball.set_input(dx as f32, 0.0);
                ball.tick();
                let x = ball.position().x;
                prop_assert!(x >= left + BALL_RADIUS);
                prop_assert!(x <= right - BALL_RADIUS);
            }
        }
    }
}

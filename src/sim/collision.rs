//! Collision detection and response
//!
//! Tests one ball's candidate position against the rest of the world, in a
//! fixed priority order:
//!
//! 1. every other visible ball (all pairs are resolved, then the move is
//!    rejected if any touched)
//! 2. the six pockets (capture allows the move and skips the cushions)
//! 3. the twelve jaw points (both velocity components flip)
//! 4. the four straight cushions (one component flips)

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::table::{Bounds, Cushion, Table};
use crate::geometry::{angle_between, magnitude, squared_distance};
use crate::settings::BallConfig;

/// Centre distance below which two balls have no usable collision axis
pub const AXIS_EPSILON: f32 = 1e-4;

/// What a candidate move ran into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CollisionEvent {
    Clear,
    /// Ids of every ball touched this step, in list order
    BlockedByBall { others: Vec<u32> },
    EnteredPocket { pocket: usize },
    BlockedByCorner { point: usize },
    BlockedByCushion { side: Cushion },
}

/// Outcome of `can_advance_to`
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub allowed: bool,
    pub event: CollisionEvent,
}

impl Verdict {
    fn allow(event: CollisionEvent) -> Self {
        Self {
            allowed: true,
            event,
        }
    }

    fn reject(event: CollisionEvent) -> Self {
        Self {
            allowed: false,
            event,
        }
    }
}

/// Result of testing one pair of balls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairContact {
    /// Farther apart than one diameter
    Apart,
    /// Touching; axis components exchanged
    Exchanged,
    /// Touching with coincident centres; velocities left alone
    Coincident,
}

impl PairContact {
    #[inline]
    pub fn touched(self) -> bool {
        self != PairContact::Apart
    }
}

/// Decide whether `balls[index]` may move to `candidate`
///
/// Side effects: ball-ball contacts exchange velocity with every touched
/// ball, a pocket capture sets the mover's pocketed flag, and a cushion or
/// jaw contact reflects the mover's velocity.
pub fn can_advance_to(
    balls: &mut [Ball],
    index: usize,
    candidate: Vec2,
    table: &Table,
    config: &BallConfig,
) -> Verdict {
    let mut touched = Vec::new();
    for other in 0..balls.len() {
        if other == index || balls[other].hidden {
            continue;
        }
        let (mover, target) = pair_mut(balls, index, other);
        let contact = resolve_ball_pair(candidate, mover, target, config);
        if contact.touched() {
            log::debug!("Ball {} hit ball {} ({:?})", mover.id, target.id, contact);
            touched.push(target.id);
        }
    }
    if !touched.is_empty() {
        return Verdict::reject(CollisionEvent::BlockedByBall { others: touched });
    }

    let mover = &mut balls[index];

    if let Some(pocket) = pocket_capture(candidate, table) {
        mover.pocketed = true;
        return Verdict::allow(CollisionEvent::EnteredPocket { pocket });
    }

    if let Some(point) = corner_contact(candidate, config.radius, table) {
        mover.vel = -mover.vel;
        return Verdict::reject(CollisionEvent::BlockedByCorner { point });
    }

    if let Some(side) = cushion_contact(candidate, config.radius, &table.bounds) {
        mover.vel = reflect_velocity(mover.vel, side.normal());
        return Verdict::reject(CollisionEvent::BlockedByCushion { side });
    }

    Verdict::allow(CollisionEvent::Clear)
}

/// Mutable references to two distinct balls
fn pair_mut(balls: &mut [Ball], i: usize, j: usize) -> (&mut Ball, &mut Ball) {
    debug_assert_ne!(i, j);
    if i < j {
        let (lo, hi) = balls.split_at_mut(j);
        (&mut lo[i], &mut hi[0])
    } else {
        let (lo, hi) = balls.split_at_mut(i);
        (&mut hi[0], &mut lo[j])
    }
}

/// Split a velocity into (along-axis, perpendicular) parts
///
/// A ball at or below `v_min` counts as stationary and contributes nothing,
/// neither along the axis nor across it.
fn split_on_axis(vel: Vec2, axis: Vec2, axis_len: f32, v_min: f32) -> (Vec2, Vec2) {
    let speed = magnitude(vel);
    if speed <= v_min {
        return (Vec2::ZERO, Vec2::ZERO);
    }
    let along = speed * angle_between(vel, axis).cos();
    let axial = axis * (along / axis_len);
    (axial, vel - axial)
}

/// Equal-mass elastic contact between the mover (at `candidate`) and `other`
///
/// Each ball keeps its perpendicular component and takes the other's
/// component along the line of centres.
pub fn resolve_ball_pair(
    candidate: Vec2,
    mover: &mut Ball,
    other: &mut Ball,
    config: &BallConfig,
) -> PairContact {
    let axis = candidate - other.pos;
    let dist = magnitude(axis);
    if dist > config.diameter() {
        return PairContact::Apart;
    }
    if dist < AXIS_EPSILON {
        return PairContact::Coincident;
    }

    let (mover_axial, mover_perp) = split_on_axis(mover.vel, axis, dist, config.v_min);
    let (other_axial, other_perp) = split_on_axis(other.vel, axis, dist, config.v_min);

    mover.vel = mover_perp + other_axial;
    other.vel = other_perp + mover_axial;
    PairContact::Exchanged
}

/// First pocket whose capture radius contains `center`
pub fn pocket_capture(center: Vec2, table: &Table) -> Option<usize> {
    table.pockets.iter().position(|pocket| {
        let r = table.pocket_radius(pocket.kind);
        squared_distance(center, pocket.center) <= r * r
    })
}

/// First jaw point within one radius of `center`
pub fn corner_contact(center: Vec2, radius: f32, table: &Table) -> Option<usize> {
    table
        .collision_points
        .iter()
        .position(|&p| squared_distance(center, p) <= radius * radius)
}

/// Straight cushion touched by a ball centred at `center`; left/right win
/// over top/bottom
pub fn cushion_contact(center: Vec2, radius: f32, bounds: &Bounds) -> Option<Cushion> {
    if center.x - radius <= bounds.left {
        Some(Cushion::Left)
    } else if center.x + radius >= bounds.right {
        Some(Cushion::Right)
    } else if center.y - radius <= bounds.top {
        Some(Cushion::Top)
    } else if center.y + radius >= bounds.bottom {
        Some(Cushion::Bottom)
    } else {
        None
    }
}

/// Reflect velocity off a surface with unit normal `normal`
///
/// v' = v - 2(v·n)n; for the axis-aligned cushions this flips exactly one
/// component.
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::TableConfig;
    use proptest::prelude::*;

    fn setup() -> (Table, BallConfig) {
        let config = BallConfig::default();
        (Table::new(&TableConfig::default(), &config), config)
    }

    fn energy(balls: &[&Ball]) -> f32 {
        balls.iter().map(|b| b.vel.length_squared()).sum()
    }

    #[test]
    fn test_head_on_exchange() {
        let (table, config) = setup();
        let d = config.diameter();
        let mut balls = vec![
            Ball::new(0, Vec2::ZERO).with_velocity(Vec2::new(10.0, 0.0)),
            Ball::new(1, Vec2::new(d + 0.5, 0.0)),
        ];
        let candidate = balls[0].pos + balls[0].vel * config.tick_span();

        let verdict = can_advance_to(&mut balls, 0, candidate, &table, &config);
        assert!(!verdict.allowed);
        assert_eq!(verdict.event, CollisionEvent::BlockedByBall { others: vec![1] });
        assert!(balls[0].vel.length() < 1e-4);
        assert!((balls[1].vel - Vec2::new(10.0, 0.0)).length() < 1e-4);
        // Position not committed
        assert_eq!(balls[0].pos, Vec2::ZERO);
    }

    #[test]
    fn test_head_on_both_moving_swap() {
        let (_, config) = setup();
        let d = config.diameter();
        let mut a = Ball::new(0, Vec2::ZERO).with_velocity(Vec2::new(8.0, 0.0));
        let mut b = Ball::new(1, Vec2::new(d, 0.0)).with_velocity(Vec2::new(-3.0, 0.0));

        let contact = resolve_ball_pair(Vec2::new(1.0, 0.0), &mut a, &mut b, &config);
        assert_eq!(contact, PairContact::Exchanged);
        assert!((a.vel - Vec2::new(-3.0, 0.0)).length() < 1e-4);
        assert!((b.vel - Vec2::new(8.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_glancing_keeps_perpendicular() {
        let (_, config) = setup();
        // Mover travels along +x, target sits diagonally ahead: axis at 45°
        let offset = config.diameter() * 0.9 / 2f32.sqrt();
        let mut a = Ball::new(0, Vec2::ZERO).with_velocity(Vec2::new(10.0, 0.0));
        let mut b = Ball::new(1, Vec2::new(offset, offset));

        resolve_ball_pair(Vec2::ZERO, &mut a, &mut b, &config);
        // Half the motion each way, at right angles
        assert!((a.vel - Vec2::new(5.0, -5.0)).length() < 1e-3);
        assert!((b.vel - Vec2::new(5.0, 5.0)).length() < 1e-3);
        assert!(a.vel.dot(b.vel).abs() < 1e-2);
    }

    #[test]
    fn test_slow_ball_contributes_nothing() {
        let (_, config) = setup();
        let mut a = Ball::new(0, Vec2::ZERO).with_velocity(Vec2::new(1.0, 1.0));
        let mut b = Ball::new(1, Vec2::new(10.0, 0.0));

        resolve_ball_pair(Vec2::ZERO, &mut a, &mut b, &config);
        assert_eq!(a.vel, Vec2::ZERO);
        assert_eq!(b.vel, Vec2::ZERO);
    }

    #[test]
    fn test_apart_and_exact_contact() {
        let (_, config) = setup();
        let d = config.diameter();
        let mut a = Ball::new(0, Vec2::ZERO).with_velocity(Vec2::new(10.0, 0.0));
        let mut b = Ball::new(1, Vec2::new(d + 0.01, 0.0));
        assert_eq!(
            resolve_ball_pair(Vec2::ZERO, &mut a, &mut b, &config),
            PairContact::Apart
        );
        assert_eq!(a.vel, Vec2::new(10.0, 0.0));

        let mut b = Ball::new(1, Vec2::new(d, 0.0));
        assert!(resolve_ball_pair(Vec2::ZERO, &mut a, &mut b, &config).touched());
    }

    #[test]
    fn test_coincident_centres_reject_without_exchange() {
        let (table, config) = setup();
        let p = Vec2::new(300.0, 200.0);
        let mut balls = vec![
            Ball::new(0, p - Vec2::new(1.0, 0.0)).with_velocity(Vec2::new(10.0, 0.0)),
            Ball::new(1, p).with_velocity(Vec2::new(0.0, 4.0)),
        ];

        let verdict = can_advance_to(&mut balls, 0, p, &table, &config);
        assert!(!verdict.allowed);
        assert_eq!(balls[0].vel, Vec2::new(10.0, 0.0));
        assert_eq!(balls[1].vel, Vec2::new(0.0, 4.0));
        assert!(!balls[0].vel.is_nan());
    }

    #[test]
    fn test_all_touching_balls_are_resolved() {
        let (table, config) = setup();
        let d = config.diameter();
        let start = Vec2::new(300.0, 200.0);
        // Two resting balls ahead on either diagonal, both within reach
        let mut balls = vec![
            Ball::new(0, start).with_velocity(Vec2::new(20.0, 0.0)),
            Ball::new(1, start + Vec2::new(d * 0.6, -d * 0.6)),
            Ball::new(2, start + Vec2::new(d * 0.6, d * 0.6)),
            Ball::new(3, start + Vec2::new(-5.0 * d, 0.0)),
        ];
        let candidate = start + Vec2::new(2.0, 0.0);

        let verdict = can_advance_to(&mut balls, 0, candidate, &table, &config);
        assert_eq!(verdict.event, CollisionEvent::BlockedByBall { others: vec![1, 2] });
        assert!(!balls[1].is_stopped());
        assert!(!balls[2].is_stopped());
        assert!(balls[3].is_stopped());
    }

    /// Contacts resolve in list order, so the same layout listed in a
    /// different order ends differently
    fn resolve_diagonal_pair(order: [u32; 2]) -> (Ball, Ball, Ball) {
        let (table, config) = setup();
        let d = config.diameter();
        let start = Vec2::new(300.0, 200.0);
        let upper = Ball::new(1, start + Vec2::new(d * 0.6, -d * 0.6));
        let lower = Ball::new(2, start + Vec2::new(d * 0.6, d * 0.6));
        let mut balls = vec![Ball::new(0, start).with_velocity(Vec2::new(20.0, 0.0))];
        for id in order {
            balls.push(if id == 1 { upper.clone() } else { lower.clone() });
        }

        can_advance_to(&mut balls, 0, start + Vec2::new(2.0, 0.0), &table, &config);
        let find = |id: u32| balls.iter().find(|b| b.id == id).cloned().unwrap();
        (find(0), find(1), find(2))
    }

    #[test]
    fn test_list_order_resolution_is_pinned() {
        let (mover, upper, lower) = resolve_diagonal_pair([1, 2]);
        assert!((upper.vel - Vec2::new(8.5157, -9.8892)).length() < 1e-2);
        assert!((lower.vel - Vec2::new(9.7797, 11.3571)).length() < 1e-2);
        assert!((mover.vel - Vec2::new(1.7046, -1.4678)).length() < 1e-2);

        // Reversed order mirrors the outcome: the first ball resolved always
        // ends slower than the second
        let (mover, upper, lower) = resolve_diagonal_pair([2, 1]);
        assert!((lower.vel.length() - 13.0505).abs() < 1e-2);
        assert!((upper.vel.length() - 14.9875).abs() < 1e-2);
        assert!((mover.vel - Vec2::new(1.7046, 1.4678)).length() < 1e-2);
    }

    #[test]
    fn test_hidden_balls_are_ignored() {
        let (table, config) = setup();
        let start = Vec2::new(300.0, 200.0);
        let mut balls = vec![
            Ball::new(0, start).with_velocity(Vec2::new(20.0, 0.0)),
            Ball::new(1, start + Vec2::new(2.0, 0.0)),
        ];
        balls[1].hide();
        let verdict = can_advance_to(&mut balls, 0, start + Vec2::new(2.0, 0.0), &table, &config);
        assert_eq!(verdict, Verdict::allow(CollisionEvent::Clear));
    }

    #[test]
    fn test_cushion_bounce_left() {
        let (table, config) = setup();
        let y = (table.bounds.top + table.bounds.bottom) / 2.0;
        let start = Vec2::new(table.bounds.left + config.radius + 0.2, y);
        let mut balls = vec![Ball::new(0, start).with_velocity(Vec2::new(-5.0, 0.0))];
        let candidate = start + balls[0].vel * config.tick_span();

        let verdict = can_advance_to(&mut balls, 0, candidate, &table, &config);
        assert!(!verdict.allowed);
        assert_eq!(
            verdict.event,
            CollisionEvent::BlockedByCushion {
                side: Cushion::Left
            }
        );
        assert_eq!(balls[0].vel, Vec2::new(5.0, 0.0));
        assert_eq!(balls[0].pos, start);
    }

    #[test]
    fn test_cushion_flips_single_component() {
        let (table, config) = setup();
        let x = (table.bounds.left + table.bounds.right) / 2.0 + 60.0;
        let start = Vec2::new(x, table.bounds.bottom - config.radius - 0.5);
        let mut balls = vec![Ball::new(0, start).with_velocity(Vec2::new(7.0, 9.0))];
        let candidate = start + balls[0].vel * config.tick_span();

        let verdict = can_advance_to(&mut balls, 0, candidate, &table, &config);
        assert_eq!(
            verdict.event,
            CollisionEvent::BlockedByCushion {
                side: Cushion::Bottom
            }
        );
        assert_eq!(balls[0].vel, Vec2::new(7.0, -9.0));
    }

    #[test]
    fn test_corner_reverses_both_components() {
        let (table, config) = setup();
        // Jaw B on the top cushion, approached from below-left
        let jaw = table.collision_points[1];
        let candidate = jaw + Vec2::new(-6.0, 6.0);
        let mut balls = vec![Ball::new(0, candidate - Vec2::new(-1.0, 1.0)).with_velocity(Vec2::new(-10.0, -10.0))];

        let verdict = can_advance_to(&mut balls, 0, candidate, &table, &config);
        assert!(!verdict.allowed);
        assert_eq!(verdict.event, CollisionEvent::BlockedByCorner { point: 1 });
        assert_eq!(balls[0].vel, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_pocket_capture_at_centre() {
        let (table, config) = setup();
        for (i, pocket) in table.pockets.iter().enumerate() {
            for vel in [Vec2::new(-100.0, -100.0), Vec2::new(3.0, 0.0), Vec2::new(0.0, 140.0)] {
                let start = pocket.center - vel * config.tick_span();
                let mut balls = vec![Ball::new(4, start).with_velocity(vel)];
                let candidate = start + vel * config.tick_span();

                let verdict = can_advance_to(&mut balls, 0, candidate, &table, &config);
                assert!(verdict.allowed);
                assert_eq!(verdict.event, CollisionEvent::EnteredPocket { pocket: i });
                assert!(balls[0].is_pocketed());
                // Capture does not bounce
                assert_eq!(balls[0].vel, vel);
            }
        }
    }

    #[test]
    fn test_middle_pocket_uses_larger_radius() {
        let (table, _) = setup();
        let middle = table.pockets[1].center;
        let corner = table.pockets[0].center;

        // 28 units away: inside a middle pocket, outside a corner pocket
        assert_eq!(pocket_capture(middle + Vec2::new(0.0, 28.0), &table), Some(1));
        assert_eq!(pocket_capture(corner + Vec2::new(28.0, 0.0), &table), None);
    }

    #[test]
    fn test_pocket_wins_over_cushion() {
        let (table, config) = setup();
        // Just past the left cushion, inside the top-left pocket
        let corner = table.pockets[0].center;
        let candidate = corner + Vec2::new(5.0, 5.0);
        assert!(cushion_contact(candidate, config.radius, &table.bounds).is_some());

        let mut balls = vec![Ball::new(2, candidate + Vec2::new(2.0, 2.0)).with_velocity(Vec2::new(-20.0, -20.0))];
        let verdict = can_advance_to(&mut balls, 0, candidate, &table, &config);
        assert!(verdict.allowed);
        assert_eq!(verdict.event, CollisionEvent::EnteredPocket { pocket: 0 });
    }

    #[test]
    fn test_ball_contact_wins_over_pocket() {
        let (table, config) = setup();
        let pocket = table.pockets[2].center;
        let mut balls = vec![
            Ball::new(0, pocket - Vec2::new(3.0, -3.0)).with_velocity(Vec2::new(30.0, -30.0)),
            Ball::new(1, pocket + Vec2::new(5.0, 0.0)),
        ];
        let verdict = can_advance_to(&mut balls, 0, pocket, &table, &config);
        assert!(!verdict.allowed);
        assert!(!balls[0].is_pocketed());
    }

    #[test]
    fn test_reflect_velocity() {
        let reflected = reflect_velocity(Vec2::new(100.0, 20.0), Vec2::new(-1.0, 0.0));
        assert!((reflected.x - (-100.0)).abs() < 0.001);
        assert!((reflected.y - 20.0).abs() < 0.001);
    }

    proptest! {
        /// Sum of squared speeds never grows in a ball-ball contact
        #[test]
        fn prop_pair_energy_non_increasing(
            ax in -200.0f32..200.0, ay in -200.0f32..200.0,
            bx in -200.0f32..200.0, by in -200.0f32..200.0,
            dist in 0.5f32..23.5, angle in 0.0f32..360.0
        ) {
            let config = BallConfig::default();
            let offset = crate::polar_to_cartesian(dist, angle);
            let mut a = Ball::new(0, Vec2::ZERO).with_velocity(Vec2::new(ax, ay));
            let mut b = Ball::new(1, offset).with_velocity(Vec2::new(bx, by));

            let before = energy(&[&a, &b]);
            let contact = resolve_ball_pair(Vec2::ZERO, &mut a, &mut b, &config);
            let after = energy(&[&a, &b]);

            prop_assert!(contact.touched());
            prop_assert!(after <= before * (1.0 + 1e-3) + 1e-2);
            prop_assert!(!a.vel.is_nan() && !b.vel.is_nan());
        }

        /// A straight-cushion bounce flips exactly one component
        #[test]
        fn prop_cushion_reflection_flips_one_component(
            vx in 2.0f32..150.0, vy in -150.0f32..150.0
        ) {
            let config = BallConfig::default();
            let table = Table::new(&TableConfig::default(), &config);
            let y = (table.bounds.top + table.bounds.bottom) / 2.0;
            let start = Vec2::new(table.bounds.right - config.radius - 0.1, y);
            let mut balls = vec![Ball::new(0, start).with_velocity(Vec2::new(vx, vy))];
            let candidate = start + balls[0].vel * config.tick_span();

            let verdict = can_advance_to(&mut balls, 0, candidate, &table, &config);
            prop_assert!(!verdict.allowed);
            prop_assert_eq!(balls[0].vel, Vec2::new(-vx, vy));
        }
    }
}

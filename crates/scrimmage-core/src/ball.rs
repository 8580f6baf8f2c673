//! The ball: possession state, deferred throws and flight physics.
//!
//! The ball is always in exactly one [`BallState`]:
//!
//! - `Loose` on the ground, picked up by the first standing player in reach
//! - `Carried` by a player, mirroring that player's position every tick
//! - `Flying` under simple projectile physics until caught or grounded
//!
//! Because "flying" and "has a carrier" are separate variants of one enum, the
//! ball can never be both at once.
//!
//! Throws are requested during policy evaluation but only resolved in
//! [`Ball::advance`] at the end of the tick, so a tackle earlier in the same
//! tick (which scatters the ball loose) cancels the throw.
//!
//! # Example
//!
//! ```
//! use glam::{Vec2, Vec3};
//! use scrimmage_core::ball::Ball;
//! use scrimmage_core::config::Tuning;
//!
//! let mut ball = Ball::new(Vec2::new(50.0, 25.0));
//! assert!(ball.is_loose());
//!
//! ball.launch(0.3, 20.0, Vec2::new(80.0, 25.0), &Tuning::default());
//! assert!(ball.is_flying());
//! assert_eq!(ball.carrier(), None);
//! assert_eq!(ball.position.z, Tuning::default().launch_height);
//! ```

use std::f32::consts::FRAC_PI_4;

use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::Tuning;
use crate::entity::{PlayerId, Roster};
use crate::error::{Result, SimError};
use crate::geometry::{bearing, components, Bounds};

/// How close a flight step must pass to the predicted landing point to come
/// down on it.
const LANDING_TOLERANCE: f32 = 1.0e-3;

// =============================================================================
// State
// =============================================================================

/// Launch parameters of a ball in the air.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    /// Horizontal heading, in radians.
    pub heading: f32,
    /// Horizontal speed.
    pub speed: f32,
    /// Vertical speed (positive is up).
    pub vertical_speed: f32,
    /// Player who threw the ball, if any.
    pub thrower: Option<PlayerId>,
}

/// Possession state of the ball.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum BallState {
    /// On the ground with no one holding it.
    #[default]
    Loose,
    /// Held by a player.
    Carried(PlayerId),
    /// In the air.
    Flying(Flight),
}

/// A throw waiting to be resolved at the end of the tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThrowRequest {
    /// Player who wants to throw. The throw is dropped if they no longer hold the ball.
    pub thrower: PlayerId,
    /// Point on the ground the throw is aimed at.
    pub target: Vec2,
    /// Launch speed.
    pub power: f32,
}

/// Something that happened to the ball during [`Ball::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallEvent {
    /// A loose ball was picked up.
    PickedUp(PlayerId),
    /// A ball in flight was caught.
    Caught {
        /// New carrier.
        catcher: PlayerId,
        /// Who threw it, if anyone.
        thrower: Option<PlayerId>,
    },
    /// A pending throw left the thrower's hand.
    Launched(PlayerId),
    /// A pending throw was discarded because the thrower lost the ball first.
    ThrowAborted(PlayerId),
    /// A ball in flight came down loose.
    Landed,
}

// =============================================================================
// Ball
// =============================================================================

/// The single ball on the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    /// Position; `z` is height above the ground.
    pub position: Vec3,
    state: BallState,
    pending: Option<ThrowRequest>,
    landing: Option<Vec2>,
    last_holder: Option<PlayerId>,
}

impl Ball {
    /// A loose ball on the ground at `at`.
    #[must_use]
    pub fn new(at: Vec2) -> Self {
        Self {
            position: at.extend(0.0),
            state: BallState::Loose,
            pending: None,
            landing: None,
            last_holder: None,
        }
    }

    /// Current possession state.
    #[must_use]
    pub const fn state(&self) -> BallState {
        self.state
    }

    /// Ground-plane position.
    #[must_use]
    pub fn xy(&self) -> Vec2 {
        self.position.truncate()
    }

    /// The player holding the ball, if any.
    #[must_use]
    pub const fn carrier(&self) -> Option<PlayerId> {
        match self.state {
            BallState::Carried(id) => Some(id),
            _ => None,
        }
    }

    /// The player the ball "belongs to" for the purpose of team relations:
    /// the carrier, or the thrower while it is in the air.
    #[must_use]
    pub const fn holder(&self) -> Option<PlayerId> {
        match self.state {
            BallState::Carried(id) => Some(id),
            BallState::Flying(flight) => flight.thrower,
            BallState::Loose => None,
        }
    }

    /// Last player to have held the ball.
    #[must_use]
    pub const fn last_holder(&self) -> Option<PlayerId> {
        self.last_holder
    }

    /// True while the ball is in the air.
    #[must_use]
    pub const fn is_flying(&self) -> bool {
        matches!(self.state, BallState::Flying(_))
    }

    /// True while the ball is on the ground with no carrier.
    #[must_use]
    pub const fn is_loose(&self) -> bool {
        matches!(self.state, BallState::Loose)
    }

    /// Predicted landing point of the current or most recent flight.
    #[must_use]
    pub const fn landing_point(&self) -> Option<Vec2> {
        self.landing
    }

    /// The throw waiting to be resolved, if any.
    #[must_use]
    pub const fn pending_throw(&self) -> Option<ThrowRequest> {
        self.pending
    }

    /// Queues a throw for the end of the tick, replacing any earlier request.
    pub fn request_throw(&mut self, request: ThrowRequest) {
        self.pending = Some(request);
    }

    /// Puts the ball loose on the ground at `at`, dropping any pending throw.
    pub fn drop_at(&mut self, at: Vec2) {
        self.position = at.extend(0.0);
        self.state = BallState::Loose;
        self.pending = None;
    }

    /// Hands the ball to `carrier` at `at`.
    pub fn give_to(&mut self, carrier: PlayerId, at: Vec2) {
        self.position = at.extend(0.0);
        self.state = BallState::Carried(carrier);
        self.last_holder = Some(carrier);
    }

    /// Advances the ball by one tick.
    ///
    /// Exactly one of these happens, checked in order:
    ///
    /// 1. A pending throw is resolved: launched from the thrower's current
    ///    position if they still carry the ball, otherwise discarded.
    /// 2. A ball in flight takes one flight step. It is caught by the nearest
    ///    eligible player on the step, or comes down on the predicted landing
    ///    point once the step reaches it, at the field edge, or wherever it
    ///    meets the ground.
    /// 3. A loose ball is picked up by the first standing player, in roster
    ///    order, whose size exceeds their distance to it.
    /// 4. A carried ball follows its carrier.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownPlayer`] if the carrier or thrower is not
    /// on the roster.
    pub fn advance(
        &mut self,
        roster: &Roster,
        bounds: &Bounds,
        tuning: &Tuning,
        dt: f32,
    ) -> Result<Option<BallEvent>> {
        if let Some(request) = self.pending.take() {
            if self.carrier() != Some(request.thrower) {
                return Ok(Some(BallEvent::ThrowAborted(request.thrower)));
            }
            let thrower = roster
                .get(&request.thrower)
                .ok_or(SimError::UnknownPlayer(request.thrower))?;
            // release from where the thrower stands after this tick's move
            self.position = thrower.position.extend(0.0);
            let distance = self.xy().distance(request.target);
            let elevation = solve_elevation(distance, request.power, tuning.gravity);
            self.launch(elevation, request.power, request.target, tuning);
            return Ok(Some(BallEvent::Launched(request.thrower)));
        }

        match self.state {
            BallState::Flying(flight) => Ok(self.fly_step(flight, roster, bounds, tuning, dt)),
            BallState::Loose => {
                let xy = self.xy();
                let Some(picker) = roster
                    .values()
                    .find(|p| p.is_standing() && p.position.distance(xy) < p.size())
                else {
                    return Ok(None);
                };
                self.give_to(picker.id(), picker.position);
                Ok(Some(BallEvent::PickedUp(picker.id())))
            }
            BallState::Carried(id) => {
                let carrier = roster.get(&id).ok_or(SimError::UnknownPlayer(id))?;
                self.position = carrier.position.extend(0.0);
                Ok(None)
            }
        }
    }

    /// Sends the ball into the air from its current position.
    ///
    /// Any carrier becomes the thrower. The flat-ground landing point is
    /// recorded up front and is what [`Ball::landing_point`] reports; an
    /// uncaught flight comes down there.
    pub fn launch(&mut self, elevation: f32, power: f32, target: Vec2, tuning: &Tuning) {
        let origin = self.xy();
        let heading = bearing(origin, target);
        let thrower = self.carrier();
        self.state = BallState::Flying(Flight {
            heading,
            speed: power * elevation.cos(),
            vertical_speed: power * elevation.sin(),
            thrower,
        });
        self.position.z = tuning.launch_height;
        let range = power * power * (2.0 * elevation).sin() / tuning.gravity;
        self.landing = Some(origin + components(range, heading));
        if thrower.is_some() {
            self.last_holder = thrower;
        }
    }

    fn fly_step(
        &mut self,
        mut flight: Flight,
        roster: &Roster,
        bounds: &Bounds,
        tuning: &Tuning,
        dt: f32,
    ) -> Option<BallEvent> {
        let start = self.xy();
        let end = start + components(flight.speed * dt, flight.heading);
        flight.vertical_speed -= tuning.gravity * dt;
        self.position = end.extend(self.position.z + flight.vertical_speed * dt);
        self.state = BallState::Flying(flight);

        if self.position.z <= tuning.catch_height {
            let segment = end - start;
            let length_sq = segment.length_squared();
            let catcher = roster
                .values()
                .filter(|p| p.is_standing() && p.wants_to_catch() && Some(p.id()) != flight.thrower)
                .filter(|p| {
                    let t = if length_sq > 0.0 {
                        (p.position - start).dot(segment) / length_sq
                    } else {
                        0.0
                    };
                    (0.0..=1.0).contains(&t) && (start + segment * t).distance(p.position) <= p.size()
                })
                .min_by(|a, b| {
                    a.position
                        .distance_squared(start)
                        .total_cmp(&b.position.distance_squared(start))
                });
            if let Some(catcher) = catcher {
                self.give_to(catcher.id(), catcher.position);
                return Some(BallEvent::Caught {
                    catcher: catcher.id(),
                    thrower: flight.thrower,
                });
            }
        }

        if let Some(landing) = self.landing.filter(|&p| on_segment(p, start, end)) {
            self.drop_at(bounds.clamp(landing));
            return Some(BallEvent::Landed);
        }
        if !bounds.contains(end) {
            self.drop_at(bounds.clamp(end));
            return Some(BallEvent::Landed);
        }
        if self.position.z <= 0.0 {
            self.drop_at(end);
            return Some(BallEvent::Landed);
        }
        None
    }

    /// Knocks the ball loose by a uniform random offset in
    /// `[-amount/2, amount/2)` on each axis, kept on the field.
    pub fn scatter<R: Rng>(&mut self, amount: f32, rng: &mut R, bounds: &Bounds) {
        let half = amount * 0.5;
        let offset = if half > 0.0 {
            Vec2::new(rng.gen_range(-half..half), rng.gen_range(-half..half))
        } else {
            Vec2::ZERO
        };
        self.drop_at(bounds.clamp(self.xy() + offset));
    }
}

/// True if `point` lies on the segment from `start` to `end`, within
/// [`LANDING_TOLERANCE`].
fn on_segment(point: Vec2, start: Vec2, end: Vec2) -> bool {
    let segment = end - start;
    let length_sq = segment.length_squared();
    if length_sq <= 0.0 {
        return point.distance(start) <= LANDING_TOLERANCE;
    }
    let t = ((point - start).dot(segment) / length_sq).clamp(0.0, 1.0);
    (start + segment * t).distance(point) <= LANDING_TOLERANCE
}

/// Low-arc elevation that reaches `distance` at launch speed `power`, or 45
/// degrees when the target is out of reach.
#[must_use]
pub fn solve_elevation(distance: f32, power: f32, gravity: f32) -> f32 {
    if power <= 0.0 {
        return FRAC_PI_4;
    }
    let ratio = distance * gravity / (power * power);
    if (0.0..=1.0).contains(&ratio) {
        0.5 * ratio.asin()
    } else {
        FRAC_PI_4
    }
}

//! Player state and kinematics.
//!
//! A player steers toward its current objective point one tick at a time.
//! Each tick it picks an acceleration direction, adds a fixed-magnitude
//! impulse to its velocity, caps the speed, and moves. Heading is always
//! derived from the resulting velocity.
//!
//! Choosing the acceleration direction is not simply "point at the target":
//! a moving player has to cancel its current drift. [`Player::choose_acceleration_angle`]
//! therefore minimizes the projected post-step distance to the objective
//! over candidate angles, seeded from the straight-line bearing.

use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::{IntentFlags, PlayerId, Posture, Team};
use crate::config::Tuning;
use crate::error::{Result, SimError};
use crate::geometry::{bearing, components, heading_of, Bounds};
use crate::optimize::golden_section;
use crate::policy::ObjectivePolicy;
use crate::roles::Role;

/// Below this distance a player counts as already at its objective.
pub const AT_OBJECTIVE_EPSILON: f32 = 1.0e-4;

// =============================================================================
// Stats & Spec
// =============================================================================

/// Physical and kinematic attributes of a player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Collision, pickup and catch radius.
    pub size: f32,
    /// Speed cap.
    pub top_speed: f32,
    /// Magnitude of the per-second velocity change.
    pub acceleration: f32,
    /// Used in tackle and block rolls.
    pub strength: f32,
    /// Launch speed of this player's throws.
    pub throw_power: f32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            size: 1.0,
            top_speed: 8.0,
            acceleration: 4.0,
            strength: 1.0,
            throw_power: 25.0,
        }
    }
}

impl PlayerStats {
    /// Rejects non-physical stats.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidPlayer`] naming the first offending stat.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("size", self.size),
            ("top_speed", self.top_speed),
            ("acceleration", self.acceleration),
            ("strength", self.strength),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SimError::InvalidPlayer {
                    field,
                    reason: format!("must be a positive finite number, got {value}"),
                });
            }
        }
        if !(self.throw_power.is_finite() && self.throw_power >= 0.0) {
            return Err(SimError::InvalidPlayer {
                field: "throw_power",
                reason: format!("must be a non-negative finite number, got {}", self.throw_power),
            });
        }
        Ok(())
    }
}

/// Everything needed to register a player on a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSpec {
    /// Team the player belongs to.
    pub team: Team,
    /// Shirt number, carried through to the metadata header.
    pub jersey: u32,
    /// Starting position.
    pub position: Vec2,
    /// Starting heading, in radians.
    pub heading: f32,
    /// Physical attributes.
    pub stats: PlayerStats,
    /// Trigger-to-reaction table for this player's position.
    pub role: Role,
}

impl PlayerSpec {
    /// Creates a spec with a zero starting heading.
    #[must_use]
    pub fn new(team: Team, jersey: u32, position: Vec2, stats: PlayerStats, role: Role) -> Self {
        Self {
            team,
            jersey,
            position,
            heading: 0.0,
            stats,
            role,
        }
    }

    /// Sets the starting heading.
    #[must_use]
    pub fn with_heading(mut self, heading: f32) -> Self {
        self.heading = heading;
        self
    }
}

// =============================================================================
// Player
// =============================================================================

/// Result of a projected kinematic step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    /// Position after the step (not yet clamped to the field).
    pub position: Vec2,
    /// Heading of the new velocity.
    pub heading: f32,
    /// Magnitude of the new velocity.
    pub speed: f32,
}

/// A registered player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    team: Team,
    jersey: u32,
    role: String,
    /// Current position.
    pub position: Vec2,
    /// Current speed.
    pub speed: f32,
    /// Current heading, in radians.
    pub heading: f32,
    stats: PlayerStats,
    /// Point the player is currently steering toward.
    pub objective: Vec2,
    policy: ObjectivePolicy,
    posture: Posture,
    intent: IntentFlags,
}

impl Player {
    /// Builds a player from a validated spec.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidPlayer`] if the stats are non-physical.
    pub fn from_spec(id: PlayerId, spec: &PlayerSpec) -> Result<Self> {
        spec.stats.validate()?;
        Ok(Self {
            id,
            team: spec.team,
            jersey: spec.jersey,
            role: spec.role.label().to_string(),
            position: spec.position,
            speed: 0.0,
            heading: spec.heading,
            stats: spec.stats,
            objective: spec.position,
            policy: ObjectivePolicy::HoldPosition,
            posture: Posture::Standing,
            intent: IntentFlags::default(),
        })
    }

    /// The player's id.
    #[must_use]
    pub const fn id(&self) -> PlayerId {
        self.id
    }

    /// The player's team.
    #[must_use]
    pub const fn team(&self) -> Team {
        self.team
    }

    /// Shirt number.
    #[must_use]
    pub const fn jersey(&self) -> u32 {
        self.jersey
    }

    /// Label of the role this player was registered with.
    #[must_use]
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Physical attributes.
    #[must_use]
    pub const fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    /// Collision radius.
    #[must_use]
    pub const fn size(&self) -> f32 {
        self.stats.size
    }

    /// Currently selected behavior.
    #[must_use]
    pub const fn policy(&self) -> ObjectivePolicy {
        self.policy
    }

    /// Selects a behavior. Setting the same policy again is a no-op.
    pub fn set_policy(&mut self, policy: ObjectivePolicy) {
        self.policy = policy;
    }

    /// Current posture.
    #[must_use]
    pub const fn posture(&self) -> Posture {
        self.posture
    }

    /// True when standing.
    #[must_use]
    pub const fn is_standing(&self) -> bool {
        self.posture.is_standing()
    }

    /// Current intent flags.
    #[must_use]
    pub const fn intent(&self) -> IntentFlags {
        self.intent
    }

    /// Sets or clears intent flags.
    pub fn set_intent(&mut self, flags: IntentFlags, value: bool) {
        self.intent.set(flags, value);
    }

    /// True if the player contests contact rather than evading.
    #[must_use]
    pub const fn wants_to_block(&self) -> bool {
        self.intent.contains(IntentFlags::BLOCK)
    }

    /// True if the player may catch a ball in flight.
    #[must_use]
    pub const fn wants_to_catch(&self) -> bool {
        self.intent.contains(IntentFlags::CATCH)
    }

    /// Knocks the player down for `ticks` ticks and stops them dead.
    pub fn knock_down(&mut self, ticks: u32) {
        self.posture = Posture::Prone {
            ticks_remaining: ticks,
        };
        self.speed = 0.0;
    }

    /// Advances the prone countdown by one tick.
    ///
    /// A prone player whose countdown is already zero stands up; otherwise
    /// the countdown is decremented. Returns true if the player stood up.
    pub fn tick_posture(&mut self) -> bool {
        match self.posture {
            Posture::Standing => false,
            Posture::Prone { ticks_remaining: 0 } => {
                self.posture = Posture::Standing;
                true
            }
            Posture::Prone { ticks_remaining } => {
                self.posture = Posture::Prone {
                    ticks_remaining: ticks_remaining - 1,
                };
                false
            }
        }
    }

    /// Distance to the goal line this player attacks.
    #[must_use]
    pub fn distance_to_goal(&self, width: f32) -> f32 {
        self.team.distance_to_goal(self.position.x, width)
    }

    /// Distance to the goal line this player defends.
    #[must_use]
    pub fn distance_to_own_goal(&self, width: f32) -> f32 {
        self.team.distance_to_own_goal(self.position.x, width)
    }

    /// Straight-line distance to another player.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f32 {
        self.position.distance(other.position)
    }

    /// Projects one kinematic step with acceleration applied at `accel_angle`.
    ///
    /// Pure: the player is not modified.
    #[must_use]
    pub fn project_move(&self, accel_angle: f32, dt: f32) -> Kinematics {
        let velocity = components(self.speed, self.heading)
            + components(self.stats.acceleration * dt, accel_angle);
        let top_speed = self.stats.top_speed;
        let speed = velocity.length();
        let velocity = if speed > top_speed {
            velocity * (top_speed / speed)
        } else {
            velocity
        };
        Kinematics {
            position: self.position + velocity * dt,
            heading: heading_of(velocity, self.heading),
            speed: speed.min(top_speed),
        }
    }

    /// Picks the acceleration angle that brings the player closest to its
    /// objective after one step, or `None` if it is already there.
    ///
    /// A coarse scan around the circle, starting at the bearing to the
    /// objective, brackets the best direction; golden-section search refines
    /// it. If refinement fails the bearing itself is used.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn choose_acceleration_angle(&self, dt: f32, tuning: &Tuning) -> Option<f32> {
        let target = self.objective;
        if self.position.distance(target) <= AT_OBJECTIVE_EPSILON {
            return None;
        }
        let seed = bearing(self.position, target);
        let cost = |angle: f32| self.project_move(angle, dt).position.distance(target);

        let samples = tuning.steering_samples.max(3);
        let step = TAU / samples as f32;
        let Some((best_index, best_cost)) = (0..samples)
            .map(|i| (i, cost(seed + step * i as f32)))
            .filter(|(_, c)| c.is_finite())
            .min_by(|l, r| l.1.total_cmp(&r.1))
        else {
            return Some(seed);
        };
        let centre = seed + step * best_index as f32;

        match golden_section(cost, centre - step, centre + step, tuning.steering_tolerance) {
            Some((angle, refined)) if refined <= best_cost => Some(angle),
            Some(_) => Some(centre),
            None => Some(seed),
        }
    }

    /// Takes one kinematic step toward the objective.
    ///
    /// Does nothing while prone or when already at the objective. The new
    /// position is clamped onto the field. Returns true if the player moved.
    pub fn take_step(&mut self, dt: f32, bounds: &Bounds, tuning: &Tuning) -> bool {
        if !self.is_standing() {
            return false;
        }
        let Some(angle) = self.choose_acceleration_angle(dt, tuning) else {
            return false;
        };
        let next = self.project_move(angle, dt);
        self.position = bounds.clamp(next.position);
        self.heading = next.heading;
        self.speed = next.speed;
        true
    }

    /// Shoves the player `amount` along `angle`, staying on the field.
    ///
    /// Prone players cannot be displaced.
    pub fn displace(&mut self, angle: f32, amount: f32, bounds: &Bounds) {
        if self.is_standing() {
            self.position = bounds.clamp(self.position + components(amount, angle));
        }
    }
}

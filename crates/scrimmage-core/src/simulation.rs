//! The tick loop.
//!
//! [`Field::tick`] advances the field by one fixed step of `dt` seconds in
//! eleven strictly ordered phases:
//!
//! 1. **POSTURE**: prone players whose countdown is zero stand, others count down
//! 2. **GEOMETRY**: bisector lines and hazard scoring are rebuilt
//! 3. **POLICY**: every player's policy picks an objective, clamped into the field
//! 4. **DE-CONFLICT**: objectives shrink to one step and teammates are kept apart
//! 5. **MOVE**: every player takes one kinematic step
//! 6. **DETECT**: overlapping standing pairs are collected
//! 7. **RESOLVE**: tackles and blocks are rolled
//! 8. **BALL**: pending throws, flight, pickup or carry
//! 9. **TRIGGERS**: ball-state triggers broadcast policy changes
//! 10. **SNAPSHOT**: one record per player plus the ball is appended to the log
//! 11. **SCORE**: a carried ball in either end zone ends the run
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use scrimmage_core::config::FieldConfig;
//! use scrimmage_core::entity::{PlayerSpec, PlayerStats, Team};
//! use scrimmage_core::field::Field;
//! use scrimmage_core::roles::Role;
//!
//! let mut field = Field::new(FieldConfig::new(100.0, 50.0, 2.0, 0.1), 7).unwrap();
//! field
//!     .register(PlayerSpec::new(Team::Home, 1, Vec2::new(30.0, 25.0), PlayerStats::default(), Role::runner()))
//!     .unwrap();
//!
//! let summary = field.run().unwrap();
//! assert_eq!(summary.ticks, 20);
//! assert_eq!(field.move_log().len(), 20);
//! ```

use std::iter;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::ball::BallEvent;
use crate::entity::{IntentFlags, PlayerId, Roster, Team};
use crate::error::Result;
use crate::field::Field;
use crate::hazard::TickGeometry;
use crate::output::{MoveRecord, TickSnapshot};
use crate::policy::{Decision, PolicyContext};
use crate::resolver::{detect_collisions, ContactScene, DuelResolver, Resolver};

/// Objectives closer than this to the player are left alone by de-confliction.
const OBJECTIVE_EPSILON: f32 = 1.0e-6;

/// Added to the combined radii when pushing teammates' objectives apart, so
/// rounding never leaves them a hair short.
const SEPARATION_SLACK: f32 = 1.0e-4;

// =============================================================================
// Status
// =============================================================================

/// Outcome of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickStatus {
    /// Play continues.
    Running,
    /// The carrier reached the end zone they attack.
    Touchdown {
        /// Who carried the ball in.
        carrier: PlayerId,
        /// The scoring team.
        team: Team,
    },
    /// The carrier was caught in the end zone they defend.
    OwnEndZone {
        /// Who was holding the ball.
        carrier: PlayerId,
        /// The carrier's team.
        team: Team,
    },
}

impl TickStatus {
    /// True if the run is over.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// What [`Field::run`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Ticks executed by this call.
    pub ticks: u64,
    /// Status of the last tick. `Running` means the tick budget ran out.
    pub status: TickStatus,
}

// =============================================================================
// Tick Loop
// =============================================================================

impl Field {
    /// Runs until the tick budget is spent or someone scores.
    ///
    /// Triggers are initialized first, so policies reflect the starting ball
    /// state before the first tick.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Field::tick`].
    pub fn run(&mut self) -> Result<RunSummary> {
        let budget = self.config.tick_budget();
        tracing::info!(
            seed = self.seed(),
            players = self.roster.len(),
            budget,
            "run started"
        );
        self.init_triggers()?;

        let mut ticks = 0;
        let mut status = TickStatus::Running;
        while self.tick < budget {
            status = self.tick()?;
            ticks += 1;
            if status.is_terminal() {
                break;
            }
        }
        tracing::info!(ticks, ?status, "run finished");
        Ok(RunSummary { ticks, status })
    }

    /// Advances the field by one tick.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownPlayer`](crate::error::SimError::UnknownPlayer)
    /// if a policy, trigger or the ball references a player that is not registered.
    pub fn tick(&mut self) -> Result<TickStatus> {
        if !self.triggers_ready {
            self.init_triggers()?;
        }
        let dt = self.config.dt;

        // 1. POSTURE
        for player in self.roster.values_mut() {
            if player.tick_posture() {
                tracing::debug!(id = %player.id(), "stood up");
            }
        }

        // 2. GEOMETRY
        let geometry = TickGeometry::compute(&self.roster, &self.ball, self.bounds.width, self.tuning.hazard);

        // 3. POLICY
        let decisions = self.decide(&geometry)?;
        for (id, decision) in decisions {
            if let Some(throw) = decision.throw {
                self.ball.request_throw(throw);
            }
            if let Some(player) = self.roster.get_mut(&id) {
                player.objective = self.bounds.clamp_inset(decision.objective, self.tuning.objective_margin);
                if let Some(block) = decision.wants_to_block {
                    player.set_intent(IntentFlags::BLOCK, block);
                }
                if let Some(catch) = decision.wants_to_catch {
                    player.set_intent(IntentFlags::CATCH, catch);
                }
            }
        }

        // 4. DE-CONFLICT
        deconflict(&mut self.roster, dt);

        // 5. MOVE
        for player in self.roster.values_mut() {
            player.take_step(dt, &self.bounds, &self.tuning);
        }

        // 6-7. DETECT & RESOLVE
        let collisions = detect_collisions(&self.roster);
        let resolver = DuelResolver::new();
        let mut scene = ContactScene {
            roster: &mut self.roster,
            ball: &mut self.ball,
            bounds: &self.bounds,
            tuning: &self.tuning,
            rng: &mut self.rng,
        };
        for collision in &collisions {
            resolver.resolve(collision, &mut scene);
        }

        // 8. BALL
        if let Some(event) = self.ball.advance(&self.roster, &self.bounds, &self.tuning, dt)? {
            log_ball_event(self.tick, event);
        }

        // 9. TRIGGERS
        for trigger in &self.triggers {
            trigger.check(&self.ball, &mut self.roster)?;
        }

        // 10. SNAPSHOT
        let carrier = self.ball.carrier();
        let records = self
            .roster
            .values()
            .map(|p| MoveRecord::player(p, carrier == Some(p.id())))
            .chain(iter::once(MoveRecord::ball(&self.ball)))
            .collect();
        self.log.push(TickSnapshot {
            tick: self.tick,
            records,
        });

        // 11. SCORE
        let status = self.scoring_status();
        tracing::trace!(tick = self.tick, ?status, collisions = collisions.len(), "tick");
        self.tick += 1;
        if status.is_terminal() {
            tracing::info!(tick = self.tick, ?status, "possession ended");
        }
        Ok(status)
    }

    fn decide(&self, geometry: &TickGeometry) -> Result<Vec<(PlayerId, Decision)>> {
        let ctx = PolicyContext {
            roster: &self.roster,
            ball: &self.ball,
            geometry,
            bounds: &self.bounds,
            tuning: &self.tuning,
        };
        self.roster
            .values()
            .map(|p| Ok((p.id(), p.policy().evaluate(p, &ctx)?)))
            .collect()
    }

    fn scoring_status(&self) -> TickStatus {
        let Some(carrier) = self.ball.carrier().and_then(|id| self.roster.get(&id)) else {
            return TickStatus::Running;
        };
        let depth = self.tuning.end_zone_depth;
        let x = self.ball.position.x;
        let zone = if x >= self.bounds.width - depth {
            Team::Home
        } else if x <= depth {
            Team::Away
        } else {
            return TickStatus::Running;
        };
        let (carrier_id, team) = (carrier.id(), carrier.team());
        if zone == team {
            TickStatus::Touchdown {
                carrier: carrier_id,
                team,
            }
        } else {
            TickStatus::OwnEndZone {
                carrier: carrier_id,
                team,
            }
        }
    }
}

/// Shrinks objectives to one step and pushes overlapping teammates apart.
///
/// Each standing player's objective is pulled in to at most `top_speed * dt`
/// from where they stand. Then, for every same-team standing pair whose
/// objectives are closer than their combined radii, both objectives are
/// pushed apart along the perpendicular of the line joining the players,
/// half each, by the smallest amount that restores the separation.
pub(crate) fn deconflict(roster: &mut Roster, dt: f32) {
    for player in roster.values_mut().filter(|p| p.is_standing()) {
        let to_objective = player.objective - player.position;
        let distance = to_objective.length();
        if distance > OBJECTIVE_EPSILON {
            let reach = distance.min(player.stats().top_speed * dt);
            player.objective = player.position + to_objective * (reach / distance);
        }
    }

    let ids: Vec<PlayerId> = roster.values().filter(|p| p.is_standing()).map(|p| p.id()).collect();
    for (i, &first) in ids.iter().enumerate() {
        for &second in &ids[i + 1..] {
            let (Some(a), Some(b)) = (roster.get(&first), roster.get(&second)) else {
                continue;
            };
            if a.team() != b.team() {
                continue;
            }
            let gap = b.objective - a.objective;
            let needed = a.size() + b.size() + SEPARATION_SLACK;
            if gap.length() >= needed {
                continue;
            }
            let normal = (b.position - a.position).try_normalize().map_or(Vec2::Y, |d| d.perp());
            let push = separating_push(gap, normal, needed) * 0.5;
            if let Some(a) = roster.get_mut(&first) {
                a.objective -= normal * push;
            }
            if let Some(b) = roster.get_mut(&second) {
                b.objective += normal * push;
            }
        }
    }
}

/// Smallest `k >= 0` with `|gap + k * normal| >= needed`, for unit `normal`.
fn separating_push(gap: Vec2, normal: Vec2, needed: f32) -> f32 {
    let along = gap.dot(normal);
    let discriminant = along * along - gap.length_squared() + needed * needed;
    (discriminant.max(0.0).sqrt() - along).max(0.0)
}

fn log_ball_event(tick: u64, event: BallEvent) {
    match event {
        BallEvent::PickedUp(id) => tracing::debug!(tick, %id, "ball picked up"),
        BallEvent::Caught { catcher, thrower } => {
            tracing::debug!(tick, %catcher, thrower = ?thrower, "ball caught");
        }
        BallEvent::Launched(id) => tracing::debug!(tick, %id, "ball thrown"),
        BallEvent::ThrowAborted(id) => tracing::debug!(tick, %id, "throw aborted, ball lost"),
        BallEvent::Landed => tracing::debug!(tick, "ball landed"),
    }
}

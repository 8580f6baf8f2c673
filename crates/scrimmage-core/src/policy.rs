//! Objective-setting behaviors.
//!
//! Every player carries one [`ObjectivePolicy`]. Once per tick the field
//! evaluates it against a read-only [`PolicyContext`] and applies the
//! resulting [`Decision`]: a new objective point, optional changes to the
//! player's blocking and catching intent, and optionally a throw request.
//!
//! Chasing a flight or finding space turns catching on; going after the
//! carrier or an opponent turns it off.
//!
//! Policies never mutate anything themselves, which keeps them pure functions
//! of the tick snapshot and lets tests evaluate them in isolation.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use scrimmage_core::ball::Ball;
//! use scrimmage_core::config::Tuning;
//! use scrimmage_core::entity::{Player, PlayerId, PlayerSpec, PlayerStats, Roster, Team};
//! use scrimmage_core::geometry::Bounds;
//! use scrimmage_core::hazard::TickGeometry;
//! use scrimmage_core::policy::{ObjectivePolicy, PolicyContext};
//! use scrimmage_core::roles::Role;
//!
//! let id = PlayerId::new(1);
//! let spec = PlayerSpec::new(Team::Home, 7, Vec2::new(10.0, 10.0), PlayerStats::default(), Role::idle());
//! let mut roster = Roster::new();
//! roster.insert(id, Player::from_spec(id, &spec).unwrap());
//!
//! let ball = Ball::new(Vec2::new(50.0, 25.0));
//! let ctx = PolicyContext {
//!     roster: &roster,
//!     ball: &ball,
//!     geometry: &TickGeometry::default(),
//!     bounds: &Bounds::new(100.0, 50.0),
//!     tuning: &Tuning::default(),
//! };
//! let decision = ObjectivePolicy::SeekLooseBall.evaluate(&roster[&id], &ctx).unwrap();
//! assert_eq!(decision.objective, Vec2::new(50.0, 25.0));
//! ```

use std::f32::consts::PI;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::ball::{Ball, ThrowRequest};
use crate::config::Tuning;
use crate::entity::{Player, PlayerId, Roster};
use crate::error::{Result, SimError};
use crate::geometry::{components, Bounds};
use crate::hazard::{HazardMap, TickGeometry};
use crate::optimize::nelder_mead;

/// Stop tolerance on the hazard value for find-space minimization.
const FIND_SPACE_TOLERANCE: f32 = 1.0e-4;

/// Run-to-goal candidates whose forward progress differs by less than this
/// count as equal.
const PROGRESS_TIE_EPSILON: f32 = 1.0e-3;

/// A player's current behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObjectivePolicy {
    /// Stay where you are.
    #[default]
    HoldPosition,
    /// Run at the ball.
    SeekLooseBall,
    /// Run for the end zone, avoiding defenders' reach.
    RunToGoal,
    /// Chase down the carrier and tackle.
    TackleCarrier,
    /// Go after the nearest standing opponent.
    AttackNearestOpponent,
    /// Move to the lowest-hazard point as a receiver.
    FindSpace,
    /// Run, or pass to a teammate in a better spot.
    RunOrPass,
    /// Throw to a specific player.
    ThrowTo(PlayerId),
    /// Run to where the ball in flight will come down.
    ChaseLanding,
}

/// Read-only view of the field handed to every policy.
#[derive(Debug, Clone, Copy)]
pub struct PolicyContext<'a> {
    /// All players.
    pub roster: &'a Roster,
    /// The ball.
    pub ball: &'a Ball,
    /// This tick's derived geometry.
    pub geometry: &'a TickGeometry,
    /// Field bounds.
    pub bounds: &'a Bounds,
    /// Engine constants.
    pub tuning: &'a Tuning,
}

/// What a policy wants done.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    /// Point to steer toward.
    pub objective: Vec2,
    /// New blocking intent, if the policy has an opinion.
    pub wants_to_block: Option<bool>,
    /// New catching intent, if the policy has an opinion.
    pub wants_to_catch: Option<bool>,
    /// Throw to queue on the ball.
    pub throw: Option<ThrowRequest>,
}

impl Decision {
    fn toward(objective: Vec2) -> Self {
        Self {
            objective,
            wants_to_block: None,
            wants_to_catch: None,
            throw: None,
        }
    }
}

impl ObjectivePolicy {
    /// Evaluates this policy for `player`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownPlayer`] if a [`ThrowTo`](Self::ThrowTo)
    /// target is not on the roster.
    pub fn evaluate(self, player: &Player, ctx: &PolicyContext<'_>) -> Result<Decision> {
        let decision = match self {
            Self::HoldPosition => Decision::toward(player.position),
            Self::SeekLooseBall => seek_ball(ctx),
            Self::RunToGoal => Decision::toward(run_to_goal(player, ctx)),
            Self::TackleCarrier => tackle_carrier(player, ctx),
            Self::AttackNearestOpponent => attack_nearest(player, ctx),
            Self::FindSpace => Decision {
                wants_to_catch: Some(true),
                ..match &ctx.geometry.hazard {
                    Some(hazard) => Decision::toward(find_space(player, hazard, ctx)),
                    None => seek_ball(ctx),
                }
            },
            Self::RunOrPass => run_or_pass(player, ctx),
            Self::ThrowTo(target) => {
                let receiver = ctx.roster.get(&target).ok_or(SimError::UnknownPlayer(target))?;
                Decision {
                    throw: throw_from(player, receiver.position, ctx.ball),
                    ..Decision::toward(player.position)
                }
            }
            Self::ChaseLanding => Decision {
                wants_to_catch: Some(true),
                ..match ctx.ball.landing_point() {
                    Some(landing) if ctx.ball.is_flying() => Decision::toward(landing),
                    _ => seek_ball(ctx),
                }
            },
        };
        Ok(decision)
    }
}

fn seek_ball(ctx: &PolicyContext<'_>) -> Decision {
    Decision::toward(ctx.ball.xy())
}

/// A throw request if `player` carries the ball, else nothing.
fn throw_from(player: &Player, target: Vec2, ball: &Ball) -> Option<ThrowRequest> {
    (ball.carrier() == Some(player.id())).then_some(ThrowRequest {
        thrower: player.id(),
        target,
        power: player.stats().throw_power,
    })
}

/// Best point to run to within the forward arc.
///
/// Each candidate ray is cut short by the first defensive bisector it
/// crosses, or by the field edge. The ray with the most progress along the
/// attacking axis wins; equal progress goes to the smaller deviation.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn run_to_goal(player: &Player, ctx: &PolicyContext<'_>) -> Vec2 {
    let tuning = ctx.tuning;
    let arc = tuning.run_arc_degrees;
    let step = tuning.run_step_degrees;
    let base = if player.team().direction() > 0.0 { 0.0 } else { PI };
    let samples = ((2.0 * arc) / step).ceil().max(1.0) as u32;
    let origin = player.position;

    let mut best = origin;
    let mut best_progress = f32::NEG_INFINITY;
    let mut best_deviation = f32::INFINITY;
    for i in 0..samples {
        let deviation = (-arc + step * i as f32).to_radians();
        let dir = components(1.0, base + deviation);
        let edge = ctx.bounds.exit_distance(origin, dir);
        let reach = ctx
            .geometry
            .first_crossing(origin, dir)
            .map_or(edge, |crossing| crossing.min(edge));
        let progress = reach * deviation.cos();
        let tied = (progress - best_progress).abs() <= PROGRESS_TIE_EPSILON;
        if (progress > best_progress && !tied) || (tied && deviation.abs() < best_deviation) {
            best = origin + dir * reach;
            best_progress = progress;
            best_deviation = deviation.abs();
        }
    }
    ctx.bounds.clamp_inset(best, 2.0 * player.size())
}

fn tackle_carrier(player: &Player, ctx: &PolicyContext<'_>) -> Decision {
    let Some(carrier) = ctx
        .ball
        .carrier()
        .filter(|id| *id != player.id())
        .and_then(|id| ctx.roster.get(&id))
    else {
        return seek_ball(ctx);
    };
    let separation = player.distance_to(carrier);
    let objective = if separation < 1.5 * (player.size() + carrier.size()) {
        carrier.position
    } else {
        carrier.position + Vec2::new(carrier.team().direction() * separation, 0.0)
    };
    Decision {
        wants_to_block: Some(false),
        wants_to_catch: Some(false),
        ..Decision::toward(objective)
    }
}

fn attack_nearest(player: &Player, ctx: &PolicyContext<'_>) -> Decision {
    let target = ctx
        .roster
        .values()
        .filter(|p| p.team() != player.team() && p.is_standing())
        .min_by(|a, b| player.distance_to(a).total_cmp(&player.distance_to(b)));
    match target {
        Some(opponent) => Decision {
            wants_to_block: Some(true),
            wants_to_catch: Some(false),
            ..Decision::toward(opponent.position)
        },
        None => seek_ball(ctx),
    }
}

/// Multi-start downhill search for the lowest-hazard point.
fn find_space(player: &Player, hazard: &HazardMap, ctx: &PolicyContext<'_>) -> Vec2 {
    let bounds = ctx.bounds;
    let tuning = ctx.tuning;
    let margin = tuning.objective_margin;
    let goal_x = player.team().attacking_goal_x(bounds.width);
    let starts = [
        player.position,
        hazard.carrier_position(),
        Vec2::new(goal_x, player.position.y),
    ];
    let score = |p: Vec2| hazard.score(bounds.clamp_inset(p, margin), player.id());

    starts
        .into_iter()
        .map(|start| {
            let start = bounds.clamp_inset(start, margin);
            nelder_mead(
                score,
                start,
                tuning.find_space_step,
                FIND_SPACE_TOLERANCE,
                tuning.find_space_iterations,
            )
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map_or(player.position, |(p, _)| bounds.clamp_inset(p, margin))
}

fn run_or_pass(player: &Player, ctx: &PolicyContext<'_>) -> Decision {
    let run = Decision::toward(run_to_goal(player, ctx));
    let Some(hazard) = ctx.geometry.hazard.as_ref().filter(|h| h.carrier() == player.id()) else {
        return run;
    };
    let own = hazard.score(player.position, player.id());
    let best_teammate = hazard
        .receivers()
        .iter()
        .map(|(id, pos)| (*pos, hazard.score(*pos, *id)))
        .min_by(|a, b| a.1.total_cmp(&b.1));
    match best_teammate {
        Some((target, teammate)) if own > teammate => Decision {
            throw: throw_from(player, target, ctx.ball),
            ..run
        },
        _ => run,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HazardWeights;
    use crate::entity::{PlayerSpec, PlayerStats, Team};
    use crate::roles::Role;

    struct Scene {
        roster: Roster,
        ball: Ball,
        bounds: Bounds,
        tuning: Tuning,
        geometry: TickGeometry,
    }

    impl Scene {
        fn new(players: &[(Team, Vec2)], ball_at: Vec2) -> Self {
            let roster = players
                .iter()
                .enumerate()
                .map(|(i, (team, pos))| {
                    let id = PlayerId::new(i as u64 + 1);
                    let spec = PlayerSpec::new(*team, 1, *pos, PlayerStats::default(), Role::idle());
                    (id, Player::from_spec(id, &spec).unwrap())
                })
                .collect();
            Self {
                roster,
                ball: Ball::new(ball_at),
                bounds: Bounds::new(100.0, 50.0),
                tuning: Tuning::default(),
                geometry: TickGeometry::default(),
            }
        }

        fn carried_by(mut self, id: u64) -> Self {
            let id = PlayerId::new(id);
            let at = self.roster[&id].position;
            self.ball.give_to(id, at);
            self.geometry =
                TickGeometry::compute(&self.roster, &self.ball, self.bounds.width, HazardWeights::default());
            self
        }

        fn decide(&self, policy: ObjectivePolicy, id: u64) -> Result<Decision> {
            let ctx = PolicyContext {
                roster: &self.roster,
                ball: &self.ball,
                geometry: &self.geometry,
                bounds: &self.bounds,
                tuning: &self.tuning,
            };
            policy.evaluate(&self.roster[&PlayerId::new(id)], &ctx)
        }
    }

    mod simple_policy_tests {
        use super::*;

        #[test]
        fn hold_position_stays_put() {
            let scene = Scene::new(&[(Team::Home, Vec2::new(12.0, 3.0))], Vec2::new(50.0, 25.0));
            let d = scene.decide(ObjectivePolicy::HoldPosition, 1).unwrap();
            assert_eq!(d.objective, Vec2::new(12.0, 3.0));
            assert_eq!(d.throw, None);
            assert_eq!(d.wants_to_catch, None);
        }

        #[test]
        fn chase_landing_without_flight_seeks_ball() {
            let scene = Scene::new(&[(Team::Home, Vec2::new(12.0, 3.0))], Vec2::new(50.0, 25.0));
            let d = scene.decide(ObjectivePolicy::ChaseLanding, 1).unwrap();
            assert_eq!(d.objective, Vec2::new(50.0, 25.0));
        }

        #[test]
        fn chase_landing_targets_predicted_point() {
            let mut scene = Scene::new(&[(Team::Home, Vec2::new(12.0, 3.0))], Vec2::new(50.0, 25.0));
            scene.ball.launch(0.4, 20.0, Vec2::new(80.0, 25.0), &Tuning::default());
            let landing = scene.ball.landing_point().unwrap();
            let d = scene.decide(ObjectivePolicy::ChaseLanding, 1).unwrap();
            assert_eq!(d.objective, landing);
            assert_eq!(d.wants_to_catch, Some(true));
        }

        #[test]
        fn attack_nearest_ignores_prone_and_teammates() {
            let mut scene = Scene::new(
                &[
                    (Team::Home, Vec2::new(50.0, 25.0)),
                    (Team::Home, Vec2::new(51.0, 25.0)),
                    (Team::Away, Vec2::new(53.0, 25.0)),
                    (Team::Away, Vec2::new(60.0, 25.0)),
                ],
                Vec2::new(10.0, 10.0),
            );
            scene.roster.get_mut(&PlayerId::new(3)).unwrap().knock_down(5);
            let d = scene.decide(ObjectivePolicy::AttackNearestOpponent, 1).unwrap();
            assert_eq!(d.objective, Vec2::new(60.0, 25.0));
            assert_eq!(d.wants_to_block, Some(true));
            assert_eq!(d.wants_to_catch, Some(false));
        }

        #[test]
        fn attack_with_no_standing_opponent_seeks_ball() {
            let scene = Scene::new(&[(Team::Home, Vec2::new(50.0, 25.0))], Vec2::new(10.0, 10.0));
            let d = scene.decide(ObjectivePolicy::AttackNearestOpponent, 1).unwrap();
            assert_eq!(d.objective, Vec2::new(10.0, 10.0));
        }
    }

    mod run_to_goal_tests {
        use super::*;

        #[test]
        fn open_field_runs_straight() {
            let scene = Scene::new(&[(Team::Home, Vec2::new(40.0, 25.0))], Vec2::new(40.0, 25.0)).carried_by(1);
            let d = scene.decide(ObjectivePolicy::RunToGoal, 1).unwrap();
            assert!((d.objective - Vec2::new(98.0, 25.0)).length() < 1e-3, "{:?}", d.objective);
        }

        #[test]
        fn away_team_runs_the_other_way() {
            let scene = Scene::new(&[(Team::Away, Vec2::new(60.0, 25.0))], Vec2::new(60.0, 25.0)).carried_by(1);
            let d = scene.decide(ObjectivePolicy::RunToGoal, 1).unwrap();
            assert!((d.objective - Vec2::new(2.0, 25.0)).length() < 1e-3, "{:?}", d.objective);
        }

        #[test]
        fn veers_away_from_defender() {
            let scene = Scene::new(
                &[(Team::Home, Vec2::new(40.0, 25.0)), (Team::Away, Vec2::new(60.0, 35.0))],
                Vec2::new(40.0, 25.0),
            )
            .carried_by(1);
            let d = scene.decide(ObjectivePolicy::RunToGoal, 1).unwrap();
            assert!(d.objective.y < 25.0 && d.objective.x > 40.0, "{:?}", d.objective);
        }

        #[test]
        fn objective_keeps_two_sizes_from_edge() {
            let scene = Scene::new(&[(Team::Home, Vec2::new(99.0, 49.5))], Vec2::new(99.0, 49.5)).carried_by(1);
            let d = scene.decide(ObjectivePolicy::RunToGoal, 1).unwrap();
            assert!(d.objective.x <= 98.0 && d.objective.y <= 48.0);
        }
    }

    mod tackle_tests {
        use super::*;

        #[test]
        fn close_tackler_targets_carrier() {
            let scene = Scene::new(
                &[(Team::Home, Vec2::new(40.0, 25.0)), (Team::Away, Vec2::new(42.5, 25.0))],
                Vec2::new(40.0, 25.0),
            )
            .carried_by(1);
            let d = scene.decide(ObjectivePolicy::TackleCarrier, 2).unwrap();
            assert_eq!(d.objective, Vec2::new(40.0, 25.0));
            assert_eq!(d.wants_to_block, Some(false));
            assert_eq!(d.wants_to_catch, Some(false));
        }

        #[test]
        fn distant_tackler_cuts_off_ahead() {
            let scene = Scene::new(
                &[(Team::Home, Vec2::new(40.0, 25.0)), (Team::Away, Vec2::new(70.0, 30.0))],
                Vec2::new(40.0, 25.0),
            )
            .carried_by(1);
            let d = scene.decide(ObjectivePolicy::TackleCarrier, 2).unwrap();
            let separation = Vec2::new(40.0, 25.0).distance(Vec2::new(70.0, 30.0));
            assert!((d.objective - Vec2::new(40.0 + separation, 25.0)).length() < 1e-4);
        }

        #[test]
        fn no_carrier_seeks_ball() {
            let scene = Scene::new(&[(Team::Away, Vec2::new(70.0, 30.0))], Vec2::new(33.0, 20.0));
            let d = scene.decide(ObjectivePolicy::TackleCarrier, 1).unwrap();
            assert_eq!(d.objective, Vec2::new(33.0, 20.0));
        }
    }

    mod find_space_tests {
        use super::*;

        #[test]
        fn without_carrier_seeks_ball() {
            let scene = Scene::new(&[(Team::Home, Vec2::new(20.0, 20.0))], Vec2::new(30.0, 30.0));
            let d = scene.decide(ObjectivePolicy::FindSpace, 1).unwrap();
            assert_eq!(d.objective, Vec2::new(30.0, 30.0));
        }

        #[test]
        fn result_is_no_worse_than_staying() {
            let scene = Scene::new(
                &[
                    (Team::Home, Vec2::new(40.0, 25.0)),
                    (Team::Home, Vec2::new(50.0, 20.0)),
                    (Team::Away, Vec2::new(55.0, 22.0)),
                    (Team::Away, Vec2::new(70.0, 30.0)),
                ],
                Vec2::new(40.0, 25.0),
            )
            .carried_by(1);
            let d = scene.decide(ObjectivePolicy::FindSpace, 2).unwrap();
            let hazard = scene.geometry.hazard.as_ref().unwrap();
            let here = hazard.score(Vec2::new(50.0, 20.0), PlayerId::new(2));
            assert!(hazard.score(d.objective, PlayerId::new(2)) <= here + 1e-4);
            assert!(scene.bounds.contains(d.objective));
            assert_eq!(d.wants_to_catch, Some(true));
        }
    }

    mod throw_tests {
        use super::*;

        #[test]
        fn throw_to_unknown_player_is_an_error() {
            let scene = Scene::new(&[(Team::Home, Vec2::new(40.0, 25.0))], Vec2::new(40.0, 25.0)).carried_by(1);
            let err = scene.decide(ObjectivePolicy::ThrowTo(PlayerId::new(9)), 1).unwrap_err();
            assert!(matches!(err, SimError::UnknownPlayer(id) if id == PlayerId::new(9)));
        }

        #[test]
        fn throw_to_targets_receiver() {
            let scene = Scene::new(
                &[(Team::Home, Vec2::new(40.0, 25.0)), (Team::Home, Vec2::new(55.0, 30.0))],
                Vec2::new(40.0, 25.0),
            )
            .carried_by(1);
            let d = scene.decide(ObjectivePolicy::ThrowTo(PlayerId::new(2)), 1).unwrap();
            let throw = d.throw.unwrap();
            assert_eq!(throw.thrower, PlayerId::new(1));
            assert_eq!(throw.target, Vec2::new(55.0, 30.0));
            assert_eq!(throw.power, PlayerStats::default().throw_power);
        }

        #[test]
        fn only_the_carrier_throws() {
            let scene = Scene::new(
                &[(Team::Home, Vec2::new(40.0, 25.0)), (Team::Home, Vec2::new(55.0, 30.0))],
                Vec2::new(40.0, 25.0),
            )
            .carried_by(1);
            let d = scene.decide(ObjectivePolicy::ThrowTo(PlayerId::new(1)), 2).unwrap();
            assert_eq!(d.throw, None);
        }

        #[test]
        fn pressured_carrier_passes_to_open_teammate() {
            let scene = Scene::new(
                &[
                    (Team::Home, Vec2::new(40.0, 25.0)),
                    (Team::Home, Vec2::new(80.0, 25.0)),
                    (Team::Away, Vec2::new(41.0, 25.0)),
                ],
                Vec2::new(40.0, 25.0),
            )
            .carried_by(1);
            let d = scene.decide(ObjectivePolicy::RunOrPass, 1).unwrap();
            let throw = d.throw.expect("should pass");
            assert_eq!(throw.target, Vec2::new(80.0, 25.0));
        }

        #[test]
        fn open_carrier_keeps_running() {
            let scene = Scene::new(
                &[
                    (Team::Home, Vec2::new(80.0, 25.0)),
                    (Team::Home, Vec2::new(40.0, 25.0)),
                    (Team::Away, Vec2::new(41.0, 25.0)),
                ],
                Vec2::new(80.0, 25.0),
            )
            .carried_by(1);
            let d = scene.decide(ObjectivePolicy::RunOrPass, 1).unwrap();
            assert_eq!(d.throw, None);
            assert!(d.objective.x > 80.0);
        }
    }
}

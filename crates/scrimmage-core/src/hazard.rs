//! Per-tick derived geometry: defensive bisector lines and hazard scoring.
//!
//! Everything here is rebuilt from scratch at the start of every tick from a
//! read-only view of the roster and ball. Nothing is cached across ticks, so
//! every value is a pure function of the current snapshot.
//!
//! # Bisector lines
//!
//! For the ball carrier and each opponent standing between the carrier and
//! the carrier's goal, the perpendicular bisector of the segment joining them
//! splits the field into "carrier gets there first" and "defender gets there
//! first". Running-to-goal searches treat the first such line along a ray as
//! the limit of how far that ray is safe.
//!
//! # Hazard score
//!
//! For a receiver considering a point `p`:
//!
//! ```text
//! H(p) = w_goal * d_goal(p)^2
//!      + w_pass * |carrier - p|^2
//!      - w_def  * min distance from p to a defender
//!      - w_recv * min distance from p to another receiver
//! ```
//!
//! Lower is better. An empty defender or receiver set contributes zero.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::ball::Ball;
use crate::config::HazardWeights;
use crate::entity::{PlayerId, Roster, Team};

// =============================================================================
// Bisector Lines
// =============================================================================

/// Shape of a bisector line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LineKind {
    /// `y = slope * x + intercept`.
    Sloped {
        /// Rise over run.
        slope: f32,
        /// Value of y at x = 0.
        intercept: f32,
    },
    /// `x = constant`, used when carrier and defender share a y coordinate.
    Vertical {
        /// The constant x.
        x: f32,
    },
}

/// Perpendicular bisector between the carrier and one defender.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BisectorLine {
    /// The defender this line was built against.
    pub defender: PlayerId,
    /// The line itself.
    pub kind: LineKind,
}

impl BisectorLine {
    /// Perpendicular bisector of the segment `a`-`b`.
    #[must_use]
    pub fn between(defender: PlayerId, a: Vec2, b: Vec2) -> Self {
        let mid = (a + b) * 0.5;
        let d = b - a;
        let kind = if d.y == 0.0 {
            LineKind::Vertical { x: mid.x }
        } else {
            let slope = -d.x / d.y;
            LineKind::Sloped {
                slope,
                intercept: mid.y - slope * mid.x,
            }
        };
        Self { defender, kind }
    }

    /// Distance along the ray `origin + s * dir` (`dir` a unit vector) to
    /// where it crosses this line, if it does so ahead of the origin.
    #[must_use]
    pub fn ray_crossing(&self, origin: Vec2, dir: Vec2) -> Option<f32> {
        let s = match self.kind {
            LineKind::Sloped { slope, intercept } => {
                let denom = dir.y - slope * dir.x;
                if denom == 0.0 {
                    return None;
                }
                (slope * origin.x + intercept - origin.y) / denom
            }
            LineKind::Vertical { x } => {
                if dir.x == 0.0 {
                    return None;
                }
                (x - origin.x) / dir.x
            }
        };
        (s.is_finite() && s > 0.0).then_some(s)
    }
}

// =============================================================================
// Hazard Map
// =============================================================================

/// Hazard scoring for the carrier's teammates, built around one carrier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardMap {
    carrier: PlayerId,
    carrier_position: Vec2,
    team: Team,
    field_width: f32,
    defenders: Vec<(PlayerId, Vec2)>,
    receivers: Vec<(PlayerId, Vec2)>,
    weights: HazardWeights,
}

impl HazardMap {
    /// Builds the map for `carrier`. Returns `None` if the carrier is not on
    /// the roster.
    #[must_use]
    pub fn for_carrier(
        roster: &Roster,
        carrier: PlayerId,
        field_width: f32,
        weights: HazardWeights,
    ) -> Option<Self> {
        let holder = roster.get(&carrier)?;
        let team = holder.team();
        let (receivers, defenders): (Vec<_>, Vec<_>) = roster
            .values()
            .filter(|p| p.id() != carrier)
            .map(|p| (p.team(), (p.id(), p.position)))
            .partition(|(t, _)| *t == team);
        Some(Self {
            carrier,
            carrier_position: holder.position,
            team,
            field_width,
            defenders: defenders.into_iter().map(|(_, d)| d).collect(),
            receivers: receivers.into_iter().map(|(_, r)| r).collect(),
            weights,
        })
    }

    /// The carrier this map was built around.
    #[must_use]
    pub const fn carrier(&self) -> PlayerId {
        self.carrier
    }

    /// Where the carrier stood when the map was built.
    #[must_use]
    pub const fn carrier_position(&self) -> Vec2 {
        self.carrier_position
    }

    /// The attacking team.
    #[must_use]
    pub const fn team(&self) -> Team {
        self.team
    }

    /// Players on the other team.
    #[must_use]
    pub fn defenders(&self) -> &[(PlayerId, Vec2)] {
        &self.defenders
    }

    /// The carrier's teammates.
    #[must_use]
    pub fn receivers(&self) -> &[(PlayerId, Vec2)] {
        &self.receivers
    }

    /// Hazard of `point` for player `who`. `who` is left out of the
    /// receiver-spacing term so a player never repels itself.
    #[must_use]
    pub fn score(&self, point: Vec2, who: PlayerId) -> f32 {
        let w = &self.weights;
        let goal = self.team.distance_to_goal(point.x, self.field_width);
        let pass = self.carrier_position.distance_squared(point);
        let nearest_defender = nearest(self.defenders.iter(), point);
        let nearest_receiver = nearest(self.receivers.iter().filter(|(id, _)| *id != who), point);
        w.goal * goal * goal + w.pass * pass - w.defender * nearest_defender - w.receiver * nearest_receiver
    }
}

fn nearest<'a>(points: impl Iterator<Item = &'a (PlayerId, Vec2)>, to: Vec2) -> f32 {
    points
        .map(|(_, p)| p.distance(to))
        .min_by(f32::total_cmp)
        .unwrap_or(0.0)
}

// =============================================================================
// Tick Geometry
// =============================================================================

/// All derived geometry for one tick.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TickGeometry {
    /// Bisectors between the carrier and each goalward opponent.
    pub lines: Vec<BisectorLine>,
    /// Hazard scoring, present only while someone carries the ball.
    pub hazard: Option<HazardMap>,
}

impl TickGeometry {
    /// Rebuilds the geometry from the current roster and ball.
    #[must_use]
    pub fn compute(roster: &Roster, ball: &Ball, field_width: f32, weights: HazardWeights) -> Self {
        let Some(carrier) = ball.carrier().and_then(|id| roster.get(&id)) else {
            return Self::default();
        };
        let to_goal = carrier.distance_to_goal(field_width);
        let lines = roster
            .values()
            .filter(|p| p.team() != carrier.team())
            .filter(|p| to_goal > p.distance_to_own_goal(field_width))
            .map(|p| BisectorLine::between(p.id(), carrier.position, p.position))
            .collect();
        Self {
            lines,
            hazard: HazardMap::for_carrier(roster, carrier.id(), field_width, weights),
        }
    }

    /// Distance along a ray to the nearest bisector it crosses ahead of `origin`.
    #[must_use]
    pub fn first_crossing(&self, origin: Vec2, dir: Vec2) -> Option<f32> {
        self.lines
            .iter()
            .filter_map(|line| line.ray_crossing(origin, dir))
            .min_by(f32::total_cmp)
    }
}

//! Contact detection and resolution.
//!
//! After every player has moved, overlapping standing players are paired up
//! by [`detect_collisions`] and each pair is handed to a [`Resolver`] together
//! with the mutable parts of the field it may change.
//!
//! # Invariants
//!
//! - Pairs are reported once, lower id first, in roster order
//! - Prone players take no part in contact
//! - All randomness comes from the field's generator, drawn in pair order
//!
//! # Available Resolvers
//!
//! - [`DuelResolver`]: Tackles on the carrier and blocks between opponents

mod duel;

pub use duel::{BlockResult, DuelResolver};

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::ball::Ball;
use crate::config::Tuning;
use crate::entity::{PlayerId, Roster};
use crate::geometry::Bounds;

/// Two standing players whose circles overlap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collision {
    /// Lower id of the pair.
    pub a: PlayerId,
    /// Higher id of the pair.
    pub b: PlayerId,
    /// Combined radii minus centre distance.
    pub overlap: f32,
}

/// Everything a resolver is allowed to change.
#[derive(Debug)]
pub struct ContactScene<'a> {
    /// All players.
    pub roster: &'a mut Roster,
    /// The ball.
    pub ball: &'a mut Ball,
    /// Field bounds, for keeping displaced players and the ball on the field.
    pub bounds: &'a Bounds,
    /// Engine constants.
    pub tuning: &'a Tuning,
    /// The field's random source.
    pub rng: &'a mut ChaCha8Rng,
}

/// How one contact played out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    /// Teammates touched; nothing happens.
    SameTeam,
    /// Opponents brushed past each other without contesting.
    PassThrough,
    /// A player went after the carrier.
    Tackle {
        /// The player without the ball.
        tackler: PlayerId,
        /// The ball carrier.
        carrier: PlayerId,
        /// True if the carrier went down and lost the ball.
        success: bool,
    },
    /// Two opponents without the ball fought it out.
    Block {
        /// Player who won the roll.
        winner: PlayerId,
        /// Player who lost the roll.
        loser: PlayerId,
        /// What happened to them.
        result: BlockResult,
    },
    /// One of the pair was already down by the time this pair came up.
    Skipped,
}

/// Resolves contacts between players.
///
/// # Example
///
/// ```
/// use scrimmage_core::resolver::{Collision, ContactOutcome, ContactScene, Resolver};
///
/// struct Ghosts;
///
/// impl Resolver for Ghosts {
///     fn resolve(&self, _collision: &Collision, _scene: &mut ContactScene<'_>) -> ContactOutcome {
///         ContactOutcome::PassThrough
///     }
/// }
/// ```
pub trait Resolver {
    /// Resolves one contact, mutating the scene.
    fn resolve(&self, collision: &Collision, scene: &mut ContactScene<'_>) -> ContactOutcome;
}

/// All overlapping standing pairs, lower id first, in roster order.
#[must_use]
pub fn detect_collisions(roster: &Roster) -> Vec<Collision> {
    let standing: Vec<_> = roster.values().filter(|p| p.is_standing()).collect();
    let mut collisions = Vec::new();
    for (i, first) in standing.iter().enumerate() {
        for second in &standing[i + 1..] {
            let reach = first.size() + second.size();
            let distance = first.distance_to(second);
            if distance < reach {
                collisions.push(Collision {
                    a: first.id(),
                    b: second.id(),
                    overlap: reach - distance,
                });
            }
        }
    }
    collisions
}

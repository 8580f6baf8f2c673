//! Level-triggered ball-state events that drive policy selection.
//!
//! A [`Trigger`] pairs one [`TriggerKind`] predicate with the players who
//! subscribed to it. While the predicate holds, every tick broadcasts to all
//! subscribers, and each subscriber's [`Reaction`] sets its policy. Reactions
//! only ever *set* a policy, so repeating a broadcast changes nothing.

use serde::{Deserialize, Serialize};

use crate::ball::Ball;
use crate::entity::{PlayerId, Roster};
use crate::error::{Result, SimError};
use crate::policy::ObjectivePolicy;

/// Ball-state predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TriggerKind {
    /// The ball is on the ground with no carrier.
    BallLoose,
    /// Someone carries the ball.
    BallHeld,
    /// The ball is in the air.
    BallFlying,
}

impl TriggerKind {
    /// True if the predicate holds for `ball`.
    #[must_use]
    pub const fn holds(self, ball: &Ball) -> bool {
        match self {
            Self::BallLoose => ball.is_loose(),
            Self::BallHeld => ball.carrier().is_some(),
            Self::BallFlying => ball.is_flying(),
        }
    }
}

/// How a subscriber responds to a broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reaction {
    /// Set this policy regardless of who has the ball.
    Always(ObjectivePolicy),
    /// Choose by relation to the ball's holder. Leaves the policy alone if
    /// nobody holds the ball.
    ByRelation {
        /// Used by the holder.
        holder: ObjectivePolicy,
        /// Used by the holder's teammates.
        teammate: ObjectivePolicy,
        /// Used by the holder's opponents.
        opponent: ObjectivePolicy,
    },
}

impl Reaction {
    /// The policy `player` should switch to, if any.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownPlayer`] if `player` or the holder is not on
    /// the roster.
    pub fn policy_for(&self, player: PlayerId, ball: &Ball, roster: &Roster) -> Result<Option<ObjectivePolicy>> {
        let me = roster.get(&player).ok_or(SimError::UnknownPlayer(player))?;
        match *self {
            Self::Always(policy) => Ok(Some(policy)),
            Self::ByRelation {
                holder,
                teammate,
                opponent,
            } => {
                let Some(holder_id) = ball.holder() else {
                    return Ok(None);
                };
                if holder_id == player {
                    return Ok(Some(holder));
                }
                let holding = roster.get(&holder_id).ok_or(SimError::UnknownPlayer(holder_id))?;
                Ok(Some(if holding.team() == me.team() { teammate } else { opponent }))
            }
        }
    }
}

/// One predicate and its subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    kind: TriggerKind,
    subscriptions: Vec<(PlayerId, Reaction)>,
}

impl Trigger {
    /// A trigger with no subscribers yet.
    #[must_use]
    pub const fn new(kind: TriggerKind) -> Self {
        Self {
            kind,
            subscriptions: Vec::new(),
        }
    }

    /// The predicate this trigger watches.
    #[must_use]
    pub const fn kind(&self) -> TriggerKind {
        self.kind
    }

    /// Subscribers in subscription order.
    #[must_use]
    pub fn subscriptions(&self) -> &[(PlayerId, Reaction)] {
        &self.subscriptions
    }

    /// Adds a subscriber.
    pub fn subscribe(&mut self, player: PlayerId, reaction: Reaction) {
        self.subscriptions.push((player, reaction));
    }

    /// Initial evaluation after registration. Same as [`Trigger::check`].
    ///
    /// # Errors
    ///
    /// See [`Trigger::broadcast`].
    pub fn init(&self, ball: &Ball, roster: &mut Roster) -> Result<bool> {
        self.check(ball, roster)
    }

    /// Broadcasts if the predicate holds. Returns whether it fired.
    ///
    /// # Errors
    ///
    /// See [`Trigger::broadcast`].
    pub fn check(&self, ball: &Ball, roster: &mut Roster) -> Result<bool> {
        if !self.kind.holds(ball) {
            return Ok(false);
        }
        self.broadcast(ball, roster)?;
        Ok(true)
    }

    /// Applies every subscription's reaction.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownPlayer`] if a subscriber (or the ball's
    /// holder) is not on the roster.
    pub fn broadcast(&self, ball: &Ball, roster: &mut Roster) -> Result<()> {
        for (player, reaction) in &self.subscriptions {
            if let Some(policy) = reaction.policy_for(*player, ball, roster)? {
                roster
                    .get_mut(player)
                    .ok_or(SimError::UnknownPlayer(*player))?
                    .set_policy(policy);
            }
        }
        tracing::trace!(kind = ?self.kind, subscribers = self.subscriptions.len(), "trigger broadcast");
        Ok(())
    }
}

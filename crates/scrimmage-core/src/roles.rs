//! Roles: which reaction a player has to each ball-state trigger.
//!
//! A role is plain data. Registering a player subscribes it to one trigger per
//! entry in its table; nothing else in the engine knows what a role is called.
//!
//! The stock roles below are ready-made tables for common positions.
//!
//! # Example
//!
//! ```
//! use scrimmage_core::policy::ObjectivePolicy;
//! use scrimmage_core::roles::Role;
//! use scrimmage_core::trigger::{Reaction, TriggerKind};
//!
//! let sweeper = Role::new("sweeper")
//!     .on(TriggerKind::BallLoose, Reaction::Always(ObjectivePolicy::SeekLooseBall))
//!     .on(TriggerKind::BallHeld, Reaction::Always(ObjectivePolicy::AttackNearestOpponent));
//! assert_eq!(sweeper.label(), "sweeper");
//! assert_eq!(sweeper.reactions().len(), 2);
//! ```

use serde::{Deserialize, Serialize};

use crate::policy::ObjectivePolicy;
use crate::trigger::{Reaction, TriggerKind};

/// A named trigger-to-reaction table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    label: String,
    reactions: Vec<(TriggerKind, Reaction)>,
}

impl Role {
    /// An empty role.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            reactions: Vec::new(),
        }
    }

    /// Adds a reaction to `kind`.
    #[must_use]
    pub fn on(mut self, kind: TriggerKind, reaction: Reaction) -> Self {
        self.reactions.push((kind, reaction));
        self
    }

    /// Name shown in the move-log header.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The trigger table, in the order it was built.
    #[must_use]
    pub fn reactions(&self) -> &[(TriggerKind, Reaction)] {
        &self.reactions
    }

    /// Subscribes to nothing and holds position.
    #[must_use]
    pub fn idle() -> Self {
        Self::new("idle")
    }

    /// Chases loose balls, runs with the ball, tackles opposing carriers.
    #[must_use]
    pub fn runner() -> Self {
        Self::new("runner")
            .on(TriggerKind::BallLoose, Reaction::Always(ObjectivePolicy::SeekLooseBall))
            .on(
                TriggerKind::BallHeld,
                Reaction::ByRelation {
                    holder: ObjectivePolicy::RunToGoal,
                    teammate: ObjectivePolicy::SeekLooseBall,
                    opponent: ObjectivePolicy::TackleCarrier,
                },
            )
            .on(TriggerKind::BallFlying, Reaction::Always(ObjectivePolicy::ChaseLanding))
    }

    /// Runs or passes with the ball; finds space for a pass otherwise.
    #[must_use]
    pub fn thrower() -> Self {
        Self::new("thrower")
            .on(TriggerKind::BallLoose, Reaction::Always(ObjectivePolicy::SeekLooseBall))
            .on(
                TriggerKind::BallHeld,
                Reaction::ByRelation {
                    holder: ObjectivePolicy::RunOrPass,
                    teammate: ObjectivePolicy::FindSpace,
                    opponent: ObjectivePolicy::TackleCarrier,
                },
            )
            .on(
                TriggerKind::BallFlying,
                Reaction::ByRelation {
                    holder: ObjectivePolicy::FindSpace,
                    teammate: ObjectivePolicy::ChaseLanding,
                    opponent: ObjectivePolicy::ChaseLanding,
                },
            )
    }

    /// Goes looking for contact whenever it does not have the ball.
    #[must_use]
    pub fn bruiser() -> Self {
        Self::new("bruiser")
            .on(
                TriggerKind::BallLoose,
                Reaction::Always(ObjectivePolicy::AttackNearestOpponent),
            )
            .on(
                TriggerKind::BallHeld,
                Reaction::ByRelation {
                    holder: ObjectivePolicy::RunToGoal,
                    teammate: ObjectivePolicy::AttackNearestOpponent,
                    opponent: ObjectivePolicy::TackleCarrier,
                },
            )
    }

    /// Gets open for passes and runs under balls in the air.
    #[must_use]
    pub fn catcher() -> Self {
        Self::new("catcher")
            .on(TriggerKind::BallLoose, Reaction::Always(ObjectivePolicy::SeekLooseBall))
            .on(
                TriggerKind::BallHeld,
                Reaction::ByRelation {
                    holder: ObjectivePolicy::RunToGoal,
                    teammate: ObjectivePolicy::FindSpace,
                    opponent: ObjectivePolicy::TackleCarrier,
                },
            )
            .on(TriggerKind::BallFlying, Reaction::Always(ObjectivePolicy::ChaseLanding))
    }
}

//! The field: owner of every player, the ball, the triggers and the move log.
//!
//! A [`Field`] is built from a validated [`FieldConfig`] and a seed, players
//! are added with [`Field::register`], and the run is driven by
//! [`Field::tick`] or [`Field::run`] (see [`crate::simulation`]).
//!
//! # Determinism
//!
//! Players live in a `BTreeMap` keyed by [`PlayerId`], and ids are handed out
//! in registration order starting at 1, so every pass over the roster visits
//! players in the same order. All randomness comes from one `ChaCha8Rng`
//! seeded at construction. Two fields built with the same config, seed and
//! registrations produce identical move logs.
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
//! let mut field = Field::new(FieldConfig::default(), 42).unwrap();
//! let id = field
//!     .register(PlayerSpec::new(Team::Home, 9, Vec2::new(40.0, 25.0), PlayerStats::default(), Role::runner()))
//!     .unwrap();
//! assert_eq!(id.as_u64(), 1);
//! assert_eq!(field.headers().len(), 2); // the player and the ball
//! ```

use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::ball::Ball;
use crate::config::{FieldConfig, Tuning};
use crate::entity::{Player, PlayerId, PlayerSpec, Roster};
use crate::error::{Result, SimError};
use crate::geometry::Bounds;
use crate::output::{Headers, MoveLog, PlayerHeader, BALL_RECORD_ID};
use crate::trigger::Trigger;

/// The playing field and everything on it.
#[derive(Debug, Clone)]
pub struct Field {
    pub(crate) config: FieldConfig,
    pub(crate) bounds: Bounds,
    pub(crate) tuning: Tuning,
    pub(crate) roster: Roster,
    pub(crate) ball: Ball,
    /// One trigger per kind, in the order kinds were first subscribed.
    pub(crate) triggers: Vec<Trigger>,
    pub(crate) triggers_ready: bool,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) log: MoveLog,
    pub(crate) tick: u64,
    next_id: u64,
    seed: u64,
}

impl Field {
    /// Creates an empty field with default tuning and the ball loose at the centre.
    ///
    /// # Arguments
    ///
    /// * `config` - Dimensions and timing
    /// * `seed` - Seed for the field's random source
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] if the config is non-physical.
    pub fn new(config: FieldConfig, seed: u64) -> Result<Self> {
        Self::with_tuning(config, Tuning::default(), seed)
    }

    /// Creates an empty field with custom tuning.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] if the config or tuning is invalid.
    pub fn with_tuning(config: FieldConfig, tuning: Tuning, seed: u64) -> Result<Self> {
        config.validate()?;
        tuning.validate()?;
        let bounds = Bounds::new(config.width, config.height);
        Ok(Self {
            config,
            bounds,
            tuning,
            roster: Roster::new(),
            ball: Ball::new(bounds.center()),
            triggers: Vec::new(),
            triggers_ready: false,
            rng: ChaCha8Rng::seed_from_u64(seed),
            log: MoveLog::new(),
            tick: 0,
            next_id: 1,
            seed,
        })
    }

    /// Adds a player and subscribes its role's reactions.
    ///
    /// Ids are assigned sequentially from 1. A trigger is created the first
    /// time any player subscribes to its kind.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidPlayer`] for non-physical stats or a
    /// starting position off the field.
    pub fn register(&mut self, spec: PlayerSpec) -> Result<PlayerId> {
        if !self.bounds.contains(spec.position) {
            return Err(SimError::InvalidPlayer {
                field: "position",
                reason: format!(
                    "({}, {}) is outside the {}x{} field",
                    spec.position.x, spec.position.y, self.bounds.width, self.bounds.height
                ),
            });
        }
        let id = PlayerId::new(self.next_id);
        let player = Player::from_spec(id, &spec)?;
        self.next_id += 1;

        for (kind, reaction) in spec.role.reactions() {
            let index = match self.triggers.iter().position(|t| t.kind() == *kind) {
                Some(index) => index,
                None => {
                    self.triggers.push(Trigger::new(*kind));
                    self.triggers.len() - 1
                }
            };
            self.triggers[index].subscribe(id, *reaction);
        }
        // a late registration is picked up by the next initialization
        self.triggers_ready = false;

        tracing::debug!(%id, team = %player.team(), role = player.role(), "registered player");
        self.roster.insert(id, player);
        Ok(id)
    }

    /// Runs every trigger's initial evaluation.
    ///
    /// Called automatically before the first tick; calling it again is
    /// harmless since reactions only set policies.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownPlayer`] if a subscription is dangling.
    pub fn init_triggers(&mut self) -> Result<()> {
        for trigger in &self.triggers {
            trigger.init(&self.ball, &mut self.roster)?;
        }
        self.triggers_ready = true;
        Ok(())
    }

    /// Puts the ball loose on the ground at `at`, clamped onto the field.
    pub fn place_ball(&mut self, at: Vec2) {
        self.ball.drop_at(self.bounds.clamp(at));
    }

    /// Looks up a player.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownPlayer`] if `id` is not registered.
    pub fn player(&self, id: PlayerId) -> Result<&Player> {
        self.roster.get(&id).ok_or(SimError::UnknownPlayer(id))
    }

    /// Looks up a player for modification.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownPlayer`] if `id` is not registered.
    pub fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player> {
        self.roster.get_mut(&id).ok_or(SimError::UnknownPlayer(id))
    }

    /// All players in id order.
    pub fn players(&self) -> impl Iterator<Item = &Player> + '_ {
        self.roster.values()
    }

    /// The ball.
    #[must_use]
    pub const fn ball(&self) -> &Ball {
        &self.ball
    }

    /// Triggers in creation order.
    #[must_use]
    pub fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }

    /// Field configuration.
    #[must_use]
    pub const fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Engine constants.
    #[must_use]
    pub const fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Field bounds.
    #[must_use]
    pub const fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Seed the random source was built from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of ticks completed.
    #[must_use]
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Metadata for every id in the move log, including the ball under id 0.
    #[must_use]
    pub fn headers(&self) -> Headers {
        std::iter::once((BALL_RECORD_ID, PlayerHeader::ball()))
            .chain(self.roster.values().map(|p| (p.id().as_u64(), PlayerHeader::from(p))))
            .collect()
    }

    /// The move log so far.
    #[must_use]
    pub const fn move_log(&self) -> &MoveLog {
        &self.log
    }

    /// Consumes the field, returning its move log.
    #[must_use]
    pub fn into_log(self) -> MoveLog {
        self.log
    }
}

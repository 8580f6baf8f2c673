//! Entity types for the field simulation.
//!
//! This module provides the identity and state enums shared by every player:
//! - [`PlayerId`]: Unique identifier assigned at registration
//! - [`Team`]: Which end zone a player attacks
//! - [`Posture`]: Standing, or prone with a countdown
//! - [`IntentFlags`]: Per-player collision and catching intent
//! - [`Player`]: The complete player (see [`player`])
//!
//! # Example
//!
//! ```
//! use scrimmage_core::entity::{PlayerId, Team};
//!
//! let id = PlayerId::new(3);
//! assert_eq!(id.as_u64(), 3);
//! assert_eq!(Team::Home.direction(), 1.0);
//! assert_eq!(Team::Home.opponent(), Team::Away);
//! ```

pub mod player;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub use player::{Kinematics, Player, PlayerSpec, PlayerStats};

/// All registered players, iterated in id (registration) order.
pub type Roster = BTreeMap<PlayerId, Player>;

/// Unique identifier for a player.
///
/// Ids are handed out by [`Field::register`](crate::field::Field::register)
/// starting at 1, in registration order, and never reused. "No player" is
/// always spelled `Option<PlayerId>::None`.
///
/// # Ordering
///
/// Ids order by their numeric value, which is also registration order. The
/// roster iterates in this order.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(u64);

impl PlayerId {
    /// Creates a `PlayerId` from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlayerId({})", self.0)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<PlayerId> for u64 {
    fn from(id: PlayerId) -> Self {
        id.0
    }
}

/// Team membership, which also fixes the direction of attack.
///
/// - `Home` (+1) scores by carrying the ball to `x = width`
/// - `Away` (-1) scores by carrying the ball to `x = 0`
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    /// Attacks towards increasing x.
    Home,
    /// Attacks towards decreasing x.
    Away,
}

impl Team {
    /// +1.0 for home, -1.0 for away.
    #[must_use]
    pub const fn direction(self) -> f32 {
        match self {
            Self::Home => 1.0,
            Self::Away => -1.0,
        }
    }

    /// The other team.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Home => Self::Away,
            Self::Away => Self::Home,
        }
    }

    /// The x coordinate of the goal line this team attacks.
    #[must_use]
    pub fn attacking_goal_x(self, width: f32) -> f32 {
        match self {
            Self::Home => width,
            Self::Away => 0.0,
        }
    }

    /// Distance from `x` to the goal line this team attacks.
    #[must_use]
    pub fn distance_to_goal(self, x: f32, width: f32) -> f32 {
        (self.attacking_goal_x(width) - x).abs()
    }

    /// Distance from `x` to the goal line this team defends.
    #[must_use]
    pub fn distance_to_own_goal(self, x: f32, width: f32) -> f32 {
        (self.opponent().attacking_goal_x(width) - x).abs()
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => f.pad("Home"),
            Self::Away => f.pad("Away"),
        }
    }
}

/// Whether a player is on their feet.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Posture {
    /// Free to move, collide, pick up and catch.
    #[default]
    Standing,
    /// Knocked down. Stands again on the first tick that starts with the
    /// countdown at zero.
    Prone {
        /// Ticks left before the player may stand.
        ticks_remaining: u32,
    },
}

impl Posture {
    /// True when standing.
    #[must_use]
    pub const fn is_standing(self) -> bool {
        matches!(self, Self::Standing)
    }
}

bitflags! {
    /// Intent flags that shape how a player is treated in contact and flight.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct IntentFlags: u8 {
        /// Contest contact with opponents instead of trying to slip past.
        const BLOCK = 1 << 0;
        /// Eligible to catch a ball in flight.
        const CATCH = 1 << 1;
    }
}

impl Default for IntentFlags {
    fn default() -> Self {
        Self::BLOCK | Self::CATCH
    }
}

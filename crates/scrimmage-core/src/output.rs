//! Move-log contract handed to renderers and persistence layers.
//!
//! Every tick appends one [`TickSnapshot`]: one [`MoveRecord`] per player in
//! roster order, followed by a record for the ball under the reserved id
//! [`BALL_RECORD_ID`]. Together with the [`PlayerHeader`] table this is
//! everything needed to replay a run visually.
//!
//! All types serialize with serde; the log is meant to be dumped as JSON.
//!
//! # Example
//!
//! ```
//! use scrimmage_core::output::{MoveRecord, BALL_RECORD_ID};
//!
//! let record = MoveRecord {
//!     id: BALL_RECORD_ID,
//!     x: 50.0,
//!     y: 25.0,
//!     heading: 0.0,
//!     has_ball: false,
//!     standing: true,
//! };
//! let json = serde_json::to_string(&record).unwrap();
//! assert!(json.contains("\"id\":0"));
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ball::Ball;
use crate::entity::{Player, Team};

/// Id used for the ball's record in every snapshot. Player ids start at 1.
pub const BALL_RECORD_ID: u64 = 0;

// =============================================================================
// Records
// =============================================================================

/// Where one entity was at the end of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Player id, or [`BALL_RECORD_ID`] for the ball.
    pub id: u64,
    /// X position.
    pub x: f32,
    /// Y position.
    pub y: f32,
    /// Heading in radians. Always 0 for the ball.
    pub heading: f32,
    /// For a player, whether they carry the ball. For the ball, whether anyone does.
    pub has_ball: bool,
    /// Whether the player is on their feet. Always true for the ball.
    pub standing: bool,
}

impl MoveRecord {
    /// Record for a player.
    #[must_use]
    pub fn player(player: &Player, has_ball: bool) -> Self {
        Self {
            id: player.id().as_u64(),
            x: player.position.x,
            y: player.position.y,
            heading: player.heading,
            has_ball,
            standing: player.is_standing(),
        }
    }

    /// Record for the ball.
    #[must_use]
    pub fn ball(ball: &Ball) -> Self {
        Self {
            id: BALL_RECORD_ID,
            x: ball.position.x,
            y: ball.position.y,
            heading: 0.0,
            has_ball: ball.carrier().is_some(),
            standing: true,
        }
    }
}

/// All records for one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickSnapshot {
    /// Tick number, starting at 0.
    pub tick: u64,
    /// Players in roster order, then the ball.
    pub records: Vec<MoveRecord>,
}

impl TickSnapshot {
    /// The ball's record (always last).
    #[must_use]
    pub fn ball(&self) -> Option<&MoveRecord> {
        self.records.last().filter(|r| r.id == BALL_RECORD_ID)
    }

    /// Player records only.
    pub fn players(&self) -> impl Iterator<Item = &MoveRecord> {
        self.records.iter().filter(|r| r.id != BALL_RECORD_ID)
    }
}

/// Metadata for one id in the move log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerHeader {
    /// Player id, or [`BALL_RECORD_ID`].
    pub id: u64,
    /// Team; `None` for the ball.
    pub team: Option<Team>,
    /// Shirt number; 0 for the ball.
    pub jersey: u32,
    /// Role label; `"ball"` for the ball.
    pub role: String,
}

impl PlayerHeader {
    /// Header entry for the ball.
    #[must_use]
    pub fn ball() -> Self {
        Self {
            id: BALL_RECORD_ID,
            team: None,
            jersey: 0,
            role: "ball".to_string(),
        }
    }
}

impl From<&Player> for PlayerHeader {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id().as_u64(),
            team: Some(player.team()),
            jersey: player.jersey(),
            role: player.role().to_string(),
        }
    }
}

/// Id-ordered header table.
pub type Headers = BTreeMap<u64, PlayerHeader>;

// =============================================================================
// Move Log
// =============================================================================

/// Append-only sequence of tick snapshots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveLog {
    ticks: Vec<TickSnapshot>,
}

impl MoveLog {
    /// An empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self { ticks: Vec::new() }
    }

    pub(crate) fn push(&mut self, snapshot: TickSnapshot) {
        self.ticks.push(snapshot);
    }

    /// Snapshots in tick order.
    #[must_use]
    pub fn ticks(&self) -> &[TickSnapshot] {
        &self.ticks
    }

    /// Number of snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    /// True if nothing has been logged yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    /// The most recent snapshot.
    #[must_use]
    pub fn last(&self) -> Option<&TickSnapshot> {
        self.ticks.last()
    }
}

//! # Scrimmage Core
//!
//! Deterministic discrete-time simulation of a two-team field sport.
//!
//! Players run, block, tackle, pick up, carry and throw a single ball on a
//! rectangular field. Each player's behavior is an objective policy that
//! ball-state triggers swap out as possession changes. Every tick appends
//! one snapshot of positions to a move log for replay or rendering.
//!
//! ## Architecture
//!
//! - **Field**: owns the roster, the ball, triggers and the random source
//! - **Policies**: turn the current scene into an objective point per player
//! - **Resolvers**: settle contact between overlapping players
//! - **Output**: per-tick move records plus a header table
//!
//! ## Usage
//!
//! ```
//! use glam::Vec2;
//! use scrimmage_core::{Field, FieldConfig, PlayerSpec, PlayerStats, Role, Team};
//!
//! let mut field = Field::new(FieldConfig::default(), 1234)?;
//! field.register(PlayerSpec::new(Team::Home, 7, Vec2::new(40.0, 25.0), PlayerStats::default(), Role::runner()))?;
//! field.register(PlayerSpec::new(Team::Away, 4, Vec2::new(60.0, 25.0), PlayerStats::default(), Role::bruiser()))?;
//!
//! let summary = field.run()?;
//! assert!(summary.ticks > 0);
//! let json = serde_json::to_string(field.move_log())?;
//! assert!(json.starts_with('{'));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ball;
pub mod config;
pub mod entity;
pub mod error;
pub mod field;
pub mod geometry;
pub mod hazard;
pub mod optimize;
pub mod output;
pub mod policy;
pub mod resolver;
pub mod roles;
pub mod simulation;
pub mod trigger;

pub use ball::{Ball, BallState};
pub use config::{FieldConfig, Tuning};
pub use entity::{Player, PlayerId, PlayerSpec, PlayerStats, Team};
pub use error::{Result, SimError};
pub use field::Field;
pub use output::{MoveLog, MoveRecord, TickSnapshot};
pub use policy::ObjectivePolicy;
pub use roles::Role;
pub use simulation::{RunSummary, TickStatus};

#[cfg(test)]
mod tests;

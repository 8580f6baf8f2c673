//! Builders shared by the scenario tests.

use glam::Vec2;

use crate::config::FieldConfig;
use crate::entity::{PlayerId, PlayerSpec, PlayerStats, Team};
use crate::field::Field;
use crate::output::{MoveLog, TickSnapshot};
use crate::roles::Role;

/// An empty 100x50 field with a 50 second budget at `dt = 0.1`.
pub fn empty_field(seed: u64) -> Field {
    Field::new(FieldConfig::default(), seed).unwrap()
}

/// Registers a player with default stats.
pub fn spawn(field: &mut Field, team: Team, at: Vec2, role: Role) -> PlayerId {
    spawn_with(field, team, at, PlayerStats::default(), role)
}

/// Registers a player with custom stats.
pub fn spawn_with(field: &mut Field, team: Team, at: Vec2, stats: PlayerStats, role: Role) -> PlayerId {
    let jersey = u32::try_from(field.players().count() + 1).unwrap();
    field
        .register(PlayerSpec::new(team, jersey, at, stats, role))
        .unwrap()
}

/// Eight players, one of each stock role per side, with the ball loose
/// in the home half.
///
/// Home lines up at x = 40, away at x = 90, and the ball sits at (30, 25).
pub fn sandbox_field(seed: u64, duration: f32) -> Field {
    let mut field = Field::new(FieldConfig::new(100.0, 50.0, duration, 0.1), seed).unwrap();
    let lineup = [
        (10.0, Role::thrower()),
        (20.0, Role::runner()),
        (30.0, Role::bruiser()),
        (40.0, Role::catcher()),
    ];
    for (team, x) in [(Team::Home, 40.0), (Team::Away, 90.0)] {
        for (y, role) in &lineup {
            spawn(&mut field, team, Vec2::new(x, *y), role.clone());
        }
    }
    field.place_ball(Vec2::new(30.0, 25.0));
    field
}

/// Runs a sandbox to completion and returns its log.
pub fn sandbox_log(seed: u64, duration: f32) -> MoveLog {
    let mut field = sandbox_field(seed, duration);
    field.run().unwrap();
    field.into_log()
}

/// Number of player records flagged as carrying the ball.
pub fn carriers_in(snapshot: &TickSnapshot) -> usize {
    snapshot.players().filter(|r| r.has_ball).count()
}

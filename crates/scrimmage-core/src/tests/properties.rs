//! Invariants checked over randomly generated rosters and seeds.

use glam::Vec2;
use proptest::prelude::*;

use crate::config::FieldConfig;
use crate::entity::Team;
use crate::field::Field;
use crate::roles::Role;

use super::helpers::{carriers_in, spawn};

fn role_strategy() -> impl Strategy<Value = Role> {
    prop_oneof![
        Just(Role::idle()),
        Just(Role::runner()),
        Just(Role::thrower()),
        Just(Role::bruiser()),
        Just(Role::catcher()),
    ]
}

fn player_strategy() -> impl Strategy<Value = (bool, f32, f32, Role)> {
    (any::<bool>(), 0.0_f32..=60.0, 0.0_f32..=30.0, role_strategy())
}

/// A 60x30 field for two seconds of play.
fn random_field(seed: u64, players: Vec<(bool, f32, f32, Role)>, ball: (f32, f32)) -> Field {
    let mut field = Field::new(FieldConfig::new(60.0, 30.0, 2.0, 0.1), seed).unwrap();
    for (home, x, y, role) in players {
        let team = if home { Team::Home } else { Team::Away };
        spawn(&mut field, team, Vec2::new(x, y), role);
    }
    field.place_ball(Vec2::new(ball.0, ball.1));
    field
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn everything_stays_on_the_field(
        seed in any::<u64>(),
        players in prop::collection::vec(player_strategy(), 1..8),
        ball in (0.0_f32..=60.0, 0.0_f32..=30.0),
    ) {
        let mut field = random_field(seed, players, ball);
        field.run().unwrap();
        for snapshot in field.move_log().ticks() {
            for record in &snapshot.records {
                prop_assert!((0.0..=60.0).contains(&record.x), "x = {}", record.x);
                prop_assert!((0.0..=30.0).contains(&record.y), "y = {}", record.y);
            }
        }
    }

    #[test]
    fn at_most_one_carrier(
        seed in any::<u64>(),
        players in prop::collection::vec(player_strategy(), 2..8),
        ball in (0.0_f32..=60.0, 0.0_f32..=30.0),
    ) {
        let mut field = random_field(seed, players, ball);
        field.run().unwrap();
        for snapshot in field.move_log().ticks() {
            let carriers = carriers_in(snapshot);
            prop_assert!(carriers <= 1);
            let ball_held = snapshot.ball().is_some_and(|b| b.has_ball);
            prop_assert_eq!(ball_held, carriers == 1);
        }
    }
}

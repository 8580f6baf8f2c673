//! Stochastic duels: tackles and blocks.
//!
//! Both duels share one roll. With strengths `S_a` and `S_b`, player `a` wins
//! when a uniform draw in `[0, 1)` falls below
//!
//! ```text
//! p = odds / (1 + odds),  odds = S_a / S_b
//! ```
//!
//! # Tackles
//!
//! When one of the pair carries the ball, the other is the tackler. A
//! successful tackle puts the carrier down and scatters the ball loose; a
//! failed one puts the tackler down.
//!
//! # Blocks
//!
//! Between two opponents without the ball, a block happens if either wants
//! to block. A roll within the draw band around `p` is a close contest: a
//! second roll may knock both down, otherwise the loser is shoved back a
//! short way. Outside the band the loser goes down.

use std::f32::consts::PI;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Collision, ContactOutcome, ContactScene, Resolver};
use crate::entity::PlayerId;

/// What a block did to the players involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockResult {
    /// The loser was knocked down.
    Knockdown,
    /// Close contest; the loser was pushed back.
    PushBack,
    /// Close contest; both went down.
    Mutual,
}

/// Resolver for tackles and blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuelResolver;

impl DuelResolver {
    /// Creates a new duel resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Win probability of strength `attacker` against strength `defender`.
    ///
    /// # Example
    ///
    /// ```
    /// use scrimmage_core::resolver::DuelResolver;
    ///
    /// assert!((DuelResolver::win_probability(1.0, 1.0) - 0.5).abs() < 1e-6);
    /// assert!((DuelResolver::win_probability(3.0, 1.0) - 0.75).abs() < 1e-6);
    /// ```
    #[must_use]
    pub fn win_probability(attacker: f32, defender: f32) -> f32 {
        let odds = attacker / defender;
        odds / (1.0 + odds)
    }

    fn tackle(tackler: PlayerId, carrier: PlayerId, scene: &mut ContactScene<'_>) -> ContactOutcome {
        let (Some(t), Some(c)) = (scene.roster.get(&tackler), scene.roster.get(&carrier)) else {
            return ContactOutcome::Skipped;
        };
        let p = Self::win_probability(t.stats().strength, c.stats().strength);
        let success = scene.rng.gen::<f32>() < p;
        let down = if success { carrier } else { tackler };
        if let Some(player) = scene.roster.get_mut(&down) {
            player.knock_down(scene.tuning.prone_ticks);
        }
        if success {
            scene.ball.scatter(scene.tuning.scatter_distance, &mut *scene.rng, scene.bounds);
        }
        tracing::debug!(%tackler, %carrier, success, p, "tackle");
        ContactOutcome::Tackle {
            tackler,
            carrier,
            success,
        }
    }

    fn block(a: PlayerId, b: PlayerId, scene: &mut ContactScene<'_>) -> ContactOutcome {
        let (Some(pa), Some(pb)) = (scene.roster.get(&a), scene.roster.get(&b)) else {
            return ContactOutcome::Skipped;
        };
        let p = Self::win_probability(pa.stats().strength, pb.stats().strength);
        let roll = scene.rng.gen::<f32>();
        let (winner, loser) = if roll < p { (a, b) } else { (b, a) };
        let tuning = scene.tuning;

        let result = if (roll - p).abs() < tuning.block_draw_band {
            if scene.rng.gen::<f32>() < tuning.mutual_knockdown_chance {
                for id in [a, b] {
                    if let Some(player) = scene.roster.get_mut(&id) {
                        player.knock_down(tuning.prone_ticks);
                    }
                }
                BlockResult::Mutual
            } else {
                if let Some(player) = scene.roster.get_mut(&loser) {
                    let back = player.heading + PI;
                    player.displace(back, tuning.push_back_distance, scene.bounds);
                }
                BlockResult::PushBack
            }
        } else {
            if let Some(player) = scene.roster.get_mut(&loser) {
                player.knock_down(tuning.prone_ticks);
            }
            BlockResult::Knockdown
        };
        tracing::debug!(%winner, %loser, ?result, p, roll, "block");
        ContactOutcome::Block { winner, loser, result }
    }
}

impl Resolver for DuelResolver {
    fn resolve(&self, collision: &Collision, scene: &mut ContactScene<'_>) -> ContactOutcome {
        let (Some(a), Some(b)) = (scene.roster.get(&collision.a), scene.roster.get(&collision.b)) else {
            return ContactOutcome::Skipped;
        };
        if !(a.is_standing() && b.is_standing()) {
            return ContactOutcome::Skipped;
        }
        if a.team() == b.team() {
            return ContactOutcome::SameTeam;
        }
        let carrier = scene.ball.carrier();
        if carrier == Some(a.id()) {
            return Self::tackle(b.id(), a.id(), scene);
        }
        if carrier == Some(b.id()) {
            return Self::tackle(a.id(), b.id(), scene);
        }
        if a.wants_to_block() || b.wants_to_block() {
            return Self::block(collision.a, collision.b, scene);
        }
        ContactOutcome::PassThrough
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ball::Ball;
    use crate::config::Tuning;
    use crate::entity::{IntentFlags, Player, PlayerSpec, PlayerStats, Roster, Team};
    use crate::geometry::Bounds;
    use crate::resolver::detect_collisions;
    use crate::roles::Role;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    struct Pitch {
        roster: Roster,
        ball: Ball,
        bounds: Bounds,
        tuning: Tuning,
        rng: ChaCha8Rng,
    }

    impl Pitch {
        fn pair(strength_a: f32, team_b: Team, strength_b: f32, seed: u64) -> Self {
            let make = |n: u64, team: Team, x: f32, strength: f32| {
                let id = PlayerId::new(n);
                let stats = PlayerStats {
                    strength,
                    ..PlayerStats::default()
                };
                let spec = PlayerSpec::new(team, 1, Vec2::new(x, 25.0), stats, Role::idle());
                (id, Player::from_spec(id, &spec).unwrap())
            };
            let roster = [make(1, Team::Home, 50.0, strength_a), make(2, team_b, 51.0, strength_b)]
                .into_iter()
                .collect();
            Self {
                roster,
                ball: Ball::new(Vec2::new(10.0, 10.0)),
                bounds: Bounds::new(100.0, 50.0),
                tuning: Tuning::default(),
                rng: ChaCha8Rng::seed_from_u64(seed),
            }
        }

        fn resolve(&mut self) -> ContactOutcome {
            let collision = detect_collisions(&self.roster)[0];
            let mut scene = ContactScene {
                roster: &mut self.roster,
                ball: &mut self.ball,
                bounds: &self.bounds,
                tuning: &self.tuning,
                rng: &mut self.rng,
            };
            DuelResolver::new().resolve(&collision, &mut scene)
        }

        fn player(&self, n: u64) -> &Player {
            &self.roster[&PlayerId::new(n)]
        }
    }

    mod tackle_tests {
        use super::*;

        #[test]
        fn winner_and_loser_postures() {
            for seed in 0..20 {
                let mut pitch = Pitch::pair(1.0, Team::Away, 1.0, seed);
                pitch.ball.give_to(PlayerId::new(1), Vec2::new(50.0, 25.0));
                match pitch.resolve() {
                    ContactOutcome::Tackle {
                        tackler,
                        carrier,
                        success,
                    } => {
                        assert_eq!(tackler, PlayerId::new(2));
                        assert_eq!(carrier, PlayerId::new(1));
                        if success {
                            assert!(!pitch.player(1).is_standing());
                            assert!(pitch.player(2).is_standing());
                            assert!(pitch.ball.is_loose());
                        } else {
                            assert!(pitch.player(1).is_standing());
                            assert!(!pitch.player(2).is_standing());
                            assert_eq!(pitch.ball.carrier(), Some(PlayerId::new(1)));
                        }
                    }
                    other => panic!("expected tackle, got {other:?}"),
                }
            }
        }

        #[test]
        fn frequency_matches_strength_odds() {
            let trials = 4000;
            let mut wins = 0;
            for seed in 0..trials {
                // tackler (id 1) is three times as strong as the carrier
                let mut pitch = Pitch::pair(3.0, Team::Away, 1.0, seed);
                pitch.ball.give_to(PlayerId::new(2), Vec2::new(51.0, 25.0));
                if let ContactOutcome::Tackle { success: true, .. } = pitch.resolve() {
                    wins += 1;
                }
            }
            let freq = f64::from(wins) / trials as f64;
            assert!((freq - 0.75).abs() < 0.03, "freq {freq}");
        }
    }

    mod block_tests {
        use super::*;

        #[test]
        fn teammates_do_nothing() {
            let mut pitch = Pitch::pair(1.0, Team::Home, 1.0, 3);
            assert_eq!(pitch.resolve(), ContactOutcome::SameTeam);
            assert!(pitch.player(1).is_standing() && pitch.player(2).is_standing());
        }

        #[test]
        fn evaders_pass_through() {
            let mut pitch = Pitch::pair(1.0, Team::Away, 1.0, 3);
            for n in 1..=2 {
                pitch
                    .roster
                    .get_mut(&PlayerId::new(n))
                    .unwrap()
                    .set_intent(IntentFlags::BLOCK, false);
            }
            assert_eq!(pitch.resolve(), ContactOutcome::PassThrough);
        }

        #[test]
        fn block_outcomes_are_consistent() {
            let mut seen_knockdown = false;
            for seed in 0..200 {
                let mut pitch = Pitch::pair(1.0, Team::Away, 1.0, seed);
                let before = pitch.roster.clone();
                let ContactOutcome::Block { winner, loser, result } = pitch.resolve() else {
                    panic!("expected block");
                };
                assert_ne!(winner, loser);
                match result {
                    BlockResult::Knockdown => {
                        seen_knockdown = true;
                        assert!(!pitch.player(loser.as_u64()).is_standing());
                        assert!(pitch.player(winner.as_u64()).is_standing());
                    }
                    BlockResult::PushBack => {
                        let moved = pitch.player(loser.as_u64()).position;
                        let was = before[&loser].position;
                        assert!((moved.distance(was) - pitch.tuning.push_back_distance).abs() < 1e-4);
                        assert!(pitch.player(loser.as_u64()).is_standing());
                    }
                    BlockResult::Mutual => {
                        assert!(!pitch.player(1).is_standing() && !pitch.player(2).is_standing());
                    }
                }
            }
            assert!(seen_knockdown);
        }

        #[test]
        fn prone_pair_is_skipped() {
            let mut pitch = Pitch::pair(1.0, Team::Away, 1.0, 3);
            let collision = detect_collisions(&pitch.roster)[0];
            pitch.roster.get_mut(&PlayerId::new(2)).unwrap().knock_down(2);
            let mut scene = ContactScene {
                roster: &mut pitch.roster,
                ball: &mut pitch.ball,
                bounds: &pitch.bounds,
                tuning: &pitch.tuning,
                rng: &mut pitch.rng,
            };
            assert_eq!(DuelResolver::new().resolve(&collision, &mut scene), ContactOutcome::Skipped);
        }
    }
}

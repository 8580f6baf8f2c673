//! Runs one possession with a stock eight-player roster and prints a summary.
//!
//! ```text
//! cargo run --example sandbox -- [seed]
//! ```

use anyhow::Context;
use glam::Vec2;
use scrimmage_core::{Field, FieldConfig, PlayerSpec, PlayerStats, Role, Team, TickStatus};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    let seed = match std::env::args().nth(1) {
        Some(arg) => arg.parse().with_context(|| format!("invalid seed {arg:?}"))?,
        None => 0,
    };

    let mut field = Field::new(FieldConfig::new(100.0, 50.0, 50.0, 0.1), seed)?;
    let lineup = [
        (10.0, Role::thrower()),
        (20.0, Role::runner()),
        (30.0, Role::bruiser()),
        (40.0, Role::catcher()),
    ];
    for (team, x) in [(Team::Home, 40.0), (Team::Away, 90.0)] {
        for (jersey, (y, role)) in (1..).zip(&lineup) {
            let heading = if team == Team::Home { 0.0 } else { std::f32::consts::PI };
            let spec = PlayerSpec::new(team, jersey, Vec2::new(x, *y), PlayerStats::default(), role.clone())
                .with_heading(heading);
            field.register(spec)?;
        }
    }
    field.place_ball(Vec2::new(30.0, 25.0));

    let summary = field.run()?;
    match summary.status {
        TickStatus::Touchdown { carrier, team } => {
            println!("touchdown for {team} by player {carrier} after {} ticks", summary.ticks);
        }
        TickStatus::OwnEndZone { carrier, team } => {
            println!("{team} player {carrier} was caught in their own end zone after {} ticks", summary.ticks);
        }
        TickStatus::Running => println!("time ran out after {} ticks", summary.ticks),
    }

    let ball = field.ball();
    println!("ball at ({:.1}, {:.1}), {:?}", ball.position.x, ball.position.y, ball.state());
    for player in field.players() {
        println!(
            "  #{:<2} {:<4} {:<8} ({:5.1}, {:5.1}) {}",
            player.jersey(),
            player.team(),
            player.role(),
            player.position.x,
            player.position.y,
            if player.is_standing() { "standing" } else { "down" },
        );
    }

    let log = serde_json::to_string(field.move_log()).context("serializing move log")?;
    println!("move log: {} snapshots, {} bytes of JSON", field.move_log().len(), log.len());
    Ok(())
}

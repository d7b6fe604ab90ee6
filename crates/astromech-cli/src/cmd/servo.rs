use super::Session;
use crate::output::{print_json, print_table};
use anyhow::Context;
use astromech_core::dashboard::{Dashboard, SERVO_WARNING};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum ServoSubcommand {
    /// List servos with their angle ranges
    List,
    /// Move a servo to an angle in degrees
    Move {
        /// Servo name, e.g. "Dome Rotation"
        name: String,
        #[arg(allow_negative_numbers = true)]
        angle: f64,
    },
}

pub fn run(session: &Session, subcmd: ServoSubcommand) -> anyhow::Result<()> {
    match subcmd {
        ServoSubcommand::List => list(session),
        ServoSubcommand::Move { name, angle } => move_servo(session, &name, angle),
    }
}

fn list(session: &Session) -> anyhow::Result<()> {
    let servos = session.client()?.servos().context(SERVO_WARNING)?;
    if session.json {
        return print_json(&servos);
    }
    if servos.is_empty() {
        println!("No servos reported.");
        return Ok(());
    }
    let rows = servos
        .values()
        .map(|s| {
            vec![
                s.name.clone(),
                s.controller_id.clone(),
                s.channel.to_string(),
                format!("{}..{}", s.min_angle, s.max_angle),
                s.description.clone(),
            ]
        })
        .collect();
    print_table(
        &["NAME", "CONTROLLER", "CHANNEL", "RANGE", "DESCRIPTION"],
        rows,
    );
    Ok(())
}

fn move_servo(session: &Session, name: &str, angle: f64) -> anyhow::Result<()> {
    let cfg = session.config()?;
    let client = session.client()?;
    // Loads the inventory so the angle is range-checked before sending.
    let mut dashboard = Dashboard::initialize(&client, cfg.items_per_page());
    dashboard.move_servo(&client, name, angle)?;

    if session.json {
        return print_json(&serde_json::json!({ "servo": name, "angle": angle }));
    }
    println!("Moved {name} to {angle}°");
    Ok(())
}

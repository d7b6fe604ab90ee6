use super::{ScriptSource, Session};
use crate::output::print_json;
use astromech_core::{runner, script};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum ScriptSubcommand {
    /// Pretty-print a script with two-space indentation
    Format {
        #[command(flatten)]
        source: ScriptSource,
    },
    /// Check a script's shape and list its actions
    Validate {
        #[command(flatten)]
        source: ScriptSource,
    },
    /// Validate a script and send it to the droid
    Run {
        #[command(flatten)]
        source: ScriptSource,
    },
}

pub fn run(session: &Session, subcmd: ScriptSubcommand) -> anyhow::Result<()> {
    match subcmd {
        ScriptSubcommand::Format { source } => {
            let formatted = script::format(&source.read()?)?;
            println!("{formatted}");
            Ok(())
        }
        ScriptSubcommand::Validate { source } => validate(&source.read()?, session.json),
        ScriptSubcommand::Run { source } => {
            let text = source.read()?;
            let client = session.client()?;
            let sent = runner::run(&client, &text)?;
            if session.json {
                return print_json(&serde_json::json!({ "commands": sent.len() }));
            }
            println!("Sent script ({} commands)", sent.len());
            Ok(())
        }
    }
}

fn validate(text: &str, json: bool) -> anyhow::Result<()> {
    let parsed = script::parse_and_validate(text)?;
    if json {
        let actions: Vec<String> = parsed.actions().map(ToString::to_string).collect();
        return print_json(&serde_json::json!({
            "valid": true,
            "commands": parsed.len(),
            "actions": actions,
        }));
    }
    println!("Script is valid: {} commands", parsed.len());
    for (i, command) in parsed.commands().iter().enumerate() {
        if command.is_empty() {
            println!("  {i}: (no action)");
            continue;
        }
        let actions: Vec<String> = command.actions.iter().map(ToString::to_string).collect();
        println!("  {i}: {}", actions.join(", "));
    }
    Ok(())
}

use super::Session;
use crate::output::print_json;
use anyhow::Context;
use astromech_core::config::WarnLevel;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the effective configuration (after --url)
    Show,

    /// Validate the config for common mistakes
    Validate,
}

pub fn run(session: &Session, subcmd: ConfigSubcommand) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(session),
        ConfigSubcommand::Validate => validate(session),
    }
}

fn show(session: &Session) -> anyhow::Result<()> {
    let config = session.config()?;
    if session.json {
        return print_json(&config);
    }
    let yaml = serde_yaml::to_string(&config).context("failed to render config")?;
    print!("{yaml}");
    Ok(())
}

fn validate(session: &Session) -> anyhow::Result<()> {
    let config = session.config()?;
    let warnings = config.validate();

    if session.json {
        let value = serde_json::json!({
            "warnings": warnings,
        });
        print_json(&value)?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }
    Ok(())
}

use super::Session;
use anyhow::Context;
use astromech_core::{config::Config, console::Console, paths, storage::Storage};

pub fn run(session: &Session) -> anyhow::Result<()> {
    let root = &session.root;
    println!("Initializing astromech in: {}", root.display());

    let storage_dir = paths::storage_dir(root);
    std::fs::create_dir_all(&storage_dir)
        .with_context(|| format!("failed to create {}", storage_dir.display()))?;

    if !paths::config_path(root).exists() {
        Config::default()
            .save(root)
            .context("failed to write config.yaml")?;
        println!("  created: {}", paths::CONFIG_FILE);
    } else {
        println!("  exists:  {}", paths::CONFIG_FILE);
    }

    // Opening the store seeds the default routine on first use.
    let console = Console::open(Storage::open(root));
    if let Some(notice) = console.error() {
        anyhow::bail!("{notice}");
    }
    println!("  routines: {}", console.routines().len());

    Ok(())
}

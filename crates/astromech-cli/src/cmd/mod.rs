pub mod audio;
pub mod config;
pub mod init;
pub mod routine;
pub mod script;
pub mod servo;
pub mod status;

use anyhow::Context;
use astromech_core::{client::BackendClient, config::Config};
use clap::Args;
use std::io::Read;
use std::path::PathBuf;

/// Per-invocation context shared by every subcommand.
pub struct Session {
    pub root: PathBuf,
    pub url: Option<String>,
    pub json: bool,
}

impl Session {
    pub fn new(root: PathBuf, url: Option<String>, json: bool) -> Self {
        Self { root, url, json }
    }

    /// `config.yaml` with the `--url` override applied.
    pub fn config(&self) -> anyhow::Result<Config> {
        let mut cfg = Config::load(&self.root).context("failed to load config")?;
        if let Some(url) = &self.url {
            cfg.backend.base_url = url.clone();
        }
        Ok(cfg)
    }

    pub fn client(&self) -> anyhow::Result<BackendClient> {
        let cfg = self.config()?;
        Ok(BackendClient::from_config(&cfg.backend)?)
    }
}

/// Where script text comes from: the positional argument, `--file`, or stdin.
#[derive(Args)]
pub struct ScriptSource {
    /// Script JSON (read from stdin when omitted)
    pub script: Option<String>,

    /// Read the script from a file
    #[arg(long, short = 'f', conflicts_with = "script")]
    pub file: Option<PathBuf>,
}

impl ScriptSource {
    pub fn read(self) -> anyhow::Result<String> {
        if let Some(text) = self.script {
            return Ok(text);
        }
        if let Some(path) = self.file {
            return std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()));
        }
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read script from stdin")?;
        Ok(text)
    }
}

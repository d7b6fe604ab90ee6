mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    audio::AudioSubcommand, config::ConfigSubcommand, routine::RoutineSubcommand,
    script::ScriptSubcommand, servo::ServoSubcommand, Session,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "astromech",
    about = "Astromech control panel: script routines, drive servos, play sounds",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .astromech/)
    #[arg(long, global = true, env = "ASTROMECH_ROOT")]
    root: Option<PathBuf>,

    /// Backend base URL (overrides backend.base_url in config.yaml)
    #[arg(long, global = true, env = "ASTROMECH_URL")]
    url: Option<String>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create .astromech/ with a default config and the seeded routine
    Init,

    /// Manage saved routines
    Routine {
        #[command(subcommand)]
        subcommand: RoutineSubcommand,
    },

    /// Format, validate or run a script without saving it
    Script {
        #[command(subcommand)]
        subcommand: ScriptSubcommand,
    },

    /// Fetch servos, controllers and audio and report connection status
    Status,

    /// List or move servos
    Servo {
        #[command(subcommand)]
        subcommand: ServoSubcommand,
    },

    /// Browse and play the audio library
    Audio {
        #[command(subcommand)]
        subcommand: AudioSubcommand,
    },

    /// Show or validate the configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    // RUST_LOG replaces the default outright, including its bare level.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    let session = Session::new(root, cli.url, cli.json);

    let result = match cli.command {
        Commands::Init => cmd::init::run(&session),
        Commands::Routine { subcommand } => cmd::routine::run(&session, subcommand),
        Commands::Script { subcommand } => cmd::script::run(&session, subcommand),
        Commands::Status => cmd::status::run(&session),
        Commands::Servo { subcommand } => cmd::servo::run(&session, subcommand),
        Commands::Audio { subcommand } => cmd::audio::run(&session, subcommand),
        Commands::Config { subcommand } => cmd::config::run(&session, subcommand),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

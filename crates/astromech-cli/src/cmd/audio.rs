use super::Session;
use crate::output::{print_json, print_table};
use astromech_core::dashboard::{Dashboard, AUDIO_WARNING};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum AudioSubcommand {
    /// List one page of the audio library
    List {
        /// Page number, starting at 1 (clamped to the last page)
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Play an audio file on the droid
    Play { filename: String },
}

pub fn run(session: &Session, subcmd: AudioSubcommand) -> anyhow::Result<()> {
    match subcmd {
        AudioSubcommand::List { page } => list(session, page),
        AudioSubcommand::Play { filename } => play(session, &filename),
    }
}

fn list(session: &Session, page: usize) -> anyhow::Result<()> {
    let cfg = session.config()?;
    let client = session.client()?;
    let mut dashboard = Dashboard::initialize(&client, cfg.items_per_page());
    if !dashboard.status.audio {
        anyhow::bail!(AUDIO_WARNING);
    }
    dashboard.go_to_audio_page(page);

    let total = dashboard.audio_files.len();
    let pager = *dashboard.pager();
    if session.json {
        return print_json(&serde_json::json!({
            "page": pager.page(),
            "pages": pager.page_count(total),
            "total": total,
            "files": dashboard.audio_page(),
        }));
    }

    let rows = dashboard
        .audio_page()
        .iter()
        .map(|f| vec![f.name.clone(), f.path.clone()])
        .collect();
    print_table(&["NAME", "PATH"], rows);
    println!();
    println!("{}  ({})", pager.summary(total), pager.label(total));
    Ok(())
}

fn play(session: &Session, filename: &str) -> anyhow::Result<()> {
    let cfg = session.config()?;
    let client = session.client()?;
    let mut dashboard = Dashboard::new(cfg.items_per_page());
    dashboard.play_audio(&client, filename)?;

    if session.json {
        return print_json(&serde_json::json!({ "played": filename }));
    }
    println!("Playing {filename}");
    Ok(())
}

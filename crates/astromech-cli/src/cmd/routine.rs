use super::{ScriptSource, Session};
use crate::output::{print_json, print_notice, print_table};
use anyhow::Context;
use astromech_core::{console::Console, paths, routine::Routine, script, storage::Storage};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum RoutineSubcommand {
    /// List saved routines
    List,
    /// Show one routine and its script
    Show { id: String },
    /// Validate a script and save it as a new routine
    Save {
        /// Routine name
        #[arg(long, default_value = "")]
        name: String,
        #[command(flatten)]
        source: ScriptSource,
    },
    /// Delete a routine (unknown ids are ignored)
    Delete { id: String },
    /// Save a copy of an existing routine, named "<name> (Copy)" by default
    Copy {
        id: String,
        /// Name for the copy
        #[arg(long)]
        name: Option<String>,
    },
    /// Send a saved routine to the droid
    Run { id: String },
}

pub fn run(session: &Session, subcmd: RoutineSubcommand) -> anyhow::Result<()> {
    let mut console = open_console(session)?;
    match subcmd {
        RoutineSubcommand::List => list(&console, session.json),
        RoutineSubcommand::Show { id } => show(&console, &id, session.json),
        RoutineSubcommand::Save { name, source } => {
            console.routine_name = name;
            console.script_input = source.read()?;
            let routine = console.save()?;
            report_saved(&routine, session.json)
        }
        RoutineSubcommand::Delete { id } => delete(&mut console, &id, session.json),
        RoutineSubcommand::Copy { id, name } => {
            console.edit(&id)?;
            if let Some(name) = name {
                console.routine_name = name;
            }
            let routine = console.save()?;
            report_saved(&routine, session.json)
        }
        RoutineSubcommand::Run { id } => run_routine(session, &mut console, &id),
    }
}

fn open_console(session: &Session) -> anyhow::Result<Console> {
    paths::ensure_initialized(&session.root)?;
    let console = Console::open(Storage::open(&session.root));
    if let Some(notice) = console.error() {
        print_notice(notice);
    }
    Ok(console)
}

fn command_count(routine: &Routine) -> String {
    script::parse_and_validate(&routine.script)
        .map(|s| s.len().to_string())
        .unwrap_or_else(|_| "?".to_string())
}

// ---------------------------------------------------------------------------
// list / show
// ---------------------------------------------------------------------------

fn list(console: &Console, json: bool) -> anyhow::Result<()> {
    let routines = console.routines();
    if json {
        return print_json(&routines);
    }
    if routines.is_empty() {
        println!("No saved routines.");
        return Ok(());
    }
    let rows = routines
        .iter()
        .map(|r| {
            vec![
                r.id.clone(),
                r.name.clone(),
                command_count(r),
                r.created_at.clone(),
            ]
        })
        .collect();
    print_table(&["ID", "NAME", "COMMANDS", "CREATED"], rows);
    Ok(())
}

fn show(console: &Console, id: &str, json: bool) -> anyhow::Result<()> {
    let routine = console
        .routine(id)
        .with_context(|| format!("routine not found: {id}"))?;
    if json {
        return print_json(routine);
    }
    println!("Routine:  {}", routine.name);
    println!("ID:       {}", routine.id);
    println!("Created:  {}", routine.created_at);
    println!();
    println!("{}", routine.script);
    Ok(())
}

// ---------------------------------------------------------------------------
// save / delete
// ---------------------------------------------------------------------------

fn report_saved(routine: &Routine, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(routine);
    }
    println!("Saved routine '{}' ({})", routine.name, routine.id);
    Ok(())
}

fn delete(console: &mut Console, id: &str, json: bool) -> anyhow::Result<()> {
    let deleted = console.delete(id)?;
    if json {
        return print_json(&serde_json::json!({ "id": id, "deleted": deleted }));
    }
    if deleted {
        println!("Deleted routine {id}");
    } else {
        println!("No routine with id {id}; nothing deleted");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

fn run_routine(session: &Session, console: &mut Console, id: &str) -> anyhow::Result<()> {
    let client = session.client()?;
    let name = console
        .routine(id)
        .map(|r| r.name.clone())
        .unwrap_or_default();
    let sent = console.run_routine(&client, id)?;
    if session.json {
        return print_json(&serde_json::json!({
            "id": id,
            "name": name,
            "commands": sent.len(),
        }));
    }
    println!("Sent routine '{name}' ({} commands)", sent.len());
    Ok(())
}

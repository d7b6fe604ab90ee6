use super::Session;
use crate::output::{print_json, print_notice, print_table};
use astromech_core::dashboard::Dashboard;

pub fn run(session: &Session) -> anyhow::Result<()> {
    let cfg = session.config()?;
    let client = session.client()?;
    let dashboard = Dashboard::initialize(&client, cfg.items_per_page());

    if session.json {
        return print_json(&dashboard);
    }

    let status = dashboard.status;
    let mark = |ok: bool| if ok { "ok" } else { "unavailable" };
    println!(
        "System: {}",
        if status.online() { "ONLINE" } else { "OFFLINE" }
    );
    println!("Backend:     {}", client.base_url());
    println!(
        "Servos:      {} ({})",
        mark(status.servos),
        dashboard.servos.len()
    );
    println!(
        "Controllers: {} ({})",
        mark(status.controllers),
        dashboard.controllers.len()
    );
    println!(
        "Audio:       {} ({})",
        mark(status.audio),
        dashboard.audio_files.len()
    );

    if !dashboard.controllers.is_empty() {
        println!();
        let rows = dashboard
            .controllers
            .values()
            .map(|c| vec![c.id.clone(), c.i2c_address.clone(), format!("{} Hz", c.frequency)])
            .collect();
        print_table(&["CONTROLLER", "I2C ADDRESS", "FREQUENCY"], rows);
    }

    if let Some(notice) = &dashboard.error {
        print_notice(notice);
    }
    Ok(())
}

//! Dashboard handler.

use postdeck_core::{Console, DashboardSnapshot};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

fn detail(d: &DashboardSnapshot) -> String {
    let mut lines = vec![
        format!("Accounts:     {}", d.total_accounts),
        format!("Active jobs:  {}", d.active_jobs),
        format!("Failed jobs:  {}", d.failed_jobs),
    ];
    for (key, value) in &d.extra {
        lines.push(format!("{key}: {value}"));
    }
    lines.join("\n")
}

pub async fn handle(console: &Console, global: &GlobalOpts) -> Result<(), CliError> {
    let dashboard = console.dashboard();
    let snapshot = dashboard.fetch_dashboard().await;
    let snapshot = util::finish(snapshot, &dashboard.status(), "fetch dashboard")?;

    let out = output::render_single(global.format(), &snapshot, detail, |d| {
        d.active_jobs.to_string()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

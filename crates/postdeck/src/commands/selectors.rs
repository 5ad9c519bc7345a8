//! Selector command handlers.

use serde_json::{Map, Value};
use tabled::Tabled;

use postdeck_core::{Console, SelectorSet, SelectorVersion};

use crate::cli::{GlobalOpts, SelectorsArgs, SelectorsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct SelectorRow {
    #[tabled(rename = "Platform")]
    platform: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Selectors")]
    count: usize,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&SelectorSet> for SelectorRow {
    fn from(s: &SelectorSet) -> Self {
        Self {
            platform: s.platform.clone(),
            version: s.version.clone().unwrap_or_default(),
            count: s.selectors.len(),
            updated: s.updated_at.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct VersionRow {
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Active")]
    active: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&SelectorVersion> for VersionRow {
    fn from(v: &SelectorVersion) -> Self {
        Self {
            version: v.version.clone(),
            active: if v.is_active() { "yes".into() } else { String::new() },
            created: v.created_at.clone().unwrap_or_default(),
        }
    }
}

fn detail(s: &SelectorSet) -> String {
    let mut lines = vec![
        format!("Platform:  {}", s.platform),
        format!("Version:   {}", s.version.as_deref().unwrap_or("-")),
        format!("Updated:   {}", s.updated_at.as_deref().unwrap_or("-")),
        "Selectors:".to_owned(),
    ];
    for (name, value) in &s.selectors {
        let value = value.as_str().map_or_else(|| value.to_string(), str::to_owned);
        lines.push(format!("  {name}: {value}"));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(console: &Console, args: SelectorsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let selectors = console.selectors();
    let format = global.format();

    match args.command {
        SelectorsCommand::List { version } => {
            selectors.fetch_selectors(version.as_deref()).await?;
            let items: Vec<SelectorSet> = selectors.snapshot().items().cloned().collect();
            let out = output::render_list(format, &items, |s| SelectorRow::from(s), |s| {
                s.platform.clone()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SelectorsCommand::Get { platform } => {
            let set = selectors.fetch_selector(&platform).await;
            let set = util::finish(set, &selectors.status(), "fetch selectors")?;
            let out = output::render_single(format, &set, detail, |s| s.platform.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SelectorsCommand::Versions { platform } => {
            let versions = selectors.fetch_versions(&platform).await;
            let versions = util::finish(versions, &selectors.status(), "fetch selector versions")?;
            let out = output::render_list(format, &versions, |v| VersionRow::from(v), |v| {
                v.version.clone()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SelectorsCommand::Create {
            platform,
            version,
            from_file,
        } => {
            let Value::Object(entries) = util::read_json_file(&from_file)? else {
                return Err(CliError::Validation {
                    field: "from-file".into(),
                    reason: "selectors must be a JSON object".into(),
                });
            };
            let set = SelectorSet {
                platform,
                version,
                selectors: entries,
                updated_at: None,
                extra: Map::new(),
            };
            let created = selectors.create_selector(&set).await;
            let set = util::finish(created, &selectors.status(), "create selectors")?;
            if !global.quiet {
                eprintln!("Selectors for '{}' created", set.platform);
            }
            let out = output::render_single(format, &set, detail, |s| s.platform.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SelectorsCommand::Update { platform, patch } => {
            let patch = util::patch_from(&patch)?;
            let updated = selectors.update_selector(&platform, &patch).await;
            let set = util::finish(updated, &selectors.status(), "update selectors")?;
            let out = output::render_single(format, &set, detail, |s| s.platform.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SelectorsCommand::Delete { platform } => {
            if !util::confirm(&format!("Delete selectors for '{platform}'?"), global.yes)? {
                return Ok(());
            }
            let deleted = selectors.delete_selector(&platform).await;
            util::finish_ok(deleted, &selectors.status(), "delete selectors")?;
            if !global.quiet {
                eprintln!("Selectors for '{platform}' deleted");
            }
            Ok(())
        }
    }
}

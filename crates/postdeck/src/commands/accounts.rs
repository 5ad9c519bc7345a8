//! Account command handlers.

use tabled::Tabled;

use postdeck_core::{Account, AccountStats, Console, NewAccount};

use crate::cli::{AccountsArgs, AccountsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct AccountRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Platform")]
    platform: String,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Account> for AccountRow {
    fn from(a: &Account) -> Self {
        Self {
            id: a.account_id.clone(),
            platform: a.platform.clone().unwrap_or_default(),
            username: a.username.clone().unwrap_or_default(),
            name: a.display_name.clone().unwrap_or_default(),
            status: a.status.clone().unwrap_or_default(),
        }
    }
}

fn detail(a: &Account) -> String {
    [
        format!("ID:        {}", a.account_id),
        format!("Platform:  {}", a.platform.as_deref().unwrap_or("-")),
        format!("Username:  {}", a.username.as_deref().unwrap_or("-")),
        format!("Name:      {}", a.display_name.as_deref().unwrap_or("-")),
        format!("Status:    {}", a.status.as_deref().unwrap_or("-")),
        format!("Created:   {}", a.created_at.as_deref().unwrap_or("-")),
        format!("Updated:   {}", a.updated_at.as_deref().unwrap_or("-")),
    ]
    .join("\n")
}

fn stats_detail(s: &AccountStats) -> String {
    [
        format!("Total jobs:      {}", s.total_jobs),
        format!("Completed jobs:  {}", s.completed_jobs),
        format!("Failed jobs:     {}", s.failed_jobs),
        format!("Last run:        {}", s.last_run_at.as_deref().unwrap_or("-")),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(console: &Console, args: AccountsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let accounts = console.accounts();
    let format = global.format();

    match args.command {
        AccountsCommand::List(list) => {
            accounts.fetch_accounts(&list.to_query()).await?;
            let snap = accounts.snapshot();
            let items: Vec<Account> = snap.items().cloned().collect();
            let out = output::render_list(format, &items, |a| AccountRow::from(a), |a| {
                a.account_id.clone()
            })?;
            output::print_output(&out, global.quiet);
            output::print_pagination(format, snap.pagination.as_ref(), global.quiet);
            Ok(())
        }

        AccountsCommand::Get { account_id } => {
            let account = accounts.fetch_account(&account_id).await;
            let account = util::finish(account, &accounts.status(), "fetch account")?;
            let out = output::render_single(format, &account, detail, |a| a.account_id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AccountsCommand::Stats { account_id } => {
            let stats = accounts.fetch_account_stats(&account_id).await;
            let stats = util::finish(stats, &accounts.status(), "fetch account stats")?;
            let out = output::render_single(format, &stats, stats_detail, |s| {
                s.total_jobs.to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AccountsCommand::Create {
            account_id,
            platform,
            username,
            display_name,
        } => {
            let draft = NewAccount {
                platform,
                username,
                display_name,
                ..NewAccount::new(account_id)
            };
            let created = accounts.create_account(&draft).await;
            let account = util::finish(created, &accounts.status(), "create account")?;
            if !global.quiet {
                eprintln!("Account '{}' created", account.account_id);
            }
            let out = output::render_single(format, &account, detail, |a| a.account_id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AccountsCommand::Update { account_id, patch } => {
            let patch = util::patch_from(&patch)?;
            let updated = accounts.update_account(&account_id, &patch).await;
            let account = util::finish(updated, &accounts.status(), "update account")?;
            let out = output::render_single(format, &account, detail, |a| a.account_id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AccountsCommand::Delete { account_id } => {
            if !util::confirm(&format!("Delete account '{account_id}'?"), global.yes)? {
                return Ok(());
            }
            let deleted = accounts.delete_account(&account_id).await;
            util::finish_ok(deleted, &accounts.status(), "delete account")?;
            if !global.quiet {
                eprintln!("Account '{account_id}' deleted");
            }
            Ok(())
        }
    }
}

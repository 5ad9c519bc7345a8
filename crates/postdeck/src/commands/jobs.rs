//! Job command handlers.

use serde_json::Map;
use tabled::Tabled;

use postdeck_core::{Console, JobRecord, JobRequest};

use crate::cli::{GlobalOpts, JobsArgs, JobsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct JobRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Account")]
    account: String,
    #[tabled(rename = "Type")]
    job_type: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Scheduled")]
    scheduled: String,
}

impl From<&JobRecord> for JobRow {
    fn from(j: &JobRecord) -> Self {
        Self {
            id: j.job_id.clone(),
            account: j.account_id.clone().unwrap_or_default(),
            job_type: j.job_type.clone().unwrap_or_default(),
            status: j.status.clone().unwrap_or_default(),
            scheduled: j.scheduled_at.clone().unwrap_or_default(),
        }
    }
}

fn detail(j: &JobRecord) -> String {
    let mut lines = vec![
        format!("ID:         {}", j.job_id),
        format!("Account:    {}", j.account_id.as_deref().unwrap_or("-")),
        format!("Type:       {}", j.job_type.as_deref().unwrap_or("-")),
        format!("Status:     {}", j.status.as_deref().unwrap_or("-")),
        format!("Scheduled:  {}", j.scheduled_at.as_deref().unwrap_or("-")),
        format!("Created:    {}", j.created_at.as_deref().unwrap_or("-")),
    ];
    for (key, value) in &j.extra {
        lines.push(format!("{key}: {value}"));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(console: &Console, args: JobsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let jobs = console.jobs();
    let format = global.format();

    match args.command {
        JobsCommand::List { account, list } => {
            let mut query = list.to_query();
            if let Some(account) = account {
                query = query.filter("account_id", account);
            }
            jobs.fetch_jobs(&query).await?;
            let snap = jobs.snapshot();
            let items: Vec<JobRecord> = snap.items().cloned().collect();
            let out = output::render_list(format, &items, |j| JobRow::from(j), |j| j.job_id.clone())?;
            output::print_output(&out, global.quiet);
            output::print_pagination(format, snap.pagination.as_ref(), global.quiet);
            Ok(())
        }

        JobsCommand::Get { job_id } => {
            let job = jobs.fetch_job(&job_id).await;
            let job = util::finish(job, &jobs.status(), "fetch job")?;
            let out = output::render_single(format, &job, detail, |j| j.job_id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        JobsCommand::Create {
            account,
            job_type,
            scheduled_at,
            params,
        } => {
            let params: Map<_, _> = params
                .into_iter()
                .map(|(key, raw)| (key, util::parse_value(&raw)))
                .collect();
            let request = JobRequest {
                scheduled_at,
                params,
                ..JobRequest::new(account, job_type)
            };
            let created = jobs.create_job(&request).await;
            let job = util::finish(created, &jobs.status(), "create job")?;
            if !global.quiet {
                eprintln!("Job '{}' created", job.job_id);
            }
            let out = output::render_single(format, &job, detail, |j| j.job_id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        JobsCommand::Update { job_id, patch } => {
            let patch = util::patch_from(&patch)?;
            let updated = jobs.update_job(&job_id, &patch).await;
            let job = util::finish(updated, &jobs.status(), "update job")?;
            let out = output::render_single(format, &job, detail, |j| j.job_id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        JobsCommand::Delete { job_id } => {
            if !util::confirm(&format!("Delete job '{job_id}'?"), global.yes)? {
                return Ok(());
            }
            let deleted = jobs.delete_job(&job_id).await;
            util::finish_ok(deleted, &jobs.status(), "delete job")?;
            if !global.quiet {
                eprintln!("Job '{job_id}' deleted");
            }
            Ok(())
        }
    }
}

//! Command dispatch: bridges CLI args -> console features -> output formatting.

pub mod accounts;
pub mod config_cmd;
pub mod dashboard;
pub mod jobs;
pub mod profiles;
pub mod selectors;
pub mod util;

use postdeck_core::Console;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, console: &Console, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Accounts(args) => accounts::handle(console, args, global).await,
        Command::Jobs(args) => jobs::handle(console, args, global).await,
        Command::Selectors(args) => selectors::handle(console, args, global).await,
        Command::Config(args) => config_cmd::handle(console, args, global).await,
        Command::Dashboard => dashboard::handle(console, global).await,
        // Profiles and Completions are handled before dispatch
        Command::Profiles(_) | Command::Completions(_) => unreachable!(),
    }
}

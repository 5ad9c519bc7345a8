//! Local profile handlers. None of these talk to the backend.

use secrecy::SecretString;
use serde::Serialize;
use tabled::Tabled;

use postdeck_config::Config;

use crate::cli::{GlobalOpts, ProfilesArgs, ProfilesCommand};
use crate::config::active_profile_name;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct ProfileEntry {
    name: String,
    api_url: String,
    active: bool,
}

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "")]
    marker: &'static str,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "API URL")]
    api_url: String,
}

impl From<&ProfileEntry> for ProfileRow {
    fn from(p: &ProfileEntry) -> Self {
        Self {
            marker: if p.active { "*" } else { "" },
            name: p.name.clone(),
            api_url: p.api_url.clone(),
        }
    }
}

pub fn handle(args: ProfilesArgs, mut cfg: Config, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ProfilesCommand::List => {
            let active = active_profile_name(global, &cfg);
            let mut entries: Vec<ProfileEntry> = cfg
                .profiles
                .iter()
                .map(|(name, profile)| ProfileEntry {
                    name: name.clone(),
                    api_url: profile.api_url.clone(),
                    active: name == active,
                })
                .collect();
            entries.sort_by(|a, b| a.name.cmp(&b.name));

            let out = output::render_list(global.format(), &entries, |p| ProfileRow::from(p), |p| {
                p.name.clone()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProfilesCommand::Path => {
            println!("{}", postdeck_config::config_path().display());
            Ok(())
        }

        ProfilesCommand::Use { name } => {
            if !cfg.profiles.contains_key(&name) {
                let mut names: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
                names.sort_unstable();
                return Err(CliError::ProfileNotFound {
                    available: names.join(", "),
                    name,
                });
            }
            cfg.default_profile = Some(name.clone());
            postdeck_config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Default profile set to '{name}'");
            }
            Ok(())
        }

        ProfilesCommand::SetToken => {
            let name = active_profile_name(global, &cfg);
            // Raw token from --api-token / POSTDECK_API_TOKEN, else prompt
            let token = match global.api_token {
                Some(ref token) => token.clone(),
                None => dialoguer::Password::new()
                    .with_prompt(format!("Token for profile '{name}'"))
                    .interact()
                    .map_err(|e| CliError::Io(std::io::Error::other(e)))?,
            };
            if token.trim().is_empty() {
                return Err(CliError::Validation {
                    field: "token".into(),
                    reason: "token cannot be empty".into(),
                });
            }

            postdeck_config::store_token(name, &SecretString::from(token))?;
            if !global.quiet {
                eprintln!("Token for profile '{name}' stored in system keyring");
            }
            Ok(())
        }
    }
}

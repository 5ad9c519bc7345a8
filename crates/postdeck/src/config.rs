//! Resolution of the active backend: config profile plus CLI overrides.
//!
//! Flags are overlaid onto the profile first, so a single translation path
//! in `postdeck_config` produces the `ConsoleConfig`.

use secrecy::SecretString;

use postdeck_config::{Config, Profile};
use postdeck_core::ConsoleConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name<'a>(global: &'a GlobalOpts, config: &'a Config) -> &'a str {
    global
        .profile
        .as_deref()
        .unwrap_or_else(|| config.active_profile_name())
}

/// Build the `ConsoleConfig` for this invocation.
pub fn build_console_config(global: &GlobalOpts, cfg: &Config) -> Result<ConsoleConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    let mut profile = if let Some(profile) = cfg.profiles.get(profile_name) {
        profile.clone()
    } else if global.profile.is_some() {
        let mut names: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
        names.sort_unstable();
        return Err(CliError::ProfileNotFound {
            name: profile_name.to_owned(),
            available: if names.is_empty() {
                "(none)".into()
            } else {
                names.join(", ")
            },
        });
    } else {
        // No profile -- flags and env vars alone must name the backend
        if global.api_url.is_none() {
            return Err(CliError::NoConfig {
                path: postdeck_config::config_path().display().to_string(),
            });
        }
        Profile::default()
    };

    overlay_flags(&mut profile, global);

    let mut config =
        postdeck_config::profile_to_console_config(&profile, profile_name, &cfg.defaults)?;
    if let Some(ref token) = global.api_token {
        config.token = Some(SecretString::from(token.clone()));
    }
    Ok(config)
}

fn overlay_flags(profile: &mut Profile, global: &GlobalOpts) {
    if let Some(ref url) = global.api_url {
        profile.api_url.clone_from(url);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::time::Duration;

    use postdeck_core::TlsVerification;

    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["postdeck"];
        argv.extend_from_slice(args);
        argv.push("dashboard");
        Cli::try_parse_from(argv).unwrap().global
    }

    fn config_with(name: &str, profile: Profile) -> Config {
        let mut cfg = Config::default();
        cfg.profiles.insert(name.into(), profile);
        cfg
    }

    #[test]
    fn flags_alone_are_enough() {
        let cfg = Config::default();
        let config = build_console_config(
            &global(&["--api-url", "http://localhost:3000/api/v1", "--timeout", "5"]),
            &cfg,
        )
        .unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:3000/api/v1");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn missing_backend_is_no_config() {
        let cfg = Config::default();
        let err = build_console_config(&global(&[]), &cfg).unwrap_err();
        assert!(matches!(err, CliError::NoConfig { .. }));
    }

    #[test]
    fn unknown_profile_lists_available() {
        let cfg = config_with(
            "staging",
            Profile {
                api_url: "https://staging.example.com/api/v1".into(),
                ..Profile::default()
            },
        );
        let err = build_console_config(&global(&["--profile", "prod"]), &cfg).unwrap_err();
        assert!(matches!(err, CliError::ProfileNotFound { ref available, .. } if available == "staging"));
    }

    #[test]
    fn flags_override_profile() {
        let cfg = config_with(
            "default",
            Profile {
                api_url: "https://staging.example.com/api/v1".into(),
                api_token: Some("from-file".into()),
                ..Profile::default()
            },
        );
        let config = build_console_config(
            &global(&["--api-url", "http://127.0.0.1:9000/api/v1", "--insecure"]),
            &cfg,
        )
        .unwrap();
        assert_eq!(config.base_url.as_str(), "http://127.0.0.1:9000/api/v1");
        assert!(matches!(config.tls, TlsVerification::DangerAcceptInvalid));
    }
}

//! Backend configuration document handlers.

use postdeck_core::{ConfigDocument, Console};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

fn render_document(format: OutputFormat, document: &ConfigDocument) -> Result<String, CliError> {
    match format {
        // A free-form document has no columns
        OutputFormat::Table | OutputFormat::Plain => output::render_json_pretty(document),
        other => output::render_single(other, document, |_| String::new(), |_| String::new()),
    }
}

pub async fn handle(console: &Console, args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let config = console.config();
    let format = global.format();

    match args.command {
        ConfigCommand::Show => {
            let document = config.fetch_config().await;
            let document = util::finish(document, &config.status(), "fetch configuration")?;
            output::print_output(&render_document(format, &document)?, global.quiet);
            Ok(())
        }

        ConfigCommand::Get { key } => {
            let document = config.fetch_config().await;
            let document = util::finish(document, &config.status(), "fetch configuration")?;
            let value = document.pointer(&key).ok_or_else(|| CliError::NotFound {
                message: format!("configuration key '{key}' not found"),
            })?;
            let out = match (format, value.as_str()) {
                (OutputFormat::Table | OutputFormat::Plain, Some(text)) => text.to_owned(),
                (OutputFormat::Table | OutputFormat::Plain, None) => output::render_json_pretty(value)?,
                (other, _) => output::render_single(other, value, |_| String::new(), |_| String::new())?,
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Set { key, value } => {
            let patch = util::nest(&key, util::parse_value(&value));
            let updated = config.update_config(&patch).await;
            let document = util::finish(updated, &config.status(), "update configuration")?;
            if !global.quiet {
                eprintln!("Configuration key '{key}' updated");
            }
            if format != OutputFormat::Table {
                output::print_output(&render_document(format, &document)?, global.quiet);
            }
            Ok(())
        }
    }
}

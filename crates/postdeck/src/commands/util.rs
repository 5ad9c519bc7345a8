//! Shared helpers for command handlers.

use std::path::Path;

use serde_json::{Map, Value};

use postdeck_core::OperationStatus;
use postdeck_core::model::deep_merge;

use crate::cli::PatchArgs;
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read and parse a JSON file for `--from-file` flags.
pub fn read_json_file(path: &Path) -> Result<Value, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("invalid JSON: {e}"),
    })
}

/// Parse a command-line value as JSON, falling back to a plain string.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()))
}

/// Turn `a.b.c` + value into `{"a":{"b":{"c":value}}}`.
pub fn nest(dotted: &str, value: Value) -> Value {
    dotted.rsplit('.').fold(value, |inner, segment| {
        let mut map = Map::new();
        map.insert(segment.to_owned(), inner);
        Value::Object(map)
    })
}

/// Build an update patch from `--set` pairs or `--from-file`.
pub fn patch_from(args: &PatchArgs) -> Result<Value, CliError> {
    let patch = if let Some(ref path) = args.from_file {
        read_json_file(path)?
    } else {
        let mut patch = Value::Object(Map::new());
        for (key, raw) in &args.set {
            deep_merge(&mut patch, nest(key, parse_value(raw)));
        }
        patch
    };

    match patch.as_object() {
        Some(map) if map.is_empty() => Err(CliError::Validation {
            field: "patch".into(),
            reason: "nothing to update; pass --set FIELD=VALUE or --from-file".into(),
        }),
        Some(_) => Ok(patch),
        None => Err(CliError::Validation {
            field: "patch".into(),
            reason: "the patch must be a JSON object".into(),
        }),
    }
}

/// Unwrap a feature result, surfacing the failure its status recorded.
pub fn finish<T>(value: Option<T>, status: &OperationStatus, operation: &str) -> Result<T, CliError> {
    value.ok_or_else(|| failure(status, operation))
}

/// Like [`finish`] for operations that only report success.
pub fn finish_ok(ok: bool, status: &OperationStatus, operation: &str) -> Result<(), CliError> {
    if ok { Ok(()) } else { Err(failure(status, operation)) }
}

fn failure(status: &OperationStatus, operation: &str) -> CliError {
    status
        .failure
        .clone()
        .map_or_else(|| CliError::incomplete(operation), CliError::from)
}

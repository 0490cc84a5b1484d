//! Running composed command lines.

use anyhow::{Context, Result};
use std::process::ExitStatus;

/// Run `command` through `sh -c`, sharing our stdio, and wait for it.
pub fn run_shell(command: &str) -> Result<ExitStatus> {
    let output = duct::cmd("sh", ["-c", command])
        .unchecked()
        .run()
        .with_context(|| format!("Failed to execute: {command}"))?;
    Ok(output.status)
}

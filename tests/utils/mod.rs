use anyhow::Result;
use std::path::Path;
use std::process::Command;

use super::common::TestEnvironment;

pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Run the `v` binary against the environment's config from `cwd`
pub fn run_v_command(env: &TestEnvironment, cwd: &Path, args: &[&str]) -> Result<CommandOutput> {
    let output = Command::new(env!("CARGO_BIN_EXE_v"))
        .arg("--no-color")
        .arg("--config")
        .arg(env.config_path())
        .args(args)
        .current_dir(cwd)
        .output()?;

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(-1),
    })
}

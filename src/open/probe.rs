use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use super::UNKNOWN_MIME;

/// Content-signature mime detection, consulted when the extension table has no answer.
pub trait ContentProbe {
    /// Returns the probed mime, or [`UNKNOWN_MIME`] when the content is not recognized.
    fn probe(&self, path: &Path) -> Result<String>;
}

/// Runs `file --brief --mime-type` with a hard time bound.
#[derive(Debug, Clone)]
pub struct FileProbe {
    program: String,
    timeout: Duration,
}

const POLL_INTERVAL: Duration = Duration::from_millis(10);

impl FileProbe {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }
}

impl ContentProbe for FileProbe {
    fn probe(&self, path: &Path) -> Result<String> {
        if which::which(&self.program).is_err() {
            crate::ui::debug(
                "open.probe.missing",
                format!("Content probe '{}' is not installed", self.program),
            );
            return Ok(UNKNOWN_MIME.to_string());
        }

        let args: Vec<OsString> = vec![
            "--brief".into(),
            "--mime-type".into(),
            path.as_os_str().to_owned(),
        ];
        let handle = duct::cmd(self.program.as_str(), args)
            .stdout_capture()
            .stderr_null()
            .unchecked()
            .start()
            .with_context(|| format!("starting content probe '{}'", self.program))?;

        let deadline = Instant::now() + self.timeout;
        loop {
            if let Some(output) = handle.try_wait().context("waiting for content probe")? {
                if !output.status.success() {
                    return Ok(UNKNOWN_MIME.to_string());
                }
                return Ok(parse_probe_output(&String::from_utf8_lossy(&output.stdout)));
            }
            if Instant::now() >= deadline {
                let _ = handle.kill();
                crate::ui::debug(
                    "open.probe.timeout",
                    format!("Content probe timed out on {}", path.display()),
                );
                return Ok(UNKNOWN_MIME.to_string());
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

fn parse_probe_output(stdout: &str) -> String {
    // some `file` builds still append "; charset=..." even with --mime-type
    let first_line = stdout.lines().next().unwrap_or("");
    let mime = first_line.split(';').next().unwrap_or("").trim();
    if mime.is_empty() || !mime.contains('/') {
        UNKNOWN_MIME.to_string()
    } else {
        mime.to_string()
    }
}

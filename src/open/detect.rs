use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

use super::error::ResolveError;
use super::extensions::ExtensionTable;
use super::probe::ContentProbe;
use super::{DIRECTORY_MIME, UNKNOWN_MIME};
use crate::ui;

/// Suffixes browsers append while a download is still in flight.
const PARTIAL_DOWNLOAD_SUFFIXES: &[&str] = &[".part", ".crdownload"];

lazy_static! {
    static ref TRAILING_EXTENSION: Regex =
        Regex::new(r"\.([[:alnum:]]+)$").expect("extension pattern is valid");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    Extension,
    ContentProbe,
}

/// Each strategy is tried at most once, in this order.
const STRATEGIES: [Strategy; 2] = [Strategy::Extension, Strategy::ContentProbe];

/// Classifies a single path into a mime type string.
pub struct MimeDetector<P> {
    table: ExtensionTable,
    probe: P,
}

impl<P: ContentProbe> MimeDetector<P> {
    pub fn new(table: ExtensionTable, probe: P) -> Self {
        Self { table, probe }
    }

    pub fn detect(&self, path: &Path) -> Result<String, ResolveError> {
        let metadata = match path.metadata() {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ResolveError::NotFound(path.to_path_buf()));
            }
            Err(e) => return Err(ResolveError::Io(e)),
        };

        if metadata.is_dir() {
            return Ok(DIRECTORY_MIME.to_string());
        }

        for strategy in STRATEGIES {
            if let Some(mime) = self.run(strategy, path) {
                ui::debug(
                    "open.detect.found",
                    format!("{} -> {} (via {:?})", path.display(), mime, strategy),
                );
                return Ok(mime);
            }
        }

        Err(ResolveError::Unresolved(path.to_path_buf()))
    }

    fn run(&self, strategy: Strategy, path: &Path) -> Option<String> {
        match strategy {
            Strategy::Extension => {
                let extension = file_extension(path)?;
                self.table.lookup(&extension).map(str::to_string)
            }
            Strategy::ContentProbe => match self.probe.probe(path) {
                // a regular file is never reported as a directory
                Ok(mime) if mime != UNKNOWN_MIME && mime != DIRECTORY_MIME => Some(mime),
                Ok(_) => None,
                Err(e) => {
                    ui::debug(
                        "open.detect.probe_failed",
                        format!("Content probe failed for {}: {e:#}", path.display()),
                    );
                    None
                }
            },
        }
    }
}

/// Lowercase trailing alphanumeric extension, ignoring partial-download markers.
pub(crate) fn file_extension(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy().to_lowercase();
    let name = PARTIAL_DOWNLOAD_SUFFIXES
        .iter()
        .find_map(|suffix| name.strip_suffix(suffix))
        .unwrap_or(&name);

    TRAILING_EXTENSION
        .captures(name)
        .map(|caps| caps[1].to_string())
}

use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};

use super::detect::MimeDetector;
use super::error::ResolveError;
use super::probe::ContentProbe;
use crate::ui;

/// A README in the folder decides the folder's type on its own.
const README_NAMES: &[&str] = &["README", "README.md", "README.txt"];

/// Majority buckets are scanned in this order; the first non-empty match wins.
const CATEGORY_ORDER: &[&str] = &["video", "audio", "image", "text/"];

/// Representative content of a directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub dominant_mime: Option<String>,
    pub files: Vec<PathBuf>,
}

pub struct DirectoryClassifier<'a, P> {
    detector: &'a MimeDetector<P>,
}

impl<'a, P: ContentProbe> DirectoryClassifier<'a, P> {
    pub fn new(detector: &'a MimeDetector<P>) -> Self {
        Self { detector }
    }

    pub fn classify(&self, dir: &Path) -> Result<Classification, ResolveError> {
        if !dir.exists() {
            return Err(ResolveError::NotFound(dir.to_path_buf()));
        }

        if let Some(found) = self.classify_by_readme(dir) {
            return Ok(found);
        }

        self.classify_by_majority(dir)
    }

    fn classify_by_readme(&self, dir: &Path) -> Option<Classification> {
        for name in README_NAMES {
            let readme = dir.join(name);
            if !readme.is_file() {
                continue;
            }
            let mime = match self.detector.detect(&readme) {
                Ok(mime) => mime,
                Err(e) => {
                    skip_child(&readme, &e);
                    continue;
                }
            };
            ui::debug(
                "open.directory.readme",
                format!("{} is represented by {}", dir.display(), readme.display()),
            );
            return Some(Classification {
                dominant_mime: Some(mime),
                files: vec![readme],
            });
        }
        None
    }

    fn classify_by_majority(&self, dir: &Path) -> Result<Classification, ResolveError> {
        // (mime, paths) in first-seen order
        let mut buckets: Vec<(String, Vec<PathBuf>)> = Vec::new();

        for child in list_children(dir)? {
            let mime = match self.detector.detect(&child) {
                Ok(mime) => mime,
                Err(e) => {
                    skip_child(&child, &e);
                    continue;
                }
            };
            match buckets.iter_mut().find(|(key, _)| *key == mime) {
                Some((_, paths)) => paths.push(child),
                None => buckets.push((mime, vec![child])),
            }
        }

        for category in CATEGORY_ORDER {
            if let Some((mime, files)) = buckets
                .iter()
                .find(|(mime, files)| mime.contains(category) && !files.is_empty())
            {
                ui::debug(
                    "open.directory.majority",
                    format!(
                        "{} is dominated by {} ({} files)",
                        dir.display(),
                        mime,
                        files.len()
                    ),
                );
                return Ok(Classification {
                    dominant_mime: Some(mime.clone()),
                    files: files.clone(),
                });
            }
        }

        Ok(Classification::default())
    }
}

/// A child that cannot be classified never decides the folder.
fn skip_child(child: &Path, error: &ResolveError) {
    ui::debug(
        "open.directory.unreadable",
        format!("Skipping {}: {error}", child.display()),
    );
}

/// Immediate, non-hidden children of `dir`, sorted by path.
fn list_children(dir: &Path) -> Result<Vec<PathBuf>, ResolveError> {
    let pattern = format!("{}/*", Pattern::escape(&dir.to_string_lossy()));
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };

    let entries = glob::glob_with(&pattern, options)
        .map_err(|e| ResolveError::Io(std::io::Error::other(e)))?;

    let mut children = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => children.push(path),
            Err(e) => ui::debug(
                "open.directory.unreadable",
                format!("Skipping unreadable entry: {e}"),
            ),
        }
    }
    Ok(children)
}

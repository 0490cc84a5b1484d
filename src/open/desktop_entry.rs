use anyhow::{Context, Result, anyhow};
use freedesktop_file_parser::{EntryType, parse};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Application descriptor: what it runs and which mime types it claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopEntry {
    pub id: String,
    pub path: PathBuf,
    pub mime_types: BTreeSet<String>,
    pub exec: String,
}

impl DesktopEntry {
    pub fn load(id: &str, path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read desktop file {}", path.display()))?;
        Self::from_content(id, &content, path.to_path_buf())
    }

    pub fn from_content(id: &str, content: &str, path: PathBuf) -> Result<Self> {
        let desktop_file = parse(content).context("Failed to parse desktop file")?;

        let app = match &desktop_file.entry.entry_type {
            EntryType::Application(app) => app,
            _ => return Err(anyhow!("{} is not an application", id)),
        };

        let exec = app
            .exec
            .clone()
            .filter(|exec| !exec.trim().is_empty())
            .ok_or_else(|| anyhow!("{} has no Exec line", id))?;

        let mime_types = app
            .mime_type
            .clone()
            .unwrap_or_default()
            .into_iter()
            .map(|mime| mime.trim().to_string())
            .filter(|mime| !mime.is_empty())
            .collect();

        Ok(Self {
            id: id.to_string(),
            path,
            mime_types,
            exec,
        })
    }

    /// Full containment: every required mime must be declared.
    pub fn supports_all(&self, required: &BTreeSet<String>) -> bool {
        required.is_subset(&self.mime_types)
    }
}

/// Locate `id` under `base`, falling back to the vendor-prefixed layout
/// (`kde4-gwenview.desktop` -> `kde4/gwenview.desktop`).
pub fn find_entry_file(base: &Path, id: &str) -> Option<PathBuf> {
    let direct = base.join(id);
    if direct.is_file() {
        return Some(direct);
    }

    let (vendor, rest) = id.split_once('-')?;
    let namespaced = base.join(vendor).join(rest);
    namespaced.is_file().then_some(namespaced)
}

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::desktop_entry::{DesktopEntry, find_entry_file};
use super::keyfile::KeyFile;
use crate::ui;

pub const DEFAULT_APPLICATIONS: &str = "Default Applications";
pub const ADDED_ASSOCIATIONS: &str = "Added Associations";
pub const MIME_CACHE: &str = "MIME Cache";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// `mimeapps.list`
    Override,
    /// `mimeinfo.cache`
    Cache,
}

impl StoreKind {
    pub fn file_name(self) -> &'static str {
        match self {
            StoreKind::Override => "mimeapps.list",
            StoreKind::Cache => "mimeinfo.cache",
        }
    }

    pub fn keys(self) -> &'static [&'static str] {
        match self {
            StoreKind::Override => &[DEFAULT_APPLICATIONS, ADDED_ASSOCIATIONS],
            StoreKind::Cache => &[MIME_CACHE],
        }
    }
}

/// One association file and the sections consulted in it, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationStore {
    pub path: PathBuf,
    pub kind: StoreKind,
}

impl AssociationStore {
    pub fn new(applications_dir: &Path, kind: StoreKind) -> Self {
        Self {
            path: applications_dir.join(kind.file_name()),
            kind,
        }
    }

    /// Desktop entries named by this store live next to it.
    pub fn base(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new("/"))
    }
}

/// Search order across data roots: each root's override store, then its cache store.
pub fn stores_for_roots(roots: &[PathBuf]) -> Vec<AssociationStore> {
    roots
        .iter()
        .flat_map(|root| {
            let applications = root.join("applications");
            [
                AssociationStore::new(&applications, StoreKind::Override),
                AssociationStore::new(&applications, StoreKind::Cache),
            ]
        })
        .collect()
}

/// Chosen application for a mime type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    pub entry: DesktopEntry,
    pub store: PathBuf,
    pub key: &'static str,
}

pub struct AssociationResolver {
    stores: Vec<AssociationStore>,
}

impl AssociationResolver {
    pub fn new(stores: Vec<AssociationStore>) -> Self {
        Self { stores }
    }

    /// First usable entry in priority order; later stores are never read once one matches.
    pub fn resolve_entry(&self, mime: &str, required: &BTreeSet<String>) -> Option<ResolvedEntry> {
        for store in &self.stores {
            let Some(keyfile) = load_store(store) else {
                continue;
            };

            for &key in store.kind.keys() {
                let ids = keyfile.get_list(key, mime);
                if ids.is_empty() {
                    continue;
                }
                ui::debug(
                    "open.store.candidates",
                    format!(
                        "{} [{}] offers {} for {}",
                        store.path.display(),
                        key,
                        ids.join(", "),
                        mime
                    ),
                );

                if let Some(entry) = first_qualifying_entry(store.base(), &ids, required) {
                    return Some(ResolvedEntry {
                        entry,
                        store: store.path.clone(),
                        key,
                    });
                }
            }
        }

        None
    }
}

fn load_store(store: &AssociationStore) -> Option<KeyFile> {
    if !store.path.exists() {
        return None;
    }
    match KeyFile::load(&store.path) {
        Ok(keyfile) => Some(keyfile),
        Err(e) => {
            ui::debug(
                "open.store.parse_failed",
                format!("Ignoring association store: {e:#}"),
            );
            None
        }
    }
}

fn first_qualifying_entry(
    base: &Path,
    ids: &[String],
    required: &BTreeSet<String>,
) -> Option<DesktopEntry> {
    for id in ids {
        let Some(path) = find_entry_file(base, id) else {
            ui::debug("open.entry.missing", format!("No desktop file for {id}"));
            continue;
        };

        let entry = match DesktopEntry::load(id, &path) {
            Ok(entry) => entry,
            Err(e) => {
                ui::debug("open.entry.unreadable", format!("Skipping {id}: {e:#}"));
                continue;
            }
        };

        if !entry.supports_all(required) {
            ui::debug(
                "open.entry.unsupported",
                format!(
                    "Skipping {id}: does not declare all of {}",
                    required.iter().cloned().collect::<Vec<_>>().join(", ")
                ),
            );
            continue;
        }

        return Some(entry);
    }
    None
}

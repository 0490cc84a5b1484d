use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::common::paths;
use crate::open::extensions::ExtensionTable;
use crate::open::player::{DEFAULT_PLAYER, PlayerTweak};
use crate::open::probe::FileProbe;
use crate::ui;

/// Regexes that pick playback controls out of the positional words.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ControlPatterns {
    pub db: String,
    pub factor: String,
    pub novideo: String,
    pub nosound: String,
    pub nosub: String,
}

impl Default for ControlPatterns {
    fn default() -> Self {
        Self {
            db: r"^([+-][0-9]+)db$".to_string(),
            factor: r"^([0-9]+[.][0-9]+)x$".to_string(),
            novideo: r"^novideo$".to_string(),
            nosound: r"^nosound$".to_string(),
            nosub: r"^nosub$".to_string(),
        }
    }
}

/// Compiled form of [`ControlPatterns`].
#[derive(Debug, Clone)]
pub struct Controls {
    pub db: Regex,
    pub factor: Regex,
    pub novideo: Regex,
    pub nosound: Regex,
    pub nosub: Regex,
}

impl ControlPatterns {
    pub fn compile(&self) -> Result<Controls> {
        let build = |name: &str, pattern: &str| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .with_context(|| format!("invalid pattern for control '{name}'"))
        };

        Ok(Controls {
            db: build("db", &self.db)?,
            factor: build("factor", &self.factor)?,
            novideo: build("novideo", &self.novideo)?,
            nosound: build("nosound", &self.nosound)?,
            nosub: build("nosub", &self.nosub)?,
        })
    }
}

/// `~/.config/v/config.toml`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VConfig {
    /// Program whose command lines get volume/speed flags injected
    pub player: String,
    pub probe_command: String,
    pub probe_timeout_ms: u64,
    /// Optional `mime.types` merged over the built-in extension table; empty disables it
    pub mime_types_file: String,
    /// Extension overrides, applied last
    pub extensions: HashMap<String, String>,
    /// Defaults to `~/.local/share`
    pub user_data_dir: Option<String>,
    pub system_data_dirs: Vec<String>,
    pub controls: ControlPatterns,
}

impl Default for VConfig {
    fn default() -> Self {
        Self {
            player: DEFAULT_PLAYER.to_string(),
            probe_command: "file".to_string(),
            probe_timeout_ms: 3000,
            mime_types_file: "/etc/mime.types".to_string(),
            extensions: HashMap::new(),
            user_data_dir: None,
            system_data_dirs: vec!["/usr/share".to_string()],
            controls: ControlPatterns::default(),
        }
    }
}

impl VConfig {
    /// Load from `path`, or from the default location when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load_from_path(paths::default_config_path()?),
        }
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            ui::debug(
                "config.default",
                format!("No config at {}, using defaults", path.display()),
            );
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.player.trim().is_empty() {
            anyhow::bail!("player must not be empty");
        }
        if self.probe_command.trim().is_empty() {
            anyhow::bail!("probe_command must not be empty");
        }
        if self.probe_timeout_ms == 0 {
            anyhow::bail!("probe_timeout_ms must be greater than zero");
        }
        self.controls.compile()?;
        Ok(())
    }

    /// Data roots in search priority order: user first, then each system root.
    pub fn data_roots(&self) -> Vec<PathBuf> {
        let user = self
            .user_data_dir
            .as_deref()
            .map(paths::expand_path)
            .unwrap_or_else(paths::user_data_dir);

        std::iter::once(user)
            .chain(self.system_data_dirs.iter().map(|d| paths::expand_path(d)))
            .collect()
    }

    /// Built-in table, then `mime_types_file`, then `extensions`.
    pub fn extension_table(&self) -> ExtensionTable {
        let mut table = ExtensionTable::builtin();

        if !self.mime_types_file.is_empty() {
            let path = paths::expand_path(&self.mime_types_file);
            table = match table.clone().with_mime_types_file(&path) {
                Ok(merged) => merged,
                Err(e) => {
                    ui::debug("config.mime_types_unreadable", format!("{e:#}"));
                    table
                }
            };
        }

        table.with_entries(
            self.extensions
                .iter()
                .map(|(ext, mime)| (ext.clone(), mime.clone())),
        )
    }

    pub fn probe(&self) -> FileProbe {
        FileProbe::new(
            self.probe_command.clone(),
            Duration::from_millis(self.probe_timeout_ms),
        )
    }

    pub fn player_tweak(&self) -> PlayerTweak {
        PlayerTweak::new(self.player.clone())
    }
}

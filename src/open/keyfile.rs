use anyhow::{Context, Result, bail};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Sectioned `key=value` file, as used by `mimeapps.list` and `mimeinfo.cache`.
#[derive(Debug, Clone, Default)]
pub struct KeyFile {
    sections: HashMap<String, HashMap<String, String>>,
}

impl KeyFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
        let mut current: Option<String> = None;

        for (number, line) in content.lines().enumerate() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if line.starts_with('[') {
                let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) else {
                    bail!("line {}: unterminated section header", number + 1);
                };
                sections.entry(name.to_string()).or_default();
                current = Some(name.to_string());
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                bail!("line {}: expected key=value", number + 1);
            };
            let Some(section) = &current else {
                bail!("line {}: key outside of any section", number + 1);
            };

            // first definition wins, like the freedesktop readers do
            sections
                .entry(section.clone())
                .or_default()
                .entry(key.trim().to_string())
                .or_insert_with(|| value.trim().to_string());
        }

        Ok(Self { sections })
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|entries| entries.get(key))
            .map(String::as_str)
    }

    /// Semicolon-separated list value with empty items dropped.
    pub fn get_list(&self, section: &str, key: &str) -> Vec<String> {
        self.get(section, key)
            .map(|value| {
                value
                    .split(';')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }
}

use regex::Regex;
use std::path::{Path, PathBuf};

use super::options::PlayOptions;
use crate::common::config::Controls;

/// Positional words split into playback options and target files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    pub options: PlayOptions,
    pub files: Vec<PathBuf>,
    /// Words that looked like files but do not exist
    pub missing: Vec<String>,
}

/// Pull control words (`-6db`, `1.5x`, `nosub`, ...) out of `words`; the rest are files.
pub fn parse_words(words: &[String], controls: &Controls, cwd: &Path) -> ParsedArgs {
    let mut parsed = ParsedArgs::default();
    let mut rest = Vec::new();

    for word in words {
        if take_captures(&controls.db, word, &mut parsed.options.db)
            || take_captures(&controls.factor, word, &mut parsed.options.factor)
        {
            continue;
        }

        let flag = if controls.novideo.is_match(word) {
            &mut parsed.options.novideo
        } else if controls.nosound.is_match(word) {
            &mut parsed.options.nosound
        } else if controls.nosub.is_match(word) {
            &mut parsed.options.nosub
        } else {
            rest.push(word);
            continue;
        };
        *flag = true;
    }

    if rest.is_empty() {
        parsed.files.push(cwd.to_path_buf());
        return parsed;
    }

    for word in rest {
        let expanded = PathBuf::from(shellexpand::tilde(word).as_ref());
        let path = if expanded.is_absolute() {
            expanded
        } else {
            cwd.join(expanded)
        };
        if path.exists() {
            parsed.files.push(path);
        } else {
            parsed.missing.push(word.clone());
        }
    }

    parsed
}

/// Consumes `word` when it matches; only the first match's captures are kept.
fn take_captures(pattern: &Regex, word: &str, slot: &mut Vec<String>) -> bool {
    let Some(caps) = pattern.captures(word) else {
        return false;
    };
    if slot.is_empty() {
        *slot = caps
            .iter()
            .map(|group| group.map(|m| m.as_str().to_string()).unwrap_or_default())
            .collect();
    }
    true
}

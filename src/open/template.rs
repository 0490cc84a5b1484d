use std::path::PathBuf;

use super::options::PlayOptions;

pub const DEFAULT_CAPTION: &str = "v";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    /// `%f`, `%F`, `%u`, `%U`
    Files,
    /// `%i`
    Icon,
    /// `%c`
    Caption,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Field),
}

/// An `Exec` line split into literal text and placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl CommandTemplate {
    pub fn parse(raw: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = raw.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '%' && chars.peek() == Some(&'%') {
                chars.next();
                literal.push_str("%%");
                continue;
            }

            let field = match (c, chars.peek().copied()) {
                ('%', Some('f' | 'F' | 'u' | 'U')) => Some(Field::Files),
                ('%', Some('i')) => Some(Field::Icon),
                ('%', Some('c')) => Some(Field::Caption),
                _ => None,
            };

            match field {
                Some(field) => {
                    chars.next();
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(field));
                }
                None => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self {
            raw: raw.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// First word of the command line.
    pub fn program(&self) -> Option<String> {
        match shell_words::split(&self.raw) {
            Ok(words) => words.into_iter().next(),
            Err(_) => self.raw.split_whitespace().next().map(str::to_string),
        }
    }

    /// New template with `extra` inserted right after the leading program word.
    pub fn with_args_after_program(&self, extra: &str) -> Self {
        let trimmed = self.raw.trim_start();
        let indent = self.raw.len() - trimmed.len();
        let program_end = trimmed
            .find(char::is_whitespace)
            .map(|i| indent + i)
            .unwrap_or(self.raw.len());

        let (head, tail) = self.raw.split_at(program_end);
        Self::parse(&format!("{head} {extra}{tail}"))
    }

    /// Single-pass substitution; replacement text is never re-scanned.
    pub fn fill(&self, files: &[PathBuf], options: &PlayOptions) -> String {
        let files = quoted_file_list(files);
        let mut out = String::with_capacity(self.raw.len() + files.len());

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(Field::Files) => out.push_str(&files),
                Segment::Field(Field::Icon) => out.push_str(options.icon.as_deref().unwrap_or("")),
                Segment::Field(Field::Caption) => {
                    out.push_str(options.caption.as_deref().unwrap_or(DEFAULT_CAPTION))
                }
            }
        }
        out
    }
}

/// Sorted paths joined by spaces inside one pair of double quotes.
fn quoted_file_list(files: &[PathBuf]) -> String {
    let mut names: Vec<String> = files
        .iter()
        .map(|f| f.to_string_lossy().into_owned())
        .collect();
    names.sort();
    format!("\"{}\"", names.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_files_are_sorted_into_one_token() {
        let template = CommandTemplate::parse("mplayer %F -fs");
        let filled = template.fill(&paths(&["b.mkv", "a.mkv"]), &PlayOptions::default());
        assert_eq!(filled, "mplayer \"a.mkv b.mkv\" -fs");
    }

    #[test]
    fn test_every_file_code_is_replaced() {
        let template = CommandTemplate::parse("app %f %u %U");
        let filled = template.fill(&paths(&["/x"]), &PlayOptions::default());
        assert_eq!(filled, "app \"/x\" \"/x\" \"/x\"");
    }

    #[test]
    fn test_icon_and_caption() {
        let template = CommandTemplate::parse("app --icon=%i --title %c %F");
        let defaults = template.fill(&paths(&["/a"]), &PlayOptions::default());
        assert_eq!(defaults, "app --icon= --title v \"/a\"");

        let options = PlayOptions {
            icon: Some("movie".into()),
            caption: Some("Cinema".into()),
            ..PlayOptions::default()
        };
        let custom = template.fill(&paths(&["/a"]), &options);
        assert_eq!(custom, "app --icon=movie --title Cinema \"/a\"");
    }

    #[test]
    fn test_unknown_codes_stay_verbatim() {
        let template = CommandTemplate::parse("app %k %%F 100% %F");
        let filled = template.fill(&paths(&["/a"]), &PlayOptions::default());
        assert_eq!(filled, "app %k %%F 100% \"/a\"");
    }

    #[test]
    fn test_replacements_are_not_rescanned() {
        let template = CommandTemplate::parse("app %c %F");
        let options = PlayOptions {
            caption: Some("%F".into()),
            ..PlayOptions::default()
        };
        let filled = template.fill(&paths(&["/file-%i"]), &options);
        assert_eq!(filled, "app %F \"/file-%i\"");
    }

    #[test]
    fn test_program_word() {
        assert_eq!(
            CommandTemplate::parse("mplayer %F").program().as_deref(),
            Some("mplayer")
        );
        assert_eq!(
            CommandTemplate::parse("\"my player\" %F").program().as_deref(),
            Some("my player")
        );
        assert_eq!(CommandTemplate::parse("   ").program(), None);
    }

    #[test]
    fn test_args_after_program() {
        let template = CommandTemplate::parse("mplayer %F");
        let tweaked = template.with_args_after_program("-speed 2.0");
        assert_eq!(tweaked.as_str(), "mplayer -speed 2.0 %F");

        let bare = CommandTemplate::parse("mplayer");
        assert_eq!(bare.with_args_after_program("-nosub").as_str(), "mplayer -nosub");
    }
}

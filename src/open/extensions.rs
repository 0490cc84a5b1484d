use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const BUILTIN_EXTENSIONS: &[(&str, &str)] = &[
    // video
    ("mp4", "video/mp4"),
    ("m4v", "video/mp4"),
    ("mkv", "video/x-matroska"),
    ("webm", "video/webm"),
    ("avi", "video/x-msvideo"),
    ("mov", "video/quicktime"),
    ("mpg", "video/mpeg"),
    ("mpeg", "video/mpeg"),
    ("ogv", "video/ogg"),
    ("flv", "video/x-flv"),
    ("wmv", "video/x-ms-wmv"),
    ("ts", "video/mp2t"),
    // audio
    ("mp3", "audio/mpeg"),
    ("ogg", "audio/ogg"),
    ("oga", "audio/ogg"),
    ("opus", "audio/opus"),
    ("flac", "audio/flac"),
    ("wav", "audio/x-wav"),
    ("aac", "audio/aac"),
    ("m4a", "audio/mp4"),
    ("wma", "audio/x-ms-wma"),
    // image
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("svg", "image/svg+xml"),
    // text
    ("txt", "text/plain"),
    ("md", "text/markdown"),
    ("markdown", "text/markdown"),
    ("html", "text/html"),
    ("htm", "text/html"),
    ("css", "text/css"),
    ("csv", "text/csv"),
    ("rs", "text/x-rust"),
    ("py", "text/x-python"),
    ("c", "text/x-c"),
    ("h", "text/x-c"),
    ("cpp", "text/x-c++"),
    // documents and archives
    ("pdf", "application/pdf"),
    ("epub", "application/epub+zip"),
    ("json", "application/json"),
    ("xml", "application/xml"),
    ("zip", "application/zip"),
    ("tar", "application/x-tar"),
    ("gz", "application/gzip"),
    ("xz", "application/x-xz"),
    ("7z", "application/x-7z-compressed"),
    ("rar", "application/x-rar"),
    ("iso", "application/x-iso9660-image"),
];

/// Immutable lowercase extension -> mime table.
#[derive(Debug, Clone, Default)]
pub struct ExtensionTable {
    entries: HashMap<String, String>,
}

impl ExtensionTable {
    pub fn builtin() -> Self {
        Self::default().with_entries(
            BUILTIN_EXTENSIONS
                .iter()
                .map(|(ext, mime)| (ext.to_string(), mime.to_string())),
        )
    }

    /// Merge entries on top of this table. Later entries win.
    pub fn with_entries(mut self, entries: impl IntoIterator<Item = (String, String)>) -> Self {
        for (ext, mime) in entries {
            let ext = ext.trim_start_matches('.').to_lowercase();
            if !ext.is_empty() && !mime.is_empty() {
                self.entries.insert(ext, mime);
            }
        }
        self
    }

    /// Merge a `mime.types` file (`<mime> <ext> <ext>...`) on top of this table.
    pub fn with_mime_types_file(self, path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading mime types from {}", path.display()))?;
        Ok(self.with_entries(parse_mime_types(&content)))
    }

    pub fn lookup(&self, extension: &str) -> Option<&str> {
        self.entries
            .get(&extension.to_lowercase())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

fn parse_mime_types(content: &str) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split_whitespace();
        let Some(mime) = fields.next() else {
            continue;
        };
        if !mime.contains('/') {
            continue;
        }
        entries.extend(fields.map(|ext| (ext.to_string(), mime.to_string())));
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_covers_common_media() {
        let table = ExtensionTable::builtin();
        assert_eq!(table.lookup("mkv"), Some("video/x-matroska"));
        assert_eq!(table.lookup("MP3"), Some("audio/mpeg"));
        assert_eq!(table.lookup("jpg"), Some("image/jpeg"));
        assert_eq!(table.lookup("nope"), None);
    }

    #[test]
    fn test_mime_types_file_overrides_builtin() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mime.types");
        fs::write(
            &path,
            "# comment\n\nvideo/x-custom   mkv  cst\napplication/x-nothing\nnot-a-mime foo\n",
        )
        .unwrap();

        let table = ExtensionTable::builtin()
            .with_mime_types_file(&path)
            .unwrap();
        assert_eq!(table.lookup("mkv"), Some("video/x-custom"));
        assert_eq!(table.lookup("cst"), Some("video/x-custom"));
        assert_eq!(table.lookup("foo"), None);
    }

    #[test]
    fn test_missing_mime_types_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = ExtensionTable::builtin()
            .with_mime_types_file(&temp_dir.path().join("absent"));
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_are_normalized() {
        let table = ExtensionTable::default().with_entries([
            (".FLAC".to_string(), "audio/x-flac".to_string()),
            ("".to_string(), "text/plain".to_string()),
        ]);
        assert_eq!(table.lookup("flac"), Some("audio/x-flac"));
        assert_eq!(table.len(), 1);
    }
}

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::DIRECTORY_MIME;
use super::associations::{AssociationResolver, ResolvedEntry};
use super::detect::MimeDetector;
use super::directory::DirectoryClassifier;
use super::error::ResolveError;
use super::options::PlayOptions;
use super::player::PlayerTweak;
use super::probe::ContentProbe;
use super::template::CommandTemplate;
use crate::ui;

/// A ready-to-fill command for one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Mime the entry was looked up for; directories keep [`DIRECTORY_MIME`].
    pub mime: String,
    pub entry_id: String,
    pub template: CommandTemplate,
    /// Empty when the target itself is what the command operates on.
    pub files: Vec<PathBuf>,
    /// The entry was chosen under a non-empty required-mime filter.
    pub satisfied_required_mimes: bool,
}

impl Resolution {
    /// Files handed to the command; falls back to the target path itself.
    pub fn targets(&self, path: &Path) -> Vec<PathBuf> {
        if self.files.is_empty() {
            vec![path.to_path_buf()]
        } else {
            self.files.clone()
        }
    }

    pub fn command(&self, path: &Path, options: &PlayOptions) -> String {
        self.template.fill(&self.targets(path), options)
    }
}

/// Turns (path, mime, options) into a command template and the files it applies to.
pub struct RunnerComposer<'a, P> {
    detector: &'a MimeDetector<P>,
    resolver: &'a AssociationResolver,
    player: &'a PlayerTweak,
}

impl<'a, P: ContentProbe> RunnerComposer<'a, P> {
    pub fn new(
        detector: &'a MimeDetector<P>,
        resolver: &'a AssociationResolver,
        player: &'a PlayerTweak,
    ) -> Self {
        Self {
            detector,
            resolver,
            player,
        }
    }

    /// Detect the mime of `path`, then resolve it.
    pub fn open(&self, path: &Path, options: &PlayOptions) -> Result<Resolution, ResolveError> {
        let mime = self.detector.detect(path)?;
        self.resolve(&mime, path, options)
    }

    pub fn resolve(
        &self,
        mime: &str,
        path: &Path,
        options: &PlayOptions,
    ) -> Result<Resolution, ResolveError> {
        let (found, files, satisfied) = if mime == DIRECTORY_MIME {
            self.resolve_directory(path)?
        } else {
            let found = self.resolver.resolve_entry(mime, &BTreeSet::new());
            (found, Vec::new(), false)
        };

        let Some(found) = found else {
            return Err(ResolveError::NoEntryFound(mime.to_string()));
        };

        ui::debug(
            "open.resolve.entry",
            format!(
                "{} -> {} ({}) from {} [{}]{}",
                path.display(),
                found.entry.id,
                found.entry.path.display(),
                found.store.display(),
                found.key,
                if satisfied { ", folder-aware" } else { "" }
            ),
        );

        let template = self
            .player
            .apply(CommandTemplate::parse(&found.entry.exec), options);
        ui::debug(
            "open.resolve.template",
            format!("Template: {}", template.as_str()),
        );

        Ok(Resolution {
            mime: mime.to_string(),
            entry_id: found.entry.id,
            template,
            files,
            satisfied_required_mimes: satisfied,
        })
    }

    fn resolve_directory(
        &self,
        path: &Path,
    ) -> Result<(Option<ResolvedEntry>, Vec<PathBuf>, bool), ResolveError> {
        let classification = DirectoryClassifier::new(self.detector).classify(path)?;

        if let Some(dominant) = &classification.dominant_mime {
            let folder_aware = BTreeSet::from([DIRECTORY_MIME.to_string()]);
            // an entry that handles both the content and folders gets the folder itself
            if let Some(found) = self.resolver.resolve_entry(dominant, &folder_aware) {
                return Ok((Some(found), Vec::new(), true));
            }
            if let Some(found) = self.resolver.resolve_entry(dominant, &BTreeSet::new()) {
                return Ok((Some(found), classification.files, false));
            }
        }

        let found = self.resolver.resolve_entry(DIRECTORY_MIME, &BTreeSet::new());
        Ok((found, Vec::new(), false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::open::UNKNOWN_MIME;
    use crate::open::associations::tests::Roots;
    use crate::open::detect::tests::CountingProbe;
    use crate::open::extensions::ExtensionTable;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        roots: Roots,
        media: TempDir,
        detector: MimeDetector<CountingProbe>,
        resolver: AssociationResolver,
        player: PlayerTweak,
    }

    impl Fixture {
        fn new(setup: impl FnOnce(&Roots)) -> Self {
            let roots = Roots::new();
            setup(&roots);
            let resolver = roots.resolver();
            Self {
                roots,
                media: TempDir::new().unwrap(),
                detector: MimeDetector::new(
                    ExtensionTable::builtin(),
                    CountingProbe::answering(UNKNOWN_MIME),
                ),
                resolver,
                player: PlayerTweak::default(),
            }
        }

        fn composer(&self) -> RunnerComposer<'_, CountingProbe> {
            RunnerComposer::new(&self.detector, &self.resolver, &self.player)
        }

        fn file(&self, name: &str) -> PathBuf {
            let path = self.media.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, b"x").unwrap();
            path
        }
    }

    fn cache(entries: &str) -> String {
        format!("[MIME Cache]\n{entries}")
    }

    #[test]
    fn test_plain_file() {
        let fixture = Fixture::new(|roots| {
            roots.write("system", "mimeinfo.cache", &cache("video/mp4=mpv.desktop;\n"));
            roots.app("system", "mpv.desktop", "mpv %U", "video/mp4;");
        });
        let file = fixture.file("clip.mp4");

        let resolution = fixture
            .composer()
            .open(&file, &PlayOptions::default())
            .unwrap();
        assert_eq!(resolution.mime, "video/mp4");
        assert_eq!(resolution.entry_id, "mpv.desktop");
        assert!(resolution.files.is_empty());
        assert_eq!(
            resolution.command(&file, &PlayOptions::default()),
            format!("mpv \"{}\"", file.display())
        );
    }

    #[test]
    fn test_player_tweak_is_applied() {
        let fixture = Fixture::new(|roots| {
            roots.write(
                "user",
                "mimeapps.list",
                "[Default Applications]\nvideo/x-matroska=mplayer.desktop\n",
            );
            roots.app("user", "mplayer.desktop", "mplayer %F", "video/x-matroska;");
        });
        let file = fixture.file("film.mkv");
        let options = PlayOptions {
            db: vec!["+3db".into(), "+3".into()],
            factor: vec!["2.0x".into(), "2.0".into()],
            nosound: true,
            ..PlayOptions::default()
        };

        let command = fixture
            .composer()
            .open(&file, &options)
            .unwrap()
            .command(&file, &options);
        assert_eq!(
            command,
            format!(
                "mplayer -af volume=+3dB,scaletempo -speed 2.0 -nosound \"{}\"",
                file.display()
            )
        );
    }

    #[test]
    fn test_folder_aware_entry_gets_the_folder() {
        let fixture = Fixture::new(|roots| {
            roots.write(
                "system",
                "mimeinfo.cache",
                &cache("audio/flac=deadbeef.desktop;\ninode/directory=thunar.desktop;\n"),
            );
            roots.app(
                "system",
                "deadbeef.desktop",
                "deadbeef %F",
                "audio/flac;inode/directory;",
            );
            roots.app("system", "thunar.desktop", "thunar %F", "inode/directory;");
        });
        fixture.file("album/01.flac");
        fixture.file("album/02.flac");
        let album = fixture.media.path().join("album");

        let resolution = fixture
            .composer()
            .resolve(DIRECTORY_MIME, &album, &PlayOptions::default())
            .unwrap();
        assert_eq!(resolution.entry_id, "deadbeef.desktop");
        assert!(resolution.files.is_empty());
        assert!(resolution.satisfied_required_mimes);
        assert_eq!(resolution.targets(&album), vec![album.clone()]);
    }

    #[test]
    fn test_content_entry_gets_the_files() {
        let fixture = Fixture::new(|roots| {
            roots.write("system", "mimeinfo.cache", &cache("image/png=feh.desktop;\n"));
            roots.app("system", "feh.desktop", "feh %F", "image/png;");
        });
        let a = fixture.file("shots/a.png");
        let b = fixture.file("shots/b.png");
        fixture.file("shots/readme.pdf");
        let shots = fixture.media.path().join("shots");

        let resolution = fixture
            .composer()
            .resolve(DIRECTORY_MIME, &shots, &PlayOptions::default())
            .unwrap();
        assert_eq!(resolution.entry_id, "feh.desktop");
        assert_eq!(resolution.files, vec![a.clone(), b.clone()]);
        assert!(!resolution.satisfied_required_mimes);
        assert_eq!(
            resolution.command(&shots, &PlayOptions::default()),
            format!("feh \"{} {}\"", a.display(), b.display())
        );
    }

    #[test]
    fn test_directory_falls_back_to_file_manager() {
        let fixture = Fixture::new(|roots| {
            roots.write("system", "mimeinfo.cache", &cache("inode/directory=thunar.desktop;\n"));
            roots.app("system", "thunar.desktop", "thunar %F", "inode/directory;");
        });
        fixture.file("mixed/a.mp4");
        let mixed = fixture.media.path().join("mixed");

        let resolution = fixture
            .composer()
            .resolve(DIRECTORY_MIME, &mixed, &PlayOptions::default())
            .unwrap();
        assert_eq!(resolution.entry_id, "thunar.desktop");
        assert!(resolution.files.is_empty());

        let empty = fixture.media.path().join("empty");
        fs::create_dir(&empty).unwrap();
        let resolution = fixture.composer().open(&empty, &PlayOptions::default()).unwrap();
        assert_eq!(resolution.entry_id, "thunar.desktop");
    }

    #[test]
    fn test_no_entry_anywhere() {
        let fixture = Fixture::new(|roots| {
            roots.write("system", "mimeinfo.cache", &cache("image/png=feh.desktop;\n"));
        });
        let store = fixture.roots.root("system").join("applications/mimeinfo.cache");
        let before = fs::read_to_string(&store).unwrap();
        let file = fixture.file("song.mp3");

        let result = fixture.composer().open(&file, &PlayOptions::default());
        assert!(matches!(result, Err(ResolveError::NoEntryFound(mime)) if mime == "audio/mpeg"));
        assert_eq!(fs::read_to_string(&store).unwrap(), before);
    }

    #[test]
    fn test_missing_target() {
        let fixture = Fixture::new(|_| {});
        let missing = fixture.media.path().join("gone.mkv");

        assert!(matches!(
            fixture.composer().open(&missing, &PlayOptions::default()),
            Err(ResolveError::NotFound(_))
        ));
    }
}

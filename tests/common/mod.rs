use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Throwaway data roots, media dir and config for one test
pub struct TestEnvironment {
    temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        for dir in ["user/applications", "system/applications", "media"] {
            fs::create_dir_all(temp_dir.path().join(dir))?;
        }

        let env = Self { temp_dir };
        env.write_config("")?;
        Ok(env)
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.path().join("config.toml")
    }

    pub fn media(&self) -> PathBuf {
        self.path().join("media")
    }

    /// Config pointing both search roots into the temp dir; `extra` is appended verbatim.
    pub fn write_config(&self, extra: &str) -> Result<()> {
        let content = format!(
            "user_data_dir = {:?}\n\
             system_data_dirs = [{:?}]\n\
             mime_types_file = \"\"\n\
             probe_command = \"v-e2e-no-probe\"\n\
             {}",
            self.path().join("user").display().to_string(),
            self.path().join("system").display().to_string(),
            extra
        );
        fs::write(self.config_path(), content)?;
        Ok(())
    }

    /// Write a file under `<root>/applications/`
    pub fn write_store(&self, root: &str, name: &str, content: &str) -> Result<()> {
        let path = self.path().join(root).join("applications").join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    pub fn write_app(&self, root: &str, id: &str, exec: &str, mimes: &str) -> Result<()> {
        self.write_store(
            root,
            id,
            &format!(
                "[Desktop Entry]\nType=Application\nName={id}\nExec={exec}\nMimeType={mimes}\n"
            ),
        )
    }

    /// Create an empty media file, making parent folders as needed
    pub fn touch(&self, relative: &str) -> Result<PathBuf> {
        let path = self.media().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, b"")?;
        Ok(path)
    }
}

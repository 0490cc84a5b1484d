use anyhow::Result;
use std::path::Path;

use super::associations::{AssociationResolver, stores_for_roots};
use super::compose::RunnerComposer;
use super::controls::ParsedArgs;
use super::detect::MimeDetector;
use super::error::ResolveError;
use super::options::PlayOptions;
use super::player::PlayerTweak;
use super::probe::{ContentProbe, FileProbe};
use crate::common::config::VConfig;
use crate::common::shell;
use crate::ui::prelude::*;

/// Outcome of resolving one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prepared {
    pub mime: String,
    pub entry_id: String,
    pub command: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    /// Execute the composed command
    Run,
    /// Print the composed command to stdout
    Print,
    /// Print `path<TAB>mime<TAB>entry` without composing
    Query,
}

/// Everything needed to resolve targets, built once per invocation.
pub struct Launcher<P> {
    detector: MimeDetector<P>,
    resolver: AssociationResolver,
    player: PlayerTweak,
}

impl<P: ContentProbe> Launcher<P> {
    pub fn new(
        detector: MimeDetector<P>,
        resolver: AssociationResolver,
        player: PlayerTweak,
    ) -> Self {
        Self {
            detector,
            resolver,
            player,
        }
    }

    /// Launch every target; returns how many failed.
    pub fn launch_all(&self, args: &ParsedArgs, mode: LaunchMode) -> usize {
        let mut failures = args.missing.len();
        for word in &args.missing {
            emit(
                Level::Warn,
                "open.missing",
                &format!("Can't find file '{word}'"),
                None,
            );
        }

        for file in &args.files {
            if let Err(e) = self.launch_one(file, args, mode) {
                failures += 1;
                emit(
                    Level::Warn,
                    "open.failed",
                    &format!("{}: {e:#}", file.display()),
                    Some(serde_json::json!({ "path": file.display().to_string() })),
                );
            }
        }
        failures
    }

    /// Resolve `file` into the command that would be run for it.
    pub fn prepare(&self, file: &Path, options: &PlayOptions) -> Result<Prepared, ResolveError> {
        let composer = RunnerComposer::new(&self.detector, &self.resolver, &self.player);
        let resolution = composer.open(file, options)?;
        let command = resolution.command(file, options);

        Ok(Prepared {
            mime: resolution.mime,
            entry_id: resolution.entry_id,
            command,
        })
    }

    fn launch_one(&self, file: &Path, args: &ParsedArgs, mode: LaunchMode) -> Result<()> {
        let prepared = self.prepare(file, &args.options)?;
        crate::ui::debug("open.command", format!("Command: {}", prepared.command));

        match mode {
            LaunchMode::Query => match get_output_format() {
                OutputFormat::Json => emit(
                    Level::Info,
                    "open.query",
                    &prepared.command,
                    Some(serde_json::json!({
                        "path": file.display().to_string(),
                        "mime": prepared.mime,
                        "entry": prepared.entry_id,
                    })),
                ),
                OutputFormat::Text => {
                    println!("{}\t{}\t{}", file.display(), prepared.mime, prepared.entry_id)
                }
            },
            LaunchMode::Print => println!("{}", prepared.command),
            LaunchMode::Run => {
                let status = shell::run_shell(&prepared.command)?;
                if !status.success() {
                    emit(
                        Level::Warn,
                        "open.exit_status",
                        &format!("'{}' exited with {}", prepared.entry_id, status),
                        None,
                    );
                }
            }
        }
        Ok(())
    }
}

impl Launcher<FileProbe> {
    pub fn from_config(config: &VConfig) -> Self {
        let table = config.extension_table();
        let stores = stores_for_roots(&config.data_roots());
        crate::ui::debug(
            "open.setup",
            format!(
                "{} known extensions, {} association stores",
                table.len(),
                stores.len()
            ),
        );
        Self::new(
            MimeDetector::new(table, config.probe()),
            AssociationResolver::new(stores),
            config.player_tweak(),
        )
    }
}

/// Exit code for a run with `failures` failed targets.
pub fn exit_code(failures: usize) -> i32 {
    if failures == 0 { 0 } else { 1 }
}

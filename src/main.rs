mod common;
mod open;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use crate::common::config::VConfig;
use crate::open::controls::parse_words;
use crate::open::launch::{LaunchMode, Launcher, exit_code};
use crate::ui::prelude::*;

/// v - open files and folders with the application your desktop associates with them
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Activate debug mode
    #[arg(long, global = true)]
    debug: bool,

    /// Emit JSON lines instead of text
    #[arg(long)]
    json: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Config file (defaults to ~/.config/v/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Icon substituted for %i
    #[arg(long)]
    icon: Option<String>,

    /// Caption substituted for %c
    #[arg(long)]
    caption: Option<String>,

    /// Print the command instead of running it
    #[arg(long, conflicts_with = "query")]
    print: bool,

    /// Print path, mime type and chosen application instead of running anything
    #[arg(long)]
    query: bool,

    /// Files, folders and playback controls such as -6db, 1.5x, nosub
    #[arg(allow_hyphen_values = true, value_name = "ARGS")]
    args: Vec<String>,
}

impl Cli {
    fn mode(&self) -> LaunchMode {
        if self.query {
            LaunchMode::Query
        } else if self.print {
            LaunchMode::Print
        } else {
            LaunchMode::Run
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let config = VConfig::load(cli.config.as_deref())?;
    let controls = config.controls.compile()?;
    let cwd = std::env::current_dir().context("Unable to determine working directory")?;

    let mut parsed = parse_words(&cli.args, &controls, &cwd);
    parsed.options.icon = cli.icon.clone();
    parsed.options.caption = cli.caption.clone();

    let launcher = Launcher::from_config(&config);
    let failures = launcher.launch_all(&parsed, cli.mode());
    Ok(exit_code(failures))
}

fn main() {
    let cli = Cli::parse();

    ui::set_debug_mode(cli.debug);
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    ui::init(format, !cli.no_color);

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            emit(Level::Error, "v.error", &format!("Error: {e:#}"), None);
            std::process::exit(2);
        }
    }
}

//! Kilo - a small terminal text editor.
//!
//! # Usage
//!
//! ```bash
//! kilo
//! kilo main.c
//! kilo --tab-stop 4 notes.txt
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use kilo::app::App;
use kilo::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags,
};
use kilo::editor::DEFAULT_TAB_STOP;

/// A small terminal text editor with syntax highlighting and search
#[derive(Parser, Debug)]
#[command(name = "kilo", version, about, long_about = None)]
struct Cli {
    /// File to edit (created on first save if missing)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Width of a tab stop in columns
    #[arg(long, value_name = "N")]
    tab_stop: Option<usize>,

    /// Extra Ctrl-Q presses needed to quit with unsaved changes
    #[arg(long, value_name = "N")]
    quit_times: Option<u8>,

    /// Write debug events to a file
    #[arg(long, value_name = "PATH")]
    debug_log: Option<PathBuf>,

    /// Save current command-line flags as defaults in the global config
    #[arg(long)]
    save: bool,

    /// Clear saved defaults in the global config
    #[arg(long)]
    clear: bool,
}

/// Log to `path` at DEBUG, or to stderr at WARN when no path is given.
fn init_logging(path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open debug log {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(tracing::Level::DEBUG.into()),
                )
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(tracing::Level::WARN.into()),
                )
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&ConfigFlags {
        tab_stop: cli.tab_stop,
        quit_times: cli.quit_times,
        debug_log: cli.debug_log.clone(),
    });

    let debug_log = effective
        .debug_log
        .clone()
        .or_else(|| std::env::var_os("KILO_DEBUG_LOG").map(PathBuf::from));
    init_logging(debug_log.as_deref())?;

    let mut app = App::new(cli.file).with_tab_stop(effective.tab_stop.unwrap_or(DEFAULT_TAB_STOP));
    if let Some(quit_times) = effective.quit_times {
        app = app.with_quit_times(quit_times);
    }

    app.run().context("Application error")
}

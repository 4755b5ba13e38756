use anyhow::Result;
use clap::Parser;
use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use athlete_results_cli::commands::Cli;

/// Logs go to stderr, except while the terminal view owns the screen
fn log_writer(cli: &Cli) -> BoxMakeWriter {
    if !cli.is_interactive() {
        return BoxMakeWriter::new(std::io::stderr);
    }

    let file = cli.log_file().and_then(|path| {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        Ok(OpenOptions::new().create(true).append(true).open(path)?)
    });

    match file {
        Ok(file) => BoxMakeWriter::new(Mutex::new(file)),
        Err(_) => BoxMakeWriter::new(std::io::sink),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; --verbose raises the default level
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_ansi(!cli.is_interactive())
        .with_writer(log_writer(&cli))
        .init();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async { cli.execute().await })
}

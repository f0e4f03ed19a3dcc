//! Solr SQL Shell
//!
//! An interactive shell for the SQL dialect of Apache Solr with grammar-aware
//! completion. Statements are not executed here: each submitted statement is
//! written to standard output, one per line, for an executor downstream.
//!
//! # Features
//!
//! - Interactive REPL with a completion menu on Tab
//! - Keyword, aggregate and schema name suggestions that follow the grammar
//! - Schema files in TOML or JSON
//! - Persistent history and configuration
//!
//! # Usage
//!
//! ```bash
//! # Interactive mode
//! solrsh --schema schema.toml
//!
//! # Show what would be suggested
//! solrsh --schema schema.toml suggest "SELECT * FROM "
//! ```

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use solrsh::cli::CliInterface;
use solrsh::error::Result;
use solrsh::{ReplEngine, SchemaCatalog};

/// Application entry point
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Main application logic
///
/// This function orchestrates the application startup:
/// 1. Parse command-line arguments
/// 2. Load configuration
/// 3. Initialize logging
/// 4. Handle subcommands or start the REPL
///
/// # Returns
/// * `Result<()>` - Success or error
fn run() -> Result<()> {
    let cli = CliInterface::new()?;

    initialize_logging(&cli)?;

    if cli.handle_subcommand()? {
        return Ok(());
    }

    cli.print_banner();

    run_interactive_mode(&cli)
}

/// Run application in interactive REPL mode
fn run_interactive_mode(cli: &CliInterface) -> Result<()> {
    let catalog: Arc<dyn SchemaCatalog> = Arc::new(cli.build_catalog()?);
    let mut repl = ReplEngine::new(
        catalog,
        &cli.config().history,
        &cli.config().completion,
        cli.color_enabled(),
    )?;

    run_repl_loop(&mut repl)?;

    eprintln!("GoodBye!");
    Ok(())
}

/// Main REPL loop
fn run_repl_loop(repl: &mut ReplEngine) -> Result<()> {
    let stdout = io::stdout();

    loop {
        let input = match repl.read_line()? {
            Some(line) if !line.trim().is_empty() => line,
            Some(_) => continue,
            None => break,
        };

        if is_exit_command(&input) {
            break;
        }

        let statement = repl.submit(&input);

        let mut out = stdout.lock();
        writeln!(out, "{}", statement)?;
        out.flush()?;
    }

    Ok(())
}

/// Check whether the line ends the session
fn is_exit_command(line: &str) -> bool {
    let line = line.trim();
    line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit")
}

/// Initialize logging system
///
/// `RUST_LOG` takes precedence over the configured level. Logs go to the
/// configured file, or to stderr when none is set.
///
/// # Arguments
/// * `cli` - CLI interface with logging settings
///
/// # Returns
/// * `Result<()>` - Success or error opening the log file
fn initialize_logging(cli: &CliInterface) -> Result<()> {
    let logging = &cli.config().logging;
    let level = logging.level.to_tracing_level();

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    let (writer, ansi) = match &logging.file_path {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            (BoxMakeWriter::new(Arc::new(file)), false)
        }
        None => (BoxMakeWriter::new(io::stderr), cli.color_enabled()),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(false);

    if logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_commands() {
        assert!(is_exit_command("exit"));
        assert!(is_exit_command("  QUIT "));
        assert!(!is_exit_command("exit now"));
        assert!(!is_exit_command("SELECT * FROM exit"));
    }
}

//! Command-line interface for solrsh
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and validation
//! - Schema catalog selection
//! - One-shot subcommands (version, completion scripts, config, suggest)

pub mod completion;

use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use crate::catalog::StaticCatalog;
use crate::config::{Config, LogLevel};
use crate::error::Result;
use crate::repl::completion::{CompletionEngine, GrammarState};

/// Solr SQL shell with grammar-aware completion
#[derive(Parser, Debug)]
#[command(
    name = "solrsh",
    version,
    about = "Interactive SQL shell for Solr with grammar-aware completion",
    long_about = "An interactive shell for the SQL dialect of Apache Solr. As you type,
it suggests the keywords, aggregate functions and schema names that may come next."
)]
pub struct CliArgs {
    /// Schema file with collection and field names (TOML or JSON)
    #[arg(short = 's', long, value_name = "FILE")]
    pub schema: Option<PathBuf>,

    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Quiet mode (minimal output)
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose mode (detailed logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "vv")]
    pub very_verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands for solrsh
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version information
    Version,

    /// Generate shell completion script
    Completion {
        /// Shell type (bash, zsh, fish, powershell)
        #[arg(value_name = "SHELL")]
        shell: String,
    },

    /// Show configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Validate configuration file
        #[arg(long)]
        validate: bool,
    },

    /// Print the suggestions offered after typing TEXT
    Suggest {
        /// Statement text, as typed so far
        #[arg(value_name = "TEXT")]
        text: String,
    },
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Create a new CLI interface from the process arguments
    ///
    /// # Returns
    /// * `Result<Self>` - New CLI interface or error
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    /// Create a CLI interface from already parsed arguments
    ///
    /// # Arguments
    /// * `args` - Command-line arguments
    ///
    /// # Returns
    /// * `Result<Self>` - New CLI interface or error
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Self::load_config(&args)?;
        Ok(Self { args, config })
    }

    /// Load configuration from file and merge with arguments
    ///
    /// # Arguments
    /// * `args` - Command-line arguments
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    fn load_config(args: &CliArgs) -> Result<Config> {
        let config_path = args.config_file.as_deref();
        let mut config = Config::load_from_file(config_path)?;

        // Logging is not up yet, so warnings go straight to stderr
        if let Err(e) = config.validate() {
            eprintln!("Warning: Configuration validation failed: {}", e);
            eprintln!("Using default configuration instead.");
            config = Config::default();
        }

        Self::apply_args_to_config(&mut config, args);

        Ok(config)
    }

    /// Get the configuration
    ///
    /// # Returns
    /// * `&Config` - Reference to configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the CLI arguments
    ///
    /// # Returns
    /// * `&CliArgs` - Reference to arguments
    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    /// Check whether the line editor may use ANSI colors
    pub fn color_enabled(&self) -> bool {
        !self.args.no_color
    }

    /// Build the schema catalog, `--schema` taking precedence over the config
    ///
    /// # Returns
    /// * `Result<StaticCatalog>` - Catalog or error
    pub fn build_catalog(&self) -> Result<StaticCatalog> {
        self.config.build_catalog(self.args.schema.as_deref())
    }

    /// Apply CLI arguments to configuration
    ///
    /// Overrides configuration values with CLI arguments where provided
    ///
    /// # Arguments
    /// * `config` - Configuration to modify
    fn apply_args_to_config(config: &mut Config, args: &CliArgs) {
        config.logging.level = if args.very_verbose {
            LogLevel::Trace
        } else if args.verbose {
            LogLevel::Debug
        } else if args.quiet {
            LogLevel::Error
        } else {
            config.logging.level
        };
    }

    /// Handle subcommands
    ///
    /// # Returns
    /// * `Result<bool>` - True if subcommand was handled, false to continue
    pub fn handle_subcommand(&self) -> Result<bool> {
        match &self.args.command {
            Some(Commands::Version) => {
                self.show_version();
                Ok(true)
            }
            Some(Commands::Completion { shell }) => {
                completion::generate_completion(shell)?;
                Ok(true)
            }
            Some(Commands::Config { show, validate }) => {
                self.handle_config_command(*show, *validate)?;
                Ok(true)
            }
            Some(Commands::Suggest { text }) => {
                let state = self.write_suggestions(text, &mut io::stdout().lock())?;
                let marker = if state.is_queryable() {
                    " (queryable)"
                } else {
                    ""
                };
                eprintln!("state: {state}{marker}");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Show version information
    fn show_version(&self) {
        println!("solrsh version {}", env!("CARGO_PKG_VERSION"));
        println!("Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
    }

    /// Replay `text` as typed and write its suggestions, one per line
    ///
    /// # Arguments
    /// * `text` - Statement text typed so far
    /// * `out` - Destination of the suggestions
    ///
    /// # Returns
    /// * `Result<GrammarState>` - Grammar state reached after the text
    fn write_suggestions<W: Write>(&self, text: &str, out: &mut W) -> Result<GrammarState> {
        let catalog = self.build_catalog()?;
        let mut engine = CompletionEngine::new(Arc::new(catalog));

        let set = engine.complete(text)?;
        for candidate in &set.candidates {
            writeln!(out, "{candidate}")?;
        }

        Ok(engine.state())
    }

    /// Handle config subcommand
    ///
    /// # Arguments
    /// * `show` - Whether to show configuration
    /// * `validate` - Whether to validate configuration
    ///
    /// # Returns
    /// * `Result<()>` - Success or error
    fn handle_config_command(&self, show: bool, validate: bool) -> Result<()> {
        if validate {
            self.validate_config_file();
        }

        if show {
            self.show_config()?;
        }

        Ok(())
    }

    /// Validate configuration file
    fn validate_config_file(&self) {
        let path = self.get_config_path();
        println!("Validating configuration file: {}", path.display());

        if !path.exists() {
            println!("❌ Configuration file does not exist");
            return;
        }

        match Config::from_file(&path) {
            Ok(config) => match config.validate() {
                Ok(_) => println!("✅ Configuration is valid"),
                Err(e) => println!("❌ Configuration validation failed: {}", e),
            },
            Err(e) => println!("❌ Failed to load configuration: {}", e),
        }
    }

    /// Show effective configuration
    fn show_config(&self) -> Result<()> {
        let path = self.get_config_path();
        println!("Configuration file: {}", path.display());
        println!();
        println!("=== Effective Configuration ===");
        println!();
        println!("{}", self.config.to_toml()?);

        Ok(())
    }

    /// Get configuration file path (from args or default)
    fn get_config_path(&self) -> PathBuf {
        self.args
            .config_file
            .clone()
            .unwrap_or_else(Config::default_config_path)
    }

    /// Print banner with version and usage hint
    pub fn print_banner(&self) {
        if !self.args.quiet {
            eprintln!("Using solrsh: {}", env!("CARGO_PKG_VERSION"));
            eprintln!("Press Tab for suggestions, type 'exit' or 'quit' to leave.");
        }
    }
}

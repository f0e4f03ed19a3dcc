//! Shell completion generation for solrsh
//!
//! This module provides functionality to generate shell completion scripts
//! for bash, zsh, fish, and PowerShell.

use clap::CommandFactory;
use clap_complete::{Shell, generate};
use std::io::{self, Write};

use crate::cli::CliArgs;
use crate::error::{ConfigError, Result, SolrshError};

/// Binary name the scripts complete
const BIN_NAME: &str = "solrsh";

/// Generate shell completion script on standard output
///
/// # Arguments
/// * `shell_name` - Shell type (bash, zsh, fish, powershell)
///
/// # Returns
/// * `Result<()>` - Success or error
pub fn generate_completion(shell_name: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    write_completion(shell_name, &mut stdout)?;
    stdout.flush()?;
    Ok(())
}

/// Write the completion script for `shell_name` into `out`
pub fn write_completion<W: Write>(shell_name: &str, out: &mut W) -> Result<()> {
    let shell = parse_shell(shell_name)?;
    let mut cmd = CliArgs::command();
    generate(shell, &mut cmd, BIN_NAME, out);
    Ok(())
}

/// Parse shell name string to Shell enum
fn parse_shell(shell_name: &str) -> Result<Shell> {
    match shell_name.to_lowercase().as_str() {
        "bash" => Ok(Shell::Bash),
        "zsh" => Ok(Shell::Zsh),
        "fish" => Ok(Shell::Fish),
        "powershell" | "pwsh" => Ok(Shell::PowerShell),
        _ => Err(SolrshError::Config(ConfigError::Generic(format!(
            "Unsupported shell: {}. Supported shells: bash, zsh, fish, powershell",
            shell_name
        )))),
    }
}

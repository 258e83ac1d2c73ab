//! Command-line arguments.

use clap::{Parser, Subcommand};
use contactbook_core::{default_log_level, Department};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "contactbook")]
#[command(about = "Headless driver for the contact book state store")]
#[command(version)]
pub struct Cli {
    /// SQLite file holding the contact snapshot (defaults to ./contactbook.sqlite3).
    #[arg(long, env = "CONTACTBOOK_DB", value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Absolute directory for rolling log files. Logging is off when omitted.
    #[arg(long, env = "CONTACTBOOK_LOG_DIR", value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error.
    #[arg(long, default_value_t = default_log_level().to_string())]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print contacts matching the given filters
    List {
        /// Case-insensitive substring of name or email
        #[arg(long, short = 's')]
        search: Option<String>,
        /// Department label (Ventas, Desarrollo, Marketing, Soporte)
        #[arg(long, short = 'd', value_parser = parse_department)]
        department: Option<Department>,
    },
    /// Add a contact and print its id
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, value_parser = parse_department)]
        department: Department,
    },
    /// Delete a contact by id
    Delete { id: String },
    /// Wipe stored contacts and restore the seed dataset
    Reset,
}

fn parse_department(value: &str) -> Result<Department, String> {
    value.parse::<Department>().map_err(|err| err.to_string())
}

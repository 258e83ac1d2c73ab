//! CLI entry point.
//!
//! # Responsibility
//! - Drive the contact store headlessly: one command per process.
//! - Flush pending snapshot writes and buffered log lines before exit.

mod cli;

use clap::Parser;
use cli::{Cli, Command};
use contactbook_core::config::DEFAULT_DB_FILE_NAME;
use contactbook_core::{
    flush_logging, init_logging, AppState, Contact, ContactFormData, StoreConfig, StoreError,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_ref() {
        if let Err(err) = init_logging(&cli.log_level, &log_dir.to_string_lossy()) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    let code = match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    };
    flush_logging();
    code
}

fn run(cli: Cli) -> Result<(), StoreError> {
    let db_path = cli.db.unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE_NAME));
    // No UI to animate, so the loading window is closed right away.
    let config = StoreConfig::file(db_path).with_loading_delay(Duration::ZERO);
    let mut state = AppState::init(config)?;
    state.tick();

    match cli.command {
        Command::List { search, department } => {
            if let Some(search) = search {
                state.set_search_filter(search);
            }
            state.set_department_filter(department);
            for contact in state.filtered_contacts() {
                print_contact(contact);
            }
            println!("{} result(s)", state.results_count());
        }
        Command::Add {
            name,
            email,
            phone,
            department,
        } => {
            let form = ContactFormData::new(name, email, phone, department);
            let contact = state.add_contact(form)?;
            println!("added {}", contact.id);
        }
        Command::Delete { id } => {
            if state.delete_contact(&id) {
                println!("deleted {id}");
            } else {
                println!("no contact with id {id}");
            }
        }
        Command::Reset => {
            state.reset();
            println!("restored {} seed contact(s)", state.contacts().len());
        }
    }

    state.dispose();
    Ok(())
}

fn print_contact(contact: &Contact) {
    let phone = if contact.phone.is_empty() {
        "-"
    } else {
        contact.phone.as_str()
    };
    println!(
        "{}\t{}\t{}\t{}\t{}",
        contact.id, contact.name, contact.email, phone, contact.department
    );
}

//! Pet catalog command-line entry point.
//!
//! # Responsibility
//! - Expose the catalog actions (list, insert sample, delete all) without a UI.
//! - Read settings from `PETS_*` environment variables.
//!
//! Exit codes: `0` success, `1` runtime error, `2` usage error.

use clap::{Parser, Subcommand};
use pets_core::config::DEFAULT_DB_FILE_NAME;
use pets_core::{core_version, CatalogService, PetStoreConfig};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Pet catalog backed by a local SQLite file", long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// List every pet as `id<TAB>name<TAB>breed`, ordered by id
    List,
    /// Insert the sample pet (Toto, Terrier, male, 7 kg)
    InsertDummy,
    /// Delete every pet in the catalog
    DeleteAll,
    /// Print the core library version
    Version,
}

fn main() -> ExitCode {
    // Usage errors exit with status 2 inside clap.
    let cli = Cli::parse();

    if cli.command == Command::Version {
        println!("pets_core version={}", core_version());
        return ExitCode::SUCCESS;
    }

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::from(1)
        }
    }
}

fn run(command: Command) -> Result<(), String> {
    let mut config = PetStoreConfig::from_env().map_err(|err| err.to_string())?;
    if config.db_path.is_none() {
        config.db_path = Some(PathBuf::from(DEFAULT_DB_FILE_NAME));
    }
    config.init_logging()?;

    let provider = config.build_provider();
    let catalog = CatalogService::new(&provider);

    match command {
        Command::List => {
            let entries = catalog.list_entries().map_err(|err| err.to_string())?;
            if entries.is_empty() {
                println!("no pets in catalog");
            }
            for entry in entries {
                println!("{}\t{}\t{}", entry.id, entry.name, entry.breed);
            }
        }
        Command::InsertDummy => {
            let inserted = catalog.insert_dummy_pet().map_err(|err| err.to_string())?;
            println!("inserted {}", provider.uri_for(inserted));
        }
        Command::DeleteAll => {
            let deleted = catalog.delete_all().map_err(|err| err.to_string())?;
            println!("deleted {deleted} pets");
        }
        Command::Version => {}
    }
    log::debug!("event=cli_command module=cli status=ok command={command:?}");
    Ok(())
}

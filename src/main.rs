use std::process::ExitCode;
use std::time::SystemTime;

use clap::{Parser, Subcommand};
use rusqlite::Connection;
use serde::Serialize;

use crate::browse::service::{browse, full_hierarchy};
use crate::config::SyncConfig;
use crate::remote::local::LocalFolderStore;
use crate::repository::{initialize_db, open_connection};
use crate::sync::service::{latest_run, run_sync};

mod browse;
mod catalog;
mod classifier;
mod config;
mod model;
mod remote;
mod repository;
mod sync;
mod tags;
#[cfg(test)]
mod test;

#[derive(Parser)]
#[command(
    version,
    about = "Syncs a curated folder tree into a tag hierarchy and a resource catalog"
)]
struct Cli {
    /// log every folder and file, not just the run summary
    #[arg(short, long)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// walk the configured root folder and bring the catalog up to date
    Sync,
    /// print every hierarchy tree as json
    Hierarchy,
    /// print what someone navigating to a path of tag names or slugs would see, as json
    Browse { segments: Vec<String> },
    /// print the most recent sync run
    Report,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = setup_logger(cli.verbose) {
        eprintln!("Failed to set up logging: {e}");
        return ExitCode::FAILURE;
    }
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            log::error!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn setup_logger(verbose: bool) -> Result<(), fern::InitError> {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                humantime::format_rfc3339_seconds(SystemTime::now()),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()?;
    Ok(())
}

fn run(command: Command) -> Result<(), String> {
    let config =
        crate::config::load_config().map_err(|e| format!("Failed to parse config file: {e}"))?;
    let con = open_database(&config)?;
    let res = match command {
        Command::Sync => {
            let store = LocalFolderStore::new(&config.remote.local_root, config.remote.page_size);
            run_sync(&config, &store, &con)
                .map(|report| println!("{report}"))
                .map_err(|e| e.to_string())
        }
        Command::Hierarchy => full_hierarchy(&con)
            .map_err(|e| format!("Failed to load the hierarchy: {e:?}"))
            .and_then(|forest| print_json(&forest)),
        Command::Browse { segments } => browse(&segments, &con)
            .map_err(|e| format!("Failed to browse {}: {e:?}", segments.join("/")))
            .and_then(|result| {
                if !result.unmatched.is_empty() {
                    log::warn!(
                        "Nothing matched {}, showing {} instead",
                        result.unmatched.join(", "),
                        result
                            .node()
                            .map_or("the top of the hierarchy", |tag| tag.name.as_str())
                    );
                }
                print_json(&result)
            }),
        Command::Report => match latest_run(&con) {
            Ok(Some(run)) => {
                println!("Run #{}\n{}", run.id, run.report);
                Ok(())
            }
            Ok(None) => {
                println!("No sync has been run yet");
                Ok(())
            }
            Err(e) => Err(e.to_string()),
        },
    };
    if let Err((_, e)) = con.close() {
        log::warn!("Failed to close the database cleanly: {e:?}");
    }
    res
}

fn open_database(config: &SyncConfig) -> Result<Connection, String> {
    let location = &config.database.location;
    let con = open_connection(location)
        .map_err(|e| format!("Failed to open the database at {location}: {e}"))?;
    initialize_db(&con).map_err(|e| format!("Failed to initialize the database at {location}: {e}"))?;
    Ok(con)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let json =
        serde_json::to_string_pretty(value).map_err(|e| format!("Failed to serialize output: {e}"))?;
    println!("{json}");
    Ok(())
}

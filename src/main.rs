#[macro_use] extern crate prettytable;

use structopt::StructOpt;
use anyhow::anyhow;
use std::path::PathBuf;
use directories::ProjectDirs;

mod cli;
mod infer;
mod interface;
mod model;
mod remind;

use rusqlite::Connection;
use crate::model::init_journal;

use cli::{Command::*, CommandLineArgs};

fn find_default_journal_file() -> Option<PathBuf> {
    if let Some(base_dirs) = ProjectDirs::from("com", "nudge", "nudge") {
        let root_dir = base_dirs.data_dir();
        if !root_dir.exists() {
            std::fs::create_dir_all(root_dir).expect("Failed to create data directory.");
        }
        let mut path = PathBuf::from(root_dir);
        path.push("db.sqlite");
        Some(path)
    } else {
        None
    }
}

/// Get a connection to the journal database, creating it if it does
/// not exist.
pub fn get_journal_db(journal_path: PathBuf) -> anyhow::Result<Connection> {
    let journal_exists = journal_path.exists();
    let db = Connection::open(&journal_path)?;
    if !journal_exists {
        init_journal(&db)?;
    }
    Ok(db)
}

fn main() -> anyhow::Result<()> {
    let CommandLineArgs {
        action,
        journal_file,
    } = CommandLineArgs::from_args();

    // Unpack the journal file.
    let journal_file = journal_file
        .or_else(find_default_journal_file)
        .ok_or(anyhow!("Failed to find journal file."))?;

    let database = get_journal_db(journal_file)?;

    // Perform the action.
    match action {
        Add { text } => interface::add(database, text),
        List => interface::list(database),
        Done { id } => interface::done(database, id),
        Rm { id } => interface::remove(database, id),
        Summary => interface::summary(database),
        Remind => interface::remind(database),
    }?;
    Ok(())
}

//! Subcommand implementations.

mod embed;
mod ingest;
mod search;
mod show;

use std::io::Write;

use envcat_core::EnvcatConfig;
use envcat_storage::SqliteRecordStore;

use crate::args::Command;

pub use embed::embed;
pub use ingest::ingest;
pub use search::search;
pub use show::show;

pub fn run(command: &Command, config: &EnvcatConfig, out: &mut dyn Write) -> anyhow::Result<()> {
    match command {
        Command::Ingest { ids } => ingest(config, ids, out),
        Command::Embed => embed(config, out),
        Command::Search(args) => search(config, args, out),
        Command::Show { natural_key } => show(config, natural_key, out),
    }
}

fn open_store(config: &EnvcatConfig) -> anyhow::Result<SqliteRecordStore> {
    Ok(SqliteRecordStore::open(&config.storage)?)
}

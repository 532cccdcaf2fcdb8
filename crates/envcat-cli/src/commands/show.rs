use std::io::Write;

use anyhow::bail;
use envcat_core::traits::IRecordStore;
use envcat_core::EnvcatConfig;

use super::open_store;

pub fn show(config: &EnvcatConfig, natural_key: &str, out: &mut dyn Write) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let Some(record) = store.get(natural_key)? else {
        bail!("no dataset stored under {natural_key}");
    };
    writeln!(out, "{}", serde_json::to_string_pretty(&record)?)?;
    Ok(())
}

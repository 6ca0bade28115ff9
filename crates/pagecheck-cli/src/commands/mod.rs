use anyhow::Result;
use pagecheck_config::AppConfig;
use pagecheck_store::Store;
use serde::Serialize;
use std::io::{self, Write};

pub mod batch;
pub mod check;
pub mod completions;
pub mod records;
pub mod split;

pub struct Context<'a> {
    pub store: &'a Store,
    pub json: bool,
    pub config: &'a AppConfig,
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

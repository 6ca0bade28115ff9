use crate::commands::print_json;
use crate::error::invalid_input;
use crate::util::file_stem;
use anyhow::{Context as _, Result};
use clap::Args;
use pagecheck_ingest::csv;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub const DEFAULT_PARTS: usize = 3;

#[derive(Debug, Args)]
pub struct SplitArgs {
    pub file: PathBuf,
    #[arg(long, default_value_t = DEFAULT_PARTS)]
    pub parts: usize,
    /// Defaults to the input file's directory
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct SplitReport {
    files: Vec<String>,
}

pub fn split(json: bool, args: SplitArgs) -> Result<()> {
    if args.parts == 0 {
        return Err(invalid_input("--parts must be greater than zero"));
    }
    let data = fs::read_to_string(&args.file)
        .with_context(|| format!("read csv file {}", args.file.display()))?;
    let stem = file_stem(&args.file)?;
    let chunks = csv::split_csv(&data, args.parts)?;

    let out_dir = match args.out_dir {
        Some(dir) => dir,
        None => args
            .file
            .parent()
            .map(PathBuf::from)
            .unwrap_or_default(),
    };
    if !out_dir.as_os_str().is_empty() {
        fs::create_dir_all(&out_dir)
            .with_context(|| format!("create output directory {}", out_dir.display()))?;
    }

    let mut files = Vec::with_capacity(chunks.len());
    for (name, chunk) in csv::split_file_names(&stem, args.parts)
        .into_iter()
        .zip(chunks)
    {
        let path = out_dir.join(name);
        fs::write(&path, chunk).with_context(|| format!("write {}", path.display()))?;
        debug!(path = %path.display(), "split part written");
        files.push(path.display().to_string());
    }

    if json {
        return print_json(&SplitReport { files });
    }
    for file in files {
        println!("{}", file);
    }
    Ok(())
}

use crate::commands::{print_json, Context};
use crate::error::{invalid_input, not_found};
use crate::util::{format_timestamp_datetime, found_label, now_utc, parse_record_id, parse_status};
use anyhow::{Context as _, Result};
use clap::Args;
use pagecheck_core::domain::{RecordStatus, VerificationOutcome};
use pagecheck_ingest::csv::{self, ImportReport, ReportRow};
use pagecheck_store::repo::StoredRecord;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// CSV file with first_name, last_name, job_title, phone and url columns
    pub file: PathBuf,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// not_processed, processing, processed or error
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub id: String,
}

#[derive(Debug, Args)]
pub struct StatusArgs {}

#[derive(Debug, Args)]
pub struct ResetArgs {
    /// Also retry records that failed
    #[arg(long)]
    pub include_errors: bool,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[arg(long)]
    pub out: Option<PathBuf>,
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
struct RecordDto {
    id: i64,
    first_name: String,
    last_name: String,
    job_title: String,
    phone: String,
    url: String,
    status: RecordStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<VerificationOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl From<StoredRecord> for RecordDto {
    fn from(stored: StoredRecord) -> Self {
        Self {
            id: stored.id.0,
            first_name: stored.record.first_name,
            last_name: stored.record.last_name,
            job_title: stored.record.job_title,
            phone: stored.record.phone,
            url: stored.record.url,
            status: stored.status,
            outcome: stored.outcome,
            error: stored.error,
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
struct StatusReport {
    not_processed: i64,
    processing: i64,
    processed: i64,
    error: i64,
    total: i64,
}

#[derive(Debug, Serialize)]
struct ResetReport {
    requeued: usize,
}

#[derive(Debug, Serialize)]
struct ExportReport {
    count: usize,
    output: Option<String>,
}

pub fn import(ctx: &Context<'_>, args: ImportArgs) -> Result<()> {
    let data = fs::read_to_string(&args.file)
        .with_context(|| format!("read csv file {}", args.file.display()))?;
    let parsed = csv::parse_records(&data)?;
    let inserted = ctx
        .store
        .records()
        .insert_many(now_utc(), &parsed.records)?;
    info!(
        imported = inserted.inserted,
        duplicates = inserted.duplicates,
        skipped = parsed.skipped,
        "csv import finished"
    );
    let report = ImportReport {
        imported: inserted.inserted,
        duplicates: inserted.duplicates,
        skipped: parsed.skipped,
        warnings: parsed.warnings,
    };

    if ctx.json {
        return print_json(&report);
    }

    println!(
        "Imported records: new {}, duplicates {}, skipped {}",
        report.imported, report.duplicates, report.skipped
    );
    if !report.warnings.is_empty() {
        println!("Warnings:");
        for warning in report.warnings {
            println!("- {}", warning);
        }
    }
    Ok(())
}

pub fn list(ctx: &Context<'_>, args: ListArgs) -> Result<()> {
    let status = args.status.as_deref().map(parse_status).transpose()?;
    let records = ctx.store.records().list(status)?;
    debug!(count = records.len(), "records listed");

    if ctx.json {
        let dtos: Vec<RecordDto> = records.into_iter().map(RecordDto::from).collect();
        return print_json(&dtos);
    }

    if records.is_empty() {
        println!("no records");
        return Ok(());
    }
    for stored in records {
        println!("{}", format_record_line(&stored));
    }
    Ok(())
}

pub fn show(ctx: &Context<'_>, args: ShowArgs) -> Result<()> {
    let id = parse_record_id(&args.id)?;
    let stored = ctx
        .store
        .records()
        .get(id)?
        .ok_or_else(|| not_found(format!("record {id} not found")))?;

    if ctx.json {
        return print_json(&RecordDto::from(stored));
    }

    let full_name = stored.record.full_name();
    println!("id: {}", stored.id);
    println!(
        "name: {}",
        if full_name.is_empty() { "-" } else { &full_name }
    );
    println!("job title: {}", or_dash(&stored.record.job_title));
    println!("phone: {}", or_dash(&stored.record.phone));
    println!("url: {}", stored.record.url);
    println!("status: {}", stored.status);
    if let Some(outcome) = &stored.outcome {
        println!(
            "name found: {} ({})",
            found_label(outcome.name_found),
            outcome.name_source.as_str()
        );
        println!(
            "job title found: {} ({})",
            found_label(outcome.job_title_found),
            outcome.job_title_source.as_str()
        );
        match &outcome.matched_phone_candidate {
            Some(candidate) => println!("phone found: yes ({candidate})"),
            None => println!("phone found: no"),
        }
    }
    if let Some(error) = &stored.error {
        println!("error: {error}");
    }
    println!("updated: {}", format_timestamp_datetime(stored.updated_at));
    Ok(())
}

pub fn status(ctx: &Context<'_>, _args: StatusArgs) -> Result<()> {
    let counts = ctx.store.records().status_counts()?;
    let report = StatusReport {
        not_processed: counts.not_processed,
        processing: counts.processing,
        processed: counts.processed,
        error: counts.error,
        total: counts.total(),
    };

    if ctx.json {
        return print_json(&report);
    }

    for status in RecordStatus::all() {
        println!("{:<14} {}", status.as_str(), counts.get(*status));
    }
    println!("{:<14} {}", "total", report.total);
    Ok(())
}

pub fn reset(ctx: &Context<'_>, args: ResetArgs) -> Result<()> {
    let requeued = ctx
        .store
        .records()
        .requeue(now_utc(), args.include_errors)?;
    info!(requeued, include_errors = args.include_errors, "records requeued");

    if ctx.json {
        return print_json(&ResetReport { requeued });
    }
    println!("Requeued {} records", requeued);
    Ok(())
}

pub fn export(ctx: &Context<'_>, args: ExportArgs) -> Result<()> {
    if ctx.json && args.out.is_none() {
        return Err(invalid_input("--json requires --out for export"));
    }
    let status = args.status.as_deref().map(parse_status).transpose()?;
    let records = ctx.store.records().list(status)?;
    let rows: Vec<ReportRow<'_>> = records
        .iter()
        .map(|stored| ReportRow {
            record: &stored.record,
            status: stored.status,
            outcome: stored.outcome.as_ref(),
            error: stored.error.as_deref(),
        })
        .collect();
    let data = csv::write_report(&rows);

    match args.out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("create export directory {}", parent.display())
                    })?;
                }
            }
            fs::write(&path, data)
                .with_context(|| format!("write export file {}", path.display()))?;
            if ctx.json {
                print_json(&ExportReport {
                    count: rows.len(),
                    output: Some(path.display().to_string()),
                })?;
            } else {
                println!("Exported {} records to {}", rows.len(), path.display());
            }
        }
        None => print!("{}", data),
    }
    Ok(())
}

fn format_record_line(stored: &StoredRecord) -> String {
    let full_name = stored.record.full_name();
    let mut line = format!(
        "{:>5}  {:<13}  {}  {}",
        stored.id,
        stored.status.as_str(),
        if full_name.is_empty() { "-" } else { &full_name },
        stored.record.url
    );
    if let Some(outcome) = &stored.outcome {
        line.push_str(&format!(
            "  name={} title={} phone={}",
            found_label(outcome.name_found),
            found_label(outcome.job_title_found),
            found_label(outcome.phone_found)
        ));
    }
    if let Some(error) = &stored.error {
        line.push_str(&format!("  error: {error}"));
    }
    line
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}

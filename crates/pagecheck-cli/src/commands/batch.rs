use crate::commands::{print_json, Context};
use crate::error::invalid_input;
use crate::util::now_utc;
use anyhow::{Context as _, Result};
use clap::Args;
use pagecheck_config::TranslationConfig;
use pagecheck_core::Translator;
use pagecheck_ingest::extract::PhoneExtractor;
use pagecheck_ingest::pages::PageIndex;
use pagecheck_ingest::translate::{HttpTranslator, HttpTranslatorOptions, PageTranslator};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

const MISSING_PAGE: &str = "no page artifacts for url";

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Page JSON file or directory of page JSON files
    #[arg(long)]
    pub pages: PathBuf,
    /// Stop after this many records
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Serialize)]
struct RunReport {
    requeued: usize,
    processed: usize,
    errors: usize,
    name_found: usize,
    job_title_found: usize,
    phone_found: usize,
    warnings: Vec<String>,
}

pub fn run(ctx: &Context<'_>, args: RunArgs) -> Result<()> {
    if args.limit == Some(0) {
        return Err(invalid_input("--limit must be greater than zero"));
    }
    let records = ctx.store.records();
    let mut report = RunReport {
        requeued: records.requeue(now_utc(), false)?,
        ..RunReport::default()
    };
    if report.requeued > 0 {
        info!(count = report.requeued, "requeued interrupted records");
    }

    let phone = &ctx.config.phone;
    let extractor = PhoneExtractor::new(phone.min_candidate_digits, phone.max_candidate_digits);
    let index = PageIndex::load(&args.pages, &extractor)
        .with_context(|| format!("load pages from {}", args.pages.display()))?;
    debug!(pages = index.len(), "page artifacts loaded");
    for warning in &index.warnings {
        warn!(%warning, "page index");
    }
    report.warnings.extend(index.warnings.iter().cloned());

    let http = http_translator(&ctx.config.translation);
    let fallback = http.as_ref().map(|translator| translator as &dyn Translator);
    let verifier = ctx.config.verifier();

    while args.limit.is_none_or(|limit| report.processed + report.errors < limit) {
        let Some(stored) = records.next_pending()? else {
            break;
        };
        let id = stored.id;
        records.mark_processing(now_utc(), id)?;

        let Some(artifacts) = index.get(&stored.record.url) else {
            warn!(record = %id, url = %stored.record.url, "{MISSING_PAGE}");
            records.mark_error(now_utc(), id, MISSING_PAGE)?;
            report.errors += 1;
            continue;
        };

        let translator = PageTranslator::new(artifacts.translated_text.as_deref(), fallback);
        let outcome = verifier.verify(&stored.record, artifacts, &translator);
        records.record_outcome(now_utc(), id, &outcome)?;
        debug!(
            record = %id,
            url = %stored.record.url,
            name = outcome.name_source.as_str(),
            job_title = outcome.job_title_source.as_str(),
            phone = outcome.phone_found,
            "record verified"
        );

        report.processed += 1;
        report.name_found += usize::from(outcome.name_found);
        report.job_title_found += usize::from(outcome.job_title_found);
        report.phone_found += usize::from(outcome.phone_found);
    }

    info!(
        processed = report.processed,
        errors = report.errors,
        "run finished"
    );

    if ctx.json {
        return print_json(&report);
    }

    if report.requeued > 0 {
        println!("Requeued {} interrupted records", report.requeued);
    }
    println!(
        "Processed {} records, {} errors",
        report.processed, report.errors
    );
    println!(
        "Found: name {}, job title {}, phone {}",
        report.name_found, report.job_title_found, report.phone_found
    );
    if !report.warnings.is_empty() {
        println!("Warnings:");
        for warning in report.warnings {
            println!("- {}", warning);
        }
    }
    Ok(())
}

/// HTTP translation is best effort; a bad endpoint only disables it.
pub(crate) fn http_translator(config: &TranslationConfig) -> Option<HttpTranslator> {
    let endpoint = config.http_endpoint()?;
    let options = HttpTranslatorOptions {
        endpoint: endpoint.to_string(),
        source_lang: config.source_lang.clone(),
        target_lang: config.target_lang.clone(),
        api_key: config.api_key.clone(),
        timeout: Duration::from_secs(config.timeout_secs),
    };
    match HttpTranslator::new(options) {
        Ok(translator) => {
            debug!(endpoint, "http translation enabled");
            Some(translator)
        }
        Err(err) => {
            warn!(endpoint, error = %err, "http translation disabled");
            None
        }
    }
}

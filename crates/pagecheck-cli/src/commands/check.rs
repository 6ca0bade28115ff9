use crate::commands::batch::http_translator;
use crate::commands::print_json;
use crate::error::{invalid_input, not_found};
use crate::util::found_label;
use anyhow::{Context as _, Result};
use clap::Args;
use pagecheck_config::AppConfig;
use pagecheck_core::domain::{ContactRecord, VerificationOutcome};
use pagecheck_core::Translator;
use pagecheck_ingest::extract::PhoneExtractor;
use pagecheck_ingest::pages::PageIndex;
use pagecheck_ingest::translate::PageTranslator;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Page JSON file
    #[arg(long)]
    pub page: PathBuf,
    #[arg(long, default_value = "")]
    pub first_name: String,
    #[arg(long, default_value = "")]
    pub last_name: String,
    #[arg(long, default_value = "")]
    pub job_title: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    /// Page to check when the file holds several
    #[arg(long)]
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    url: &'a str,
    #[serde(flatten)]
    outcome: &'a VerificationOutcome,
}

pub fn check(json: bool, config: &AppConfig, args: CheckArgs) -> Result<()> {
    let extractor = PhoneExtractor::new(
        config.phone.min_candidate_digits,
        config.phone.max_candidate_digits,
    );
    let index = PageIndex::load(&args.page, &extractor)
        .with_context(|| format!("load page {}", args.page.display()))?;

    let url = match args.url {
        Some(url) => url,
        None => match index.urls().as_slice() {
            [only] => only.to_string(),
            [] => return Err(invalid_input("page file contains no pages")),
            _ => return Err(invalid_input("page file holds several pages; pass --url")),
        },
    };
    let artifacts = index
        .get(&url)
        .ok_or_else(|| not_found(format!("no page for url {url}")))?;

    let record = ContactRecord {
        first_name: args.first_name,
        last_name: args.last_name,
        job_title: args.job_title,
        phone: args.phone,
        url: url.clone(),
    };
    let http = http_translator(&config.translation);
    let fallback = http.as_ref().map(|translator| translator as &dyn Translator);
    let translator = PageTranslator::new(artifacts.translated_text.as_deref(), fallback);
    let outcome = config.verifier().verify(&record, artifacts, &translator);

    if json {
        return print_json(&CheckReport {
            url: &url,
            outcome: &outcome,
        });
    }

    println!(
        "name: {} ({})",
        found_label(outcome.name_found),
        outcome.name_source.as_str()
    );
    println!(
        "job title: {} ({})",
        found_label(outcome.job_title_found),
        outcome.job_title_source.as_str()
    );
    match &outcome.matched_phone_candidate {
        Some(candidate) => println!("phone: yes ({candidate})"),
        None => println!("phone: no"),
    }
    Ok(())
}

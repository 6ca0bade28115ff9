use crate::error::{IngestError, Result};
use pagecheck_core::domain::{ContactRecord, RecordStatus, VerificationOutcome};
use serde::Serialize;

pub const REPORT_HEADER: [&str; 13] = [
    "first_name",
    "last_name",
    "job_title",
    "phone",
    "url",
    "status",
    "name_found",
    "name_source",
    "job_title_found",
    "job_title_source",
    "phone_found",
    "matched_phone_candidate",
    "error",
];

#[derive(Debug, Clone)]
pub struct ParsedRecords {
    pub records: Vec<ContactRecord>,
    pub warnings: Vec<String>,
    pub skipped: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub duplicates: usize,
    pub skipped: usize,
    pub warnings: Vec<String>,
}

/// One line of the verification report.
#[derive(Debug, Clone)]
pub struct ReportRow<'a> {
    pub record: &'a ContactRecord,
    pub status: RecordStatus,
    pub outcome: Option<&'a VerificationOutcome>,
    pub error: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    FirstName,
    LastName,
    JobTitle,
    Phone,
    Url,
}

fn column_for(header: &str) -> Option<Column> {
    match header.trim().to_ascii_lowercase().as_str() {
        "first_name" => Some(Column::FirstName),
        "last_name" => Some(Column::LastName),
        "job_title" => Some(Column::JobTitle),
        "phone" => Some(Column::Phone),
        "url" | "decision_maker_source" => Some(Column::Url),
        _ => None,
    }
}

pub fn parse_records(data: &str) -> Result<ParsedRecords> {
    let mut rows = parse_rows(data)?.into_iter();
    let header = rows
        .next()
        .ok_or_else(|| IngestError::Parse("csv input has no header row".to_string()))?;

    let mut columns = Vec::with_capacity(header.len());
    let mut warnings = Vec::new();
    for name in &header {
        let column = column_for(name);
        if column.is_some() && columns.contains(&column) {
            warnings.push(format!("duplicate column {name:?} ignored"));
            columns.push(None);
            continue;
        }
        columns.push(column);
    }
    if !columns.contains(&Some(Column::Url)) {
        return Err(IngestError::Parse(
            "csv header must contain a url (or decision_maker_source) column".to_string(),
        ));
    }

    let mut records = Vec::new();
    let mut skipped = 0;
    // Line numbers are 1-based and count the header.
    for (index, row) in rows.enumerate() {
        let line = index + 2;
        let mut record = ContactRecord::default();
        for (column, value) in columns.iter().zip(row) {
            let value = value.trim().to_string();
            match column {
                Some(Column::FirstName) => record.first_name = value,
                Some(Column::LastName) => record.last_name = value,
                Some(Column::JobTitle) => record.job_title = value,
                Some(Column::Phone) => record.phone = value,
                Some(Column::Url) => record.url = value,
                None => {}
            }
        }
        if record.url.is_empty() {
            skipped += 1;
            warnings.push(format!("row {line}: missing url, skipped"));
            continue;
        }
        records.push(record);
    }

    Ok(ParsedRecords {
        records,
        warnings,
        skipped,
    })
}

pub fn write_report(rows: &[ReportRow<'_>]) -> String {
    let mut out = String::new();
    write_row(&mut out, REPORT_HEADER.iter().copied());
    for row in rows {
        let outcome = row.outcome;
        let flag = |value: Option<bool>| match value {
            Some(true) => "true",
            Some(false) => "false",
            None => "",
        };
        write_row(
            &mut out,
            [
                row.record.first_name.as_str(),
                row.record.last_name.as_str(),
                row.record.job_title.as_str(),
                row.record.phone.as_str(),
                row.record.url.as_str(),
                row.status.as_str(),
                flag(outcome.map(|o| o.name_found)),
                outcome.map(|o| o.name_source.as_str()).unwrap_or(""),
                flag(outcome.map(|o| o.job_title_found)),
                outcome.map(|o| o.job_title_source.as_str()).unwrap_or(""),
                flag(outcome.map(|o| o.phone_found)),
                outcome
                    .and_then(|o| o.matched_phone_candidate.as_deref())
                    .unwrap_or(""),
                row.error.unwrap_or(""),
            ],
        );
    }
    out
}

/// Splits a CSV body into `parts` contiguous chunks, each carrying the
/// header. The last chunk takes the remainder.
pub fn split_csv(data: &str, parts: usize) -> Result<Vec<String>> {
    if parts == 0 {
        return Err(IngestError::Parse("cannot split into zero parts".to_string()));
    }
    let mut rows = parse_rows(data)?.into_iter();
    let header = rows
        .next()
        .ok_or_else(|| IngestError::Parse("csv input has no header row".to_string()))?;
    let body: Vec<Vec<String>> = rows.collect();
    let per_part = body.len() / parts;

    let mut chunks = Vec::with_capacity(parts);
    for part in 0..parts {
        let start = part * per_part;
        let end = if part + 1 == parts {
            body.len()
        } else {
            start + per_part
        };
        let mut out = String::new();
        write_row(&mut out, header.iter().map(String::as_str));
        for row in &body[start..end] {
            write_row(&mut out, row.iter().map(String::as_str));
        }
        chunks.push(out);
    }
    Ok(chunks)
}

/// `01_contacts.csv`, `02_contacts.csv`, ...
pub fn split_file_names(stem: &str, parts: usize) -> Vec<String> {
    (1..=parts)
        .map(|index| format!("{index:02}_{stem}.csv"))
        .collect()
}

pub fn parse_rows(data: &str) -> Result<Vec<Vec<String>>> {
    let data = data.strip_prefix('\u{feff}').unwrap_or(data);
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut field_started = false;
    let mut chars = data.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(ch),
            }
            continue;
        }

        match ch {
            '"' if !field_started => {
                in_quotes = true;
                field_started = true;
            }
            ',' => {
                row.push(std::mem::take(&mut field));
                field_started = false;
            }
            '\r' | '\n' => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(std::mem::take(&mut field));
                field_started = false;
                push_row(&mut rows, std::mem::take(&mut row));
            }
            _ => {
                field.push(ch);
                field_started = true;
            }
        }
    }

    if in_quotes {
        return Err(IngestError::Parse("unterminated quoted field".to_string()));
    }
    if field_started || !row.is_empty() {
        row.push(field);
        push_row(&mut rows, row);
    }
    Ok(rows)
}

fn push_row(rows: &mut Vec<Vec<String>>, row: Vec<String>) {
    if row.len() == 1 && row[0].trim().is_empty() {
        return;
    }
    rows.push(row);
}

fn write_row<'a>(out: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    for (index, field) in fields.into_iter().enumerate() {
        if index > 0 {
            out.push(',');
        }
        out.push_str(&escape_field(field));
    }
    out.push_str("\r\n");
}

fn escape_field(value: &str) -> std::borrow::Cow<'_, str> {
    if value.contains([',', '"', '\r', '\n']) || value.starts_with(' ') || value.ends_with(' ') {
        let mut escaped = String::with_capacity(value.len() + 2);
        escaped.push('"');
        escaped.push_str(&value.replace('"', "\"\""));
        escaped.push('"');
        std::borrow::Cow::Owned(escaped)
    } else {
        std::borrow::Cow::Borrowed(value)
    }
}

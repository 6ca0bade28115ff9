use crate::error::{Result, StoreError};
use pagecheck_core::domain::{
    ContactRecord, JobTitleSource, NameSource, RecordStatus, VerificationOutcome,
};
use rusqlite::{params, Connection, Row};
use std::fmt;
use std::str::FromStr;

const SELECT_COLUMNS: &str = "id, first_name, last_name, job_title, phone, url, status,
     name_source, job_title_source, matched_phone_candidate, error, created_at, updated_at";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .map(RecordId)
            .ok_or_else(|| StoreError::InvalidId(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub id: RecordId,
    pub record: ContactRecord,
    pub status: RecordStatus,
    pub outcome: Option<VerificationOutcome>,
    pub error: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertReport {
    pub inserted: usize,
    pub duplicates: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub not_processed: i64,
    pub processing: i64,
    pub processed: i64,
    pub error: i64,
}

impl StatusCounts {
    pub fn get(&self, status: RecordStatus) -> i64 {
        match status {
            RecordStatus::NotProcessed => self.not_processed,
            RecordStatus::Processing => self.processing,
            RecordStatus::Processed => self.processed,
            RecordStatus::Error => self.error,
        }
    }

    pub fn total(&self) -> i64 {
        self.not_processed + self.processing + self.processed + self.error
    }

    fn slot(&mut self, status: RecordStatus) -> &mut i64 {
        match status {
            RecordStatus::NotProcessed => &mut self.not_processed,
            RecordStatus::Processing => &mut self.processing,
            RecordStatus::Processed => &mut self.processed,
            RecordStatus::Error => &mut self.error,
        }
    }
}

pub struct RecordsRepo<'a> {
    conn: &'a Connection,
}

impl<'a> RecordsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Returns `None` when an identical record is already stored.
    pub fn insert(&self, now_utc: i64, record: &ContactRecord) -> Result<Option<RecordId>> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO records
             (first_name, last_name, job_title, phone, url, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7);",
            params![
                record.first_name,
                record.last_name,
                record.job_title,
                record.phone,
                record.url,
                RecordStatus::NotProcessed.as_str(),
                now_utc
            ],
        )?;
        if inserted == 0 {
            return Ok(None);
        }
        Ok(Some(RecordId(self.conn.last_insert_rowid())))
    }

    pub fn insert_many(&self, now_utc: i64, records: &[ContactRecord]) -> Result<InsertReport> {
        let tx = self.conn.unchecked_transaction()?;
        let repo = RecordsRepo::new(&tx);
        let mut report = InsertReport::default();
        for record in records {
            match repo.insert(now_utc, record)? {
                Some(_) => report.inserted += 1,
                None => report.duplicates += 1,
            }
        }
        tx.commit()?;
        Ok(report)
    }

    pub fn get(&self, id: RecordId) -> Result<Option<StoredRecord>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM records WHERE id = ?1;");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([id.0])?;
        if let Some(row) = rows.next()? {
            Ok(Some(record_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn list(&self, status: Option<RecordStatus>) -> Result<Vec<StoredRecord>> {
        let mut records = Vec::new();
        match status {
            Some(status) => {
                let sql = format!(
                    "SELECT {SELECT_COLUMNS} FROM records WHERE status = ?1 ORDER BY id ASC;"
                );
                let mut stmt = self.conn.prepare(&sql)?;
                let mut rows = stmt.query([status.as_str()])?;
                while let Some(row) = rows.next()? {
                    records.push(record_from_row(row)?);
                }
            }
            None => {
                let sql = format!("SELECT {SELECT_COLUMNS} FROM records ORDER BY id ASC;");
                let mut stmt = self.conn.prepare(&sql)?;
                let mut rows = stmt.query([])?;
                while let Some(row) = rows.next()? {
                    records.push(record_from_row(row)?);
                }
            }
        }
        Ok(records)
    }

    /// Oldest record still waiting to be processed.
    pub fn next_pending(&self) -> Result<Option<StoredRecord>> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM records WHERE status = ?1 ORDER BY id ASC LIMIT 1;"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([RecordStatus::NotProcessed.as_str()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(record_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn mark_processing(&self, now_utc: i64, id: RecordId) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE records SET status = ?1, updated_at = ?2 WHERE id = ?3;",
            params![RecordStatus::Processing.as_str(), now_utc, id.0],
        )?;
        ensure_updated(updated, id)
    }

    pub fn record_outcome(
        &self,
        now_utc: i64,
        id: RecordId,
        outcome: &VerificationOutcome,
    ) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE records SET
               status = ?1,
               name_found = ?2,
               name_source = ?3,
               job_title_found = ?4,
               job_title_source = ?5,
               phone_found = ?6,
               matched_phone_candidate = ?7,
               error = NULL,
               updated_at = ?8
             WHERE id = ?9;",
            params![
                RecordStatus::Processed.as_str(),
                outcome.name_found,
                outcome.name_source.as_str(),
                outcome.job_title_found,
                outcome.job_title_source.as_str(),
                outcome.phone_found,
                outcome.matched_phone_candidate,
                now_utc,
                id.0
            ],
        )?;
        ensure_updated(updated, id)
    }

    pub fn mark_error(&self, now_utc: i64, id: RecordId, message: &str) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE records SET status = ?1, error = ?2, updated_at = ?3 WHERE id = ?4;",
            params![RecordStatus::Error.as_str(), message, now_utc, id.0],
        )?;
        ensure_updated(updated, id)
    }

    /// Puts interrupted records (and failed ones, when asked) back in the
    /// queue with their results cleared. Returns the number of records moved.
    pub fn requeue(&self, now_utc: i64, include_errors: bool) -> Result<usize> {
        let error_status = if include_errors {
            RecordStatus::Error.as_str()
        } else {
            RecordStatus::Processing.as_str()
        };
        let updated = self.conn.execute(
            "UPDATE records SET
               status = ?1,
               name_found = NULL,
               name_source = NULL,
               job_title_found = NULL,
               job_title_source = NULL,
               phone_found = NULL,
               matched_phone_candidate = NULL,
               error = NULL,
               updated_at = ?2
             WHERE status IN (?3, ?4);",
            params![
                RecordStatus::NotProcessed.as_str(),
                now_utc,
                RecordStatus::Processing.as_str(),
                error_status
            ],
        )?;
        Ok(updated)
    }

    pub fn status_counts(&self) -> Result<StatusCounts> {
        let mut stmt = self
            .conn
            .prepare("SELECT status, COUNT(*) FROM records GROUP BY status;")?;
        let mut rows = stmt.query([])?;
        let mut counts = StatusCounts::default();
        while let Some(row) = rows.next()? {
            let raw: String = row.get(0)?;
            let count: i64 = row.get(1)?;
            *counts.slot(parse_status(&raw)?) = count;
        }
        Ok(counts)
    }
}

fn ensure_updated(updated: usize, id: RecordId) -> Result<()> {
    if updated == 0 {
        return Err(StoreError::NotFound(format!("record {id}")));
    }
    Ok(())
}

fn parse_status(raw: &str) -> Result<RecordStatus> {
    Ok(RecordStatus::from_str(raw)?)
}

fn record_from_row(row: &Row<'_>) -> Result<StoredRecord> {
    let status: String = row.get(6)?;
    let status = parse_status(&status)?;
    let name_source: Option<String> = row.get(7)?;
    let job_title_source: Option<String> = row.get(8)?;
    let matched_phone_candidate: Option<String> = row.get(9)?;

    let outcome = match (name_source, job_title_source) {
        (Some(name), Some(job_title)) if status == RecordStatus::Processed => {
            let name = NameSource::parse(&name).ok_or_else(|| StoreError::InvalidColumn {
                column: "name_source",
                value: name.clone(),
            })?;
            let job_title =
                JobTitleSource::parse(&job_title).ok_or_else(|| StoreError::InvalidColumn {
                    column: "job_title_source",
                    value: job_title.clone(),
                })?;
            Some(VerificationOutcome::new(
                name,
                job_title,
                matched_phone_candidate,
            ))
        }
        _ => None,
    };

    Ok(StoredRecord {
        id: RecordId(row.get(0)?),
        record: ContactRecord {
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            job_title: row.get(3)?,
            phone: row.get(4)?,
            url: row.get(5)?,
        },
        status,
        outcome,
        error: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}

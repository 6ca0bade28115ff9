pub mod records;

pub use records::{InsertReport, RecordId, RecordsRepo, StatusCounts, StoredRecord};

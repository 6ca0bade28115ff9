use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Processing state of a stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    NotProcessed,
    Processing,
    Processed,
    Error,
}

impl RecordStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            RecordStatus::NotProcessed => "not_processed",
            RecordStatus::Processing => "processing",
            RecordStatus::Processed => "processed",
            RecordStatus::Error => "error",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "not_processed" => Some(RecordStatus::NotProcessed),
            "processing" => Some(RecordStatus::Processing),
            "processed" => Some(RecordStatus::Processed),
            "error" => Some(RecordStatus::Error),
            _ => None,
        }
    }

    pub const fn all() -> &'static [RecordStatus] {
        &[
            RecordStatus::NotProcessed,
            RecordStatus::Processing,
            RecordStatus::Processed,
            RecordStatus::Error,
        ]
    }
}

impl FromStr for RecordStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordStatus::parse(s).ok_or_else(|| CoreError::InvalidStatus(s.to_string()))
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::RecordStatus;
    use crate::error::CoreError;

    #[test]
    fn from_str_reports_unknown_labels() {
        let err = "done".parse::<RecordStatus>().unwrap_err();
        assert_eq!(err, CoreError::InvalidStatus("done".to_string()));
        assert_eq!(RecordStatus::Error.to_string(), "error");
    }

    #[test]
    fn parse_accepts_labels_and_dashes() {
        for status in RecordStatus::all() {
            assert_eq!(RecordStatus::parse(status.as_str()), Some(*status));
        }
        assert_eq!(
            RecordStatus::parse(" Not-Processed "),
            Some(RecordStatus::NotProcessed)
        );
        assert_eq!(RecordStatus::parse("done"), None);
    }
}

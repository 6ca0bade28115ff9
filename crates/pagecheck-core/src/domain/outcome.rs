use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameSource {
    Text,
    Image,
    None,
}

impl NameSource {
    pub const fn as_str(self) -> &'static str {
        match self {
            NameSource::Text => "text",
            NameSource::Image => "image",
            NameSource::None => "none",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "text" => Some(NameSource::Text),
            "image" => Some(NameSource::Image),
            "none" => Some(NameSource::None),
            _ => None,
        }
    }

    pub const fn is_found(self) -> bool {
        !matches!(self, NameSource::None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobTitleSource {
    Primary,
    Translated,
    None,
}

impl JobTitleSource {
    pub const fn as_str(self) -> &'static str {
        match self {
            JobTitleSource::Primary => "primary",
            JobTitleSource::Translated => "translated",
            JobTitleSource::None => "none",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "primary" => Some(JobTitleSource::Primary),
            "translated" => Some(JobTitleSource::Translated),
            "none" => Some(JobTitleSource::None),
            _ => None,
        }
    }

    pub const fn is_found(self) -> bool {
        !matches!(self, JobTitleSource::None)
    }
}

/// Result of checking one record against one page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerificationOutcome {
    pub name_found: bool,
    pub name_source: NameSource,
    pub job_title_found: bool,
    pub job_title_source: JobTitleSource,
    pub phone_found: bool,
    pub matched_phone_candidate: Option<String>,
}

impl VerificationOutcome {
    /// Builds an outcome whose flags agree with the sources by construction.
    pub fn new(
        name_source: NameSource,
        job_title_source: JobTitleSource,
        matched_phone_candidate: Option<String>,
    ) -> Self {
        Self {
            name_found: name_source.is_found(),
            name_source,
            job_title_found: job_title_source.is_found(),
            job_title_source,
            phone_found: matched_phone_candidate.is_some(),
            matched_phone_candidate,
        }
    }

    pub fn not_found() -> Self {
        Self::new(NameSource::None, JobTitleSource::None, None)
    }
}

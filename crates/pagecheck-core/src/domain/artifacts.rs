use serde::{Deserialize, Serialize};

/// Everything extracted from one visited page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageArtifacts {
    pub primary_text: String,
    /// OCR output, one entry per image in page order.
    #[serde(default)]
    pub image_texts: Vec<String>,
    #[serde(default)]
    pub translated_text: Option<String>,
    /// Raw phone-like substrings in extraction order, without duplicates.
    #[serde(default)]
    pub phone_candidates: Vec<String>,
}

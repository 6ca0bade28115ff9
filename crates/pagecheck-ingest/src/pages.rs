use crate::error::{IngestError, Result};
use crate::extract::PhoneExtractor;
use pagecheck_core::domain::PageArtifacts;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// On-disk form of one visited page, as written by the page collector.
#[derive(Debug, Clone, Deserialize)]
pub struct PageFile {
    pub url: String,
    #[serde(default)]
    pub primary_text: String,
    #[serde(default)]
    pub image_texts: Vec<String>,
    #[serde(default)]
    pub translated_text: Option<String>,
    /// Absent means "extract from the page text".
    #[serde(default)]
    pub phone_candidates: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PageFileContents {
    One(Box<PageFile>),
    Many(Vec<PageFile>),
}

/// Page artifacts keyed by URL.
#[derive(Debug, Clone, Default)]
pub struct PageIndex {
    pages: HashMap<String, PageArtifacts>,
    pub warnings: Vec<String>,
}

impl PageIndex {
    /// Loads a single JSON file (object or array) or every `*.json` file in a
    /// directory, in file name order.
    pub fn load(path: &Path, extractor: &PhoneExtractor) -> Result<Self> {
        let mut index = PageIndex::default();
        if path.is_dir() {
            let mut files: Vec<PathBuf> = fs::read_dir(path)?
                .filter_map(|entry| entry.ok().map(|entry| entry.path()))
                .filter(|path| {
                    path.is_file()
                        && path
                            .extension()
                            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
                })
                .collect();
            files.sort();
            if files.is_empty() {
                index
                    .warnings
                    .push(format!("no page files found in {}", path.display()));
            }
            for file in files {
                let data = fs::read_to_string(&file)?;
                index.add_json(&data, extractor).map_err(|err| {
                    IngestError::Parse(format!("{}: {err}", file.display()))
                })?;
            }
        } else {
            let data = fs::read_to_string(path)?;
            index.add_json(&data, extractor)?;
        }
        Ok(index)
    }

    pub fn from_json(data: &str, extractor: &PhoneExtractor) -> Result<Self> {
        let mut index = PageIndex::default();
        index.add_json(data, extractor)?;
        Ok(index)
    }

    pub fn get(&self, url: &str) -> Option<&PageArtifacts> {
        self.pages.get(&page_key(url))
    }

    /// Indexed page keys in sorted order.
    pub fn urls(&self) -> Vec<&str> {
        let mut urls: Vec<&str> = self.pages.keys().map(String::as_str).collect();
        urls.sort_unstable();
        urls
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    fn add_json(&mut self, data: &str, extractor: &PhoneExtractor) -> Result<()> {
        let files = match serde_json::from_str::<PageFileContents>(data)? {
            PageFileContents::One(file) => vec![*file],
            PageFileContents::Many(files) => files,
        };
        for file in files {
            self.insert(file, extractor);
        }
        Ok(())
    }

    fn insert(&mut self, file: PageFile, extractor: &PhoneExtractor) {
        let key = page_key(&file.url);
        if key.is_empty() {
            self.warnings.push("page without url skipped".to_string());
            return;
        }
        if self.pages.contains_key(&key) {
            self.warnings
                .push(format!("duplicate page for {key} ignored"));
            return;
        }
        let artifacts = into_artifacts(file, extractor);
        self.pages.insert(key, artifacts);
    }
}

pub fn into_artifacts(file: PageFile, extractor: &PhoneExtractor) -> PageArtifacts {
    let phone_candidates = match file.phone_candidates {
        Some(candidates) => dedup_in_order(candidates),
        None => extractor.extract_all(
            std::iter::once(file.primary_text.as_str())
                .chain(file.image_texts.iter().map(String::as_str)),
        ),
    };
    PageArtifacts {
        primary_text: file.primary_text,
        image_texts: file.image_texts,
        translated_text: file
            .translated_text
            .filter(|text| !text.trim().is_empty()),
        phone_candidates,
    }
}

/// Trailing slashes and surrounding whitespace do not distinguish pages.
pub fn page_key(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn dedup_in_order(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| !value.trim().is_empty() && seen.insert(value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{page_key, PageIndex};
    use crate::extract::PhoneExtractor;
    use std::fs;
    use tempfile::TempDir;

    fn extractor() -> PhoneExtractor {
        PhoneExtractor::new(9, 15)
    }

    #[test]
    fn single_page_extracts_candidates_when_absent() {
        let data = r#"{
            "url": "https://example.com/team/",
            "primary_text": "John Smith, call 415.555.1234 now",
            "image_texts": ["Direct: (212) 555-0000"]
        }"#;
        let index = PageIndex::from_json(data, &extractor()).expect("load");
        let page = index.get("https://example.com/team").expect("page");
        assert_eq!(page.phone_candidates, vec!["415.555.1234", "(212) 555-0000"]);
        assert!(page.translated_text.is_none());
    }

    #[test]
    fn explicit_candidates_are_kept_in_order_without_duplicates() {
        let data = r#"[
            {"url": "https://a.example", "primary_text": "", "phone_candidates": ["2", "1", "2", " "]},
            {"url": "https://b.example", "primary_text": "x", "translated_text": "  "}
        ]"#;
        let index = PageIndex::from_json(data, &extractor()).expect("load");
        assert_eq!(index.urls(), vec!["https://a.example", "https://b.example"]);
        assert_eq!(
            index.get("https://a.example").expect("a").phone_candidates,
            vec!["2", "1"]
        );
        assert!(index
            .get("https://b.example")
            .expect("b")
            .translated_text
            .is_none());
    }

    #[test]
    fn duplicate_and_missing_urls_are_warned() {
        let data = r#"[
            {"url": "https://a.example", "primary_text": "first"},
            {"url": "https://a.example/", "primary_text": "second"},
            {"url": " ", "primary_text": "none"}
        ]"#;
        let index = PageIndex::from_json(data, &extractor()).expect("load");
        assert_eq!(index.len(), 1);
        assert_eq!(
            index.get("https://a.example").expect("a").primary_text,
            "first"
        );
        assert_eq!(index.warnings.len(), 2);
    }

    #[test]
    fn load_reads_directory_of_json_files() {
        let temp = TempDir::new().expect("tempdir");
        fs::write(
            temp.path().join("01.json"),
            r#"{"url": "https://a.example", "primary_text": "a"}"#,
        )
        .expect("write");
        fs::write(
            temp.path().join("02.json"),
            r#"[{"url": "https://b.example", "primary_text": "b"}]"#,
        )
        .expect("write");
        fs::write(temp.path().join("notes.txt"), "ignored").expect("write");

        let index = PageIndex::load(temp.path(), &extractor()).expect("load");
        assert_eq!(index.len(), 2);
        assert!(index.warnings.is_empty());
    }

    #[test]
    fn load_reports_bad_json_with_file_name() {
        let temp = TempDir::new().expect("tempdir");
        fs::write(temp.path().join("bad.json"), "{not json").expect("write");
        let err = PageIndex::load(temp.path(), &extractor()).unwrap_err();
        assert!(err.to_string().contains("bad.json"));
    }

    #[test]
    fn page_key_ignores_trailing_slash() {
        assert_eq!(page_key(" https://example.com/a/ "), "https://example.com/a");
    }
}

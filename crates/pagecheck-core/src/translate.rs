use crate::domain::JobTitleSource;
use crate::matching::TextMatcher;

/// Text-to-text translation collaborator. `None` means the translation is
/// unavailable, whatever the reason.
pub trait Translator {
    fn translate(&self, text: &str) -> Option<String>;
}

impl<F> Translator for F
where
    F: Fn(&str) -> Option<String>,
{
    fn translate(&self, text: &str) -> Option<String> {
        self(text)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoTranslation;

impl Translator for NoTranslation {
    fn translate(&self, _text: &str) -> Option<String> {
        None
    }
}

/// Matches the job title against the primary text and, only when that fails,
/// against a translation of it.
pub fn resolve_job_title<T>(
    matcher: &TextMatcher,
    job_title: &str,
    primary_text: &str,
    translator: &T,
) -> JobTitleSource
where
    T: Translator + ?Sized,
{
    if matcher.contains(job_title, primary_text) {
        return JobTitleSource::Primary;
    }

    match translator.translate(primary_text) {
        Some(translated) if matcher.contains(job_title, &translated) => {
            JobTitleSource::Translated
        }
        _ => JobTitleSource::None,
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve_job_title, NoTranslation};
    use crate::domain::JobTitleSource;
    use crate::matching::TextMatcher;
    use std::cell::Cell;

    #[test]
    fn primary_match_skips_translation() {
        let calls = Cell::new(0);
        let translator = |_: &str| {
            calls.set(calls.get() + 1);
            Some("unused".to_string())
        };
        let source = resolve_job_title(
            &TextMatcher::default(),
            "CEO",
            "He is the CEO",
            &translator,
        );
        assert_eq!(source, JobTitleSource::Primary);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn falls_back_to_translated_text() {
        let translator = |_: &str| Some("Il est le Directeur".to_string());
        let source = resolve_job_title(
            &TextMatcher::default(),
            "Directeur",
            "He is the CEO",
            &translator,
        );
        assert_eq!(source, JobTitleSource::Translated);
    }

    #[test]
    fn unavailable_translation_is_not_found() {
        let source = resolve_job_title(
            &TextMatcher::default(),
            "Directeur",
            "He is the CEO",
            &NoTranslation,
        );
        assert_eq!(source, JobTitleSource::None);
    }

    #[test]
    fn translated_text_without_title_is_not_found() {
        let translator = |text: &str| Some(text.to_uppercase());
        let source = resolve_job_title(
            &TextMatcher::default(),
            "Directeur",
            "He is the CEO",
            &translator,
        );
        assert_eq!(source, JobTitleSource::None);
    }
}

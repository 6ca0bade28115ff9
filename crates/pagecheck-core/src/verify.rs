use crate::domain::{ContactRecord, JobTitleSource, NameSource, PageArtifacts, VerificationOutcome};
use crate::matching::{aggregate_image_text, match_phone, PhonePolicy, TextMatcher};
use crate::translate::{resolve_job_title, Translator};

/// Matching configuration threaded through every check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verifier {
    phone: PhonePolicy,
    text: TextMatcher,
}

impl Verifier {
    pub fn new(phone: PhonePolicy, text: TextMatcher) -> Self {
        Self { phone, text }
    }

    pub fn phone_policy(&self) -> &PhonePolicy {
        &self.phone
    }

    pub fn text_matcher(&self) -> &TextMatcher {
        &self.text
    }

    /// Runs the name, job title and phone checks independently. Blank record
    /// fields are reported as not found without consulting the page.
    pub fn verify<T>(
        &self,
        record: &ContactRecord,
        artifacts: &PageArtifacts,
        translator: &T,
    ) -> VerificationOutcome
    where
        T: Translator + ?Sized,
    {
        let name_source = self.check_name(&record.full_name(), artifacts);
        let job_title_source = self.check_job_title(&record.job_title, artifacts, translator);
        let matched_phone = self.check_phone(&record.phone, artifacts);
        VerificationOutcome::new(name_source, job_title_source, matched_phone)
    }

    pub fn check_name(&self, full_name: &str, artifacts: &PageArtifacts) -> NameSource {
        if self.is_blank(full_name) {
            return NameSource::None;
        }
        if self.text.contains(full_name, &artifacts.primary_text) {
            return NameSource::Text;
        }
        let image_text = aggregate_image_text(&artifacts.image_texts);
        if self.text.contains(full_name, &image_text) {
            NameSource::Image
        } else {
            NameSource::None
        }
    }

    pub fn check_job_title<T>(
        &self,
        job_title: &str,
        artifacts: &PageArtifacts,
        translator: &T,
    ) -> JobTitleSource
    where
        T: Translator + ?Sized,
    {
        if self.is_blank(job_title) {
            return JobTitleSource::None;
        }
        resolve_job_title(&self.text, job_title, &artifacts.primary_text, translator)
    }

    pub fn check_phone(&self, phone: &str, artifacts: &PageArtifacts) -> Option<String> {
        match_phone(phone, &artifacts.phone_candidates, &self.phone).map(str::to_string)
    }

    /// Punctuation-only fields would match any page vacuously.
    fn is_blank(&self, value: &str) -> bool {
        self.text.normalize(value).is_empty()
    }
}

pub fn verify<T>(
    record: &ContactRecord,
    artifacts: &PageArtifacts,
    translator: &T,
) -> VerificationOutcome
where
    T: Translator + ?Sized,
{
    Verifier::default().verify(record, artifacts, translator)
}

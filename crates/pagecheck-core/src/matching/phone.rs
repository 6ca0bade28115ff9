use crate::error::CoreError;
use serde::Serialize;
use std::fmt;

pub const DEFAULT_NATIONAL_LENGTH: usize = 10;
pub const DEFAULT_COUNTRY_CODES: &[&str] = &["1"];

/// Country codes that may be dropped from the front of a number, and the
/// national length that decides when dropping applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhonePolicy {
    country_codes: Vec<String>,
    national_length: usize,
}

impl PhonePolicy {
    pub fn new<I, S>(country_codes: I, national_length: usize) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if national_length == 0 {
            return Err(CoreError::InvalidNationalLength(national_length));
        }

        let mut codes = Vec::new();
        for code in country_codes {
            let code = code.into();
            let trimmed = code.trim().trim_start_matches('+');
            if trimmed.is_empty() || !trimmed.chars().all(|ch| ch.is_ascii_digit()) {
                return Err(CoreError::InvalidCountryCode(code));
            }
            if !codes.iter().any(|existing: &String| existing == trimmed) {
                codes.push(trimmed.to_string());
            }
        }
        // Longest first so "358" wins over "3" when both are configured.
        codes.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        Ok(Self {
            country_codes: codes,
            national_length,
        })
    }

    pub fn country_codes(&self) -> &[String] {
        &self.country_codes
    }

    pub fn national_length(&self) -> usize {
        self.national_length
    }
}

impl Default for PhonePolicy {
    fn default() -> Self {
        Self {
            country_codes: DEFAULT_COUNTRY_CODES
                .iter()
                .map(|code| code.to_string())
                .collect(),
            national_length: DEFAULT_NATIONAL_LENGTH,
        }
    }
}

/// Digit-only phone form used for comparisons. Empty means "matches nothing".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NormalizedPhone(String);

impl NormalizedPhone {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for NormalizedPhone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn normalize_phone(raw: &str, policy: &PhonePolicy) -> NormalizedPhone {
    let digits: String = raw.chars().filter(|ch| ch.is_ascii_digit()).collect();

    if digits.len() > policy.national_length {
        for code in &policy.country_codes {
            if let Some(rest) = digits.strip_prefix(code.as_str()) {
                return NormalizedPhone(rest.to_string());
            }
        }
    }

    NormalizedPhone(digits)
}

/// Returns the first candidate whose normalized form equals the target's.
pub fn match_phone<'a, S>(
    target: &str,
    candidates: &'a [S],
    policy: &PhonePolicy,
) -> Option<&'a str>
where
    S: AsRef<str>,
{
    let target = normalize_phone(target, policy);
    if target.is_empty() {
        return None;
    }

    candidates
        .iter()
        .map(AsRef::as_ref)
        .find(|candidate| normalize_phone(candidate, policy) == target)
}

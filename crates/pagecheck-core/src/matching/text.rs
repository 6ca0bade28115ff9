pub const DEFAULT_PUNCTUATION: &str =
    ".,;:!?\"'()[]{}<>|/\\-_*&#@\u{2010}\u{2011}\u{2012}\u{2013}\u{2014}\u{2018}\u{2019}\u{201C}\u{201D}\u{00B7}";

/// Case and punctuation tolerant containment test for names and job titles.
///
/// Both sides are lowercased, stripped of the configured punctuation and
/// whitespace-collapsed. A needle matches when every one of its tokens occurs
/// somewhere in the haystack, in any order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMatcher {
    punctuation: Vec<char>,
}

impl TextMatcher {
    pub fn new(punctuation: &str) -> Self {
        let mut chars: Vec<char> = punctuation.chars().filter(|ch| !ch.is_whitespace()).collect();
        chars.sort_unstable();
        chars.dedup();
        Self { punctuation: chars }
    }

    pub fn punctuation(&self) -> String {
        self.punctuation.iter().collect()
    }

    pub fn normalize(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut pending_space = false;

        for ch in text.chars() {
            if ch.is_whitespace() {
                pending_space = !out.is_empty();
                continue;
            }
            if self.punctuation.binary_search(&ch).is_ok() {
                continue;
            }
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.extend(ch.to_lowercase());
        }

        out
    }

    /// An empty needle matches vacuously; callers skip blank fields.
    pub fn contains(&self, needle: &str, haystack: &str) -> bool {
        let needle = self.normalize(needle);
        if needle.is_empty() {
            return true;
        }
        let haystack = self.normalize(haystack);
        needle
            .split(' ')
            .all(|token| haystack.contains(token))
    }
}

impl Default for TextMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_PUNCTUATION)
    }
}

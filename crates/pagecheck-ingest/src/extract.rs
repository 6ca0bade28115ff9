use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

// Digits joined by short runs of phone punctuation; never crosses a line break.
static RE_PHONE_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\+?\(?[0-9](?:[ \t\u{00A0}().\-/]{0,3}[0-9])+").expect("phone pattern compiles")
});

static RE_DIGIT_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("digit group pattern compiles"));

/// Finds raw phone-like substrings whose digit count falls in a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhoneExtractor {
    min_digits: usize,
    max_digits: usize,
}

impl PhoneExtractor {
    pub fn new(min_digits: usize, max_digits: usize) -> Self {
        Self {
            min_digits,
            max_digits,
        }
    }

    pub fn extract(&self, text: &str) -> Vec<String> {
        self.extract_all([text])
    }

    /// Candidates from every text, first occurrence order, no duplicates.
    pub fn extract_all<'a, I>(&self, texts: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for text in texts {
            for found in RE_PHONE_LIKE.find_iter(text) {
                for candidate in self.candidates(found.as_str()) {
                    if seen.insert(candidate) {
                        out.push(candidate.to_string());
                    }
                }
            }
        }
        out
    }

    fn candidates<'t>(&self, run: &'t str) -> Vec<&'t str> {
        let digits = run.bytes().filter(u8::is_ascii_digit).count();
        if digits > self.max_digits {
            return self.split_run(run);
        }
        if digits < self.min_digits {
            return Vec::new();
        }
        vec![run]
    }

    /// Numbers listed side by side match as one run. Cuts the run at digit
    /// group boundaries into the most spans that fit the window, preferring
    /// the cut that covers more digits.
    fn split_run<'t>(&self, run: &'t str) -> Vec<&'t str> {
        let groups: Vec<(usize, usize)> = RE_DIGIT_GROUP
            .find_iter(run)
            .map(|group| (group.start(), group.end()))
            .collect();

        // best[j]: (spans kept, digits covered) over the first j groups.
        let mut best = vec![(0usize, 0usize); groups.len() + 1];
        let mut span_start: Vec<Option<usize>> = vec![None; groups.len() + 1];
        for end in 1..=groups.len() {
            best[end] = best[end - 1];
            let mut digits = 0;
            for start in (0..end).rev() {
                digits += groups[start].1 - groups[start].0;
                if digits > self.max_digits {
                    break;
                }
                if digits < self.min_digits {
                    continue;
                }
                let score = (best[start].0 + 1, best[start].1 + digits);
                if score > best[end] {
                    best[end] = score;
                    span_start[end] = Some(start);
                }
            }
        }

        let mut spans = Vec::new();
        let mut end = groups.len();
        while end > 0 {
            match span_start[end] {
                Some(start) => {
                    spans.push(span_text(run, &groups, start, end));
                    end = start;
                }
                None => end -= 1,
            }
        }
        spans.reverse();
        spans
    }
}

/// Text of groups `start..end`, keeping a leading `+` or `(` that opens it.
fn span_text<'t>(run: &'t str, groups: &[(usize, usize)], start: usize, end: usize) -> &'t str {
    let gap_start = if start == 0 { 0 } else { groups[start - 1].1 };
    let gap = &run[gap_start..groups[start].0];
    let opening = gap.trim_end_matches(['+', '(']).len();
    &run[gap_start + opening..groups[end - 1].1]
}

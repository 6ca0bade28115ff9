use serde::{Deserialize, Serialize};

/// One input row: a person and the page expected to confirm their details.
/// Empty strings mean "no value".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContactRecord {
    pub first_name: String,
    pub last_name: String,
    pub job_title: String,
    pub phone: String,
    pub url: String,
}

impl ContactRecord {
    /// First and last name joined by a single space, blank parts dropped.
    pub fn full_name(&self) -> String {
        let first = self.first_name.trim();
        let last = self.last_name.trim();
        match (first.is_empty(), last.is_empty()) {
            (false, false) => format!("{first} {last}"),
            (false, true) => first.to_string(),
            (true, false) => last.to_string(),
            (true, true) => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ContactRecord;

    #[test]
    fn full_name_joins_trimmed_parts() {
        let record = ContactRecord {
            first_name: " Ada ".to_string(),
            last_name: "Lovelace".to_string(),
            ..Default::default()
        };
        assert_eq!(record.full_name(), "Ada Lovelace");
    }

    #[test]
    fn full_name_skips_blank_parts() {
        let record = ContactRecord {
            last_name: "Lovelace".to_string(),
            ..Default::default()
        };
        assert_eq!(record.full_name(), "Lovelace");
        assert_eq!(ContactRecord::default().full_name(), "");
    }
}

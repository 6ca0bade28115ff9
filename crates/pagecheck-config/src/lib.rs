use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use pagecheck_core::matching::text::DEFAULT_PUNCTUATION;
use pagecheck_core::{CoreError, PhonePolicy, TextMatcher, Verifier};
use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "pagecheck";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_MIN_CANDIDATE_DIGITS: usize = 9;
pub const DEFAULT_MAX_CANDIDATE_DIGITS: usize = 15;
pub const DEFAULT_TRANSLATION_TIMEOUT_SECS: u64 = 20;
const MAX_TRANSLATION_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub phone: PhoneConfig,
    pub text: TextConfig,
    pub translation: TranslationConfig,
}

#[derive(Debug, Clone)]
pub struct PhoneConfig {
    pub policy: PhonePolicy,
    pub min_candidate_digits: usize,
    pub max_candidate_digits: usize,
}

#[derive(Debug, Clone)]
pub struct TextConfig {
    pub punctuation: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationConfig {
    pub enabled: bool,
    pub endpoint: Option<String>,
    pub source_lang: String,
    pub target_lang: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl AppConfig {
    pub fn verifier(&self) -> Verifier {
        Verifier::new(
            self.phone.policy.clone(),
            TextMatcher::new(&self.text.punctuation),
        )
    }
}

impl TranslationConfig {
    /// HTTP translation runs only when enabled and an endpoint is configured.
    pub fn http_endpoint(&self) -> Option<&str> {
        if self.enabled {
            self.endpoint.as_deref()
        } else {
            None
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            phone: PhoneConfig {
                policy: PhonePolicy::default(),
                min_candidate_digits: DEFAULT_MIN_CANDIDATE_DIGITS,
                max_candidate_digits: DEFAULT_MAX_CANDIDATE_DIGITS,
            },
            text: TextConfig {
                punctuation: DEFAULT_PUNCTUATION.to_string(),
            },
            translation: TranslationConfig {
                enabled: true,
                endpoint: None,
                source_lang: "auto".to_string(),
                target_lang: "en".to_string(),
                api_key: None,
                timeout_secs: DEFAULT_TRANSLATION_TIMEOUT_SECS,
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("invalid phone settings: {0}")]
    InvalidPhone(#[from] CoreError),
    #[error("invalid candidate digit bounds: min {min}, max {max}")]
    InvalidCandidateDigits { min: usize, max: usize },
    #[error("invalid translation.{field}: {message}")]
    InvalidTranslationField {
        field: &'static str,
        message: String,
    },
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    phone: Option<PhoneFile>,
    text: Option<TextFile>,
    translation: Option<TranslationFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PhoneFile {
    country_codes: Option<Vec<String>>,
    national_length: Option<usize>,
    min_candidate_digits: Option<usize>,
    max_candidate_digits: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TextFile {
    punctuation: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TranslationFile {
    enabled: Option<bool>,
    endpoint: Option<String>,
    source_lang: Option<String>,
    target_lang: Option<String>,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path.clone()) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(phone) = parsed.phone {
        if phone.country_codes.is_some() || phone.national_length.is_some() {
            let codes = phone
                .country_codes
                .unwrap_or_else(|| config.phone.policy.country_codes().to_vec());
            let national_length = phone
                .national_length
                .unwrap_or_else(|| config.phone.policy.national_length());
            config.phone.policy = PhonePolicy::new(codes, national_length)?;
        }
        if let Some(min) = phone.min_candidate_digits {
            config.phone.min_candidate_digits = min;
        }
        if let Some(max) = phone.max_candidate_digits {
            config.phone.max_candidate_digits = max;
        }
        let (min, max) = (
            config.phone.min_candidate_digits,
            config.phone.max_candidate_digits,
        );
        if min == 0 || min > max {
            return Err(ConfigError::InvalidCandidateDigits { min, max });
        }
    }

    if let Some(text) = parsed.text {
        if let Some(punctuation) = text.punctuation {
            config.text.punctuation = punctuation;
        }
    }

    if let Some(translation) = parsed.translation {
        if let Some(enabled) = translation.enabled {
            config.translation.enabled = enabled;
        }
        if let Some(endpoint) = translation.endpoint {
            let endpoint = require_value("endpoint", endpoint)?;
            if !endpoint.starts_with("https://") && !endpoint.starts_with("http://") {
                return Err(ConfigError::InvalidTranslationField {
                    field: "endpoint",
                    message: "expected an http(s) url".to_string(),
                });
            }
            config.translation.endpoint = Some(endpoint);
        }
        if let Some(source_lang) = translation.source_lang {
            config.translation.source_lang = require_value("source_lang", source_lang)?;
        }
        if let Some(target_lang) = translation.target_lang {
            config.translation.target_lang = require_value("target_lang", target_lang)?;
        }
        if let Some(api_key) = translation.api_key {
            config.translation.api_key = Some(require_value("api_key", api_key)?);
        }
        if let Some(timeout) = translation.timeout_secs {
            if timeout == 0 || timeout > MAX_TRANSLATION_TIMEOUT_SECS {
                return Err(ConfigError::InvalidTranslationField {
                    field: "timeout_secs",
                    message: format!("expected 1..={MAX_TRANSLATION_TIMEOUT_SECS}, got {timeout}"),
                });
            }
            config.translation.timeout_secs = timeout;
        }
    }

    Ok(config)
}

fn require_value(field: &'static str, value: String) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::InvalidTranslationField {
            field,
            message: "cannot be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{
        load_at_path, merge_config, ConfigError, ConfigFile, PhoneFile, TextFile,
        TranslationFile,
    };
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn restrict_permissions(path: &Path) {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(path).expect("metadata").permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms).expect("chmod");
        }
    }

    #[test]
    fn merge_config_applies_values() {
        let parsed = ConfigFile {
            phone: Some(PhoneFile {
                country_codes: Some(vec!["+358".to_string()]),
                national_length: Some(9),
                min_candidate_digits: Some(7),
                max_candidate_digits: None,
            }),
            text: Some(TextFile {
                punctuation: Some(",.".to_string()),
            }),
            translation: Some(TranslationFile {
                enabled: Some(true),
                endpoint: Some(" https://translate.example.com/translate ".to_string()),
                target_lang: Some("fi".to_string()),
                ..Default::default()
            }),
        };
        let merged = merge_config(parsed).expect("merge");
        assert_eq!(merged.phone.policy.country_codes(), ["358"]);
        assert_eq!(merged.phone.policy.national_length(), 9);
        assert_eq!(merged.phone.min_candidate_digits, 7);
        assert_eq!(merged.phone.max_candidate_digits, 15);
        assert_eq!(merged.text.punctuation, ",.");
        assert_eq!(
            merged.translation.http_endpoint(),
            Some("https://translate.example.com/translate")
        );
        assert_eq!(merged.translation.target_lang, "fi");
        assert_eq!(merged.translation.source_lang, "auto");
    }

    #[test]
    fn merge_config_rejects_bad_phone_values() {
        let parsed = ConfigFile {
            phone: Some(PhoneFile {
                country_codes: Some(vec!["one".to_string()]),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(matches!(
            merge_config(parsed),
            Err(ConfigError::InvalidPhone(_))
        ));

        let parsed = ConfigFile {
            phone: Some(PhoneFile {
                min_candidate_digits: Some(16),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(matches!(
            merge_config(parsed),
            Err(ConfigError::InvalidCandidateDigits { min: 16, max: 15 })
        ));
    }

    #[test]
    fn disabled_translation_hides_endpoint() {
        let parsed = ConfigFile {
            translation: Some(TranslationFile {
                enabled: Some(false),
                endpoint: Some("https://translate.example.com".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = merge_config(parsed).expect("merge");
        assert!(merged.translation.http_endpoint().is_none());
    }

    #[test]
    fn merge_config_rejects_bad_translation_values() {
        let parsed = ConfigFile {
            translation: Some(TranslationFile {
                timeout_secs: Some(0),
                ..Default::default()
            }),
            ..Default::default()
        };
        let err = merge_config(parsed).unwrap_err();
        assert!(err.to_string().contains("translation.timeout_secs"));

        let parsed = ConfigFile {
            translation: Some(TranslationFile {
                endpoint: Some("ftp://example.com".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(merge_config(parsed).is_err());
    }

    #[test]
    fn load_at_path_requires_file_when_requested() {
        let temp = TempDir::new().expect("tempdir");
        let missing = temp.path().join("config.toml");
        let err = load_at_path(&missing, true).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("config file not found"));
        assert!(load_at_path(&missing, false).expect("optional").is_none());
    }

    #[test]
    fn load_at_path_parses_toml() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            "[phone]\ncountry_codes = [\"1\", \"358\"]\n[translation]\nenabled = false\n",
        )
        .expect("write config");
        restrict_permissions(&path);

        let config = load_at_path(&path, true).expect("load").expect("config");
        assert_eq!(config.phone.policy.country_codes(), ["358", "1"]);
        assert!(!config.translation.enabled);
    }

    #[test]
    fn load_at_path_rejects_unknown_keys() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "[phone]\ncountry = \"1\"\n").expect("write config");
        restrict_permissions(&path);

        let err = load_at_path(&path, true).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn load_at_path_rejects_world_readable_file() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "").expect("write config");
        let mut perms = fs::metadata(&path).expect("metadata").permissions();
        perms.set_mode(0o644);
        fs::set_permissions(&path, perms).expect("chmod");

        let err = load_at_path(&path, true).unwrap_err();
        assert!(matches!(err, ConfigError::InsecurePermissions(_)));
    }
}

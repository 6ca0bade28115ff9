use anyhow::Error;
use pagecheck_config::ConfigError;
use pagecheck_core::CoreError;
use pagecheck_ingest::IngestError;
use pagecheck_store::error::{StoreError, StoreErrorKind};
use std::process::ExitCode;
use thiserror::Error as ThisError;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_NOT_FOUND: u8 = 2;
pub const EXIT_INVALID_INPUT: u8 = 3;

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
}

pub fn invalid_input(message: impl Into<String>) -> Error {
    CliError::InvalidInput(message.into()).into()
}

pub fn not_found(message: impl Into<String>) -> Error {
    CliError::NotFound(message.into()).into()
}

pub fn report_error(err: &Error, verbose: bool) {
    if verbose {
        eprintln!("error: {:#}", err);
    } else {
        eprintln!("error: {}", err);
    }
}

pub fn exit_code_for(err: &Error) -> ExitCode {
    for cause in err.chain() {
        if let Some(cli_err) = cause.downcast_ref::<CliError>() {
            return ExitCode::from(match cli_err {
                CliError::InvalidInput(_) => EXIT_INVALID_INPUT,
                CliError::NotFound(_) => EXIT_NOT_FOUND,
            });
        }
        if let Some(store_err) = cause.downcast_ref::<StoreError>() {
            return ExitCode::from(store_exit_code(store_err));
        }
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return ExitCode::from(config_exit_code(config_err));
        }
        if let Some(ingest_err) = cause.downcast_ref::<IngestError>() {
            return ExitCode::from(ingest_exit_code(ingest_err));
        }
        if cause.downcast_ref::<CoreError>().is_some() {
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
        if cause.downcast_ref::<std::io::Error>().is_some() {
            return ExitCode::from(EXIT_FAILURE);
        }
    }
    ExitCode::from(EXIT_FAILURE)
}

fn store_exit_code(err: &StoreError) -> u8 {
    match err.kind() {
        StoreErrorKind::NotFound => EXIT_NOT_FOUND,
        StoreErrorKind::InvalidId | StoreErrorKind::InvalidDataPath | StoreErrorKind::Core => {
            EXIT_INVALID_INPUT
        }
        StoreErrorKind::MissingHomeDir
        | StoreErrorKind::Migration
        | StoreErrorKind::InvalidColumn
        | StoreErrorKind::Sql
        | StoreErrorKind::Io => EXIT_FAILURE,
    }
}

fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::MissingHomeDir => EXIT_FAILURE,
        ConfigError::InvalidConfigPath(_)
        | ConfigError::MissingConfigFile(_)
        | ConfigError::InsecurePermissions(_)
        | ConfigError::InvalidPhone(_)
        | ConfigError::InvalidCandidateDigits { .. }
        | ConfigError::InvalidTranslationField { .. }
        | ConfigError::Read { .. }
        | ConfigError::Parse { .. } => EXIT_INVALID_INPUT,
    }
}

fn ingest_exit_code(err: &IngestError) -> u8 {
    match err {
        IngestError::Io(_) => EXIT_FAILURE,
        IngestError::Parse(_) | IngestError::Json(_) | IngestError::Unavailable(_) => {
            EXIT_INVALID_INPUT
        }
        #[cfg(feature = "http-translate")]
        IngestError::Http(_) => EXIT_FAILURE,
        #[cfg(feature = "http-translate")]
        IngestError::Url(_) => EXIT_INVALID_INPUT,
    }
}

#[cfg(test)]
mod tests {
    use super::{ingest_exit_code, EXIT_FAILURE, EXIT_INVALID_INPUT};
    use pagecheck_ingest::IngestError;

    #[test]
    fn ingest_errors_map_to_exit_codes() {
        assert_eq!(
            ingest_exit_code(&IngestError::Parse("bad row".to_string())),
            EXIT_INVALID_INPUT
        );
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(ingest_exit_code(&IngestError::Io(io)), EXIT_FAILURE);
    }

    #[cfg(feature = "http-translate")]
    #[test]
    fn malformed_translation_endpoint_is_invalid_input() {
        use pagecheck_ingest::translate::{HttpTranslator, HttpTranslatorOptions};
        use std::time::Duration;

        let err = HttpTranslator::new(HttpTranslatorOptions {
            endpoint: "not a url".to_string(),
            source_lang: "auto".to_string(),
            target_lang: "en".to_string(),
            api_key: None,
            timeout: Duration::from_secs(1),
        })
        .unwrap_err();
        assert!(matches!(err, IngestError::Url(_)));
        assert_eq!(ingest_exit_code(&err), EXIT_INVALID_INPUT);
    }
}

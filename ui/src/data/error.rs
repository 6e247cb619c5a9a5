use thiserror::Error;

/// Why a gut-health dataset could not be turned into samples.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataLoadError {
    #[error("resource `{resource}` is unreachable: {reason}")]
    Unreachable { resource: String, reason: String },

    #[error("resource `{resource}` has no `{column}` column")]
    MissingColumn { resource: String, column: &'static str },

    #[error("resource `{resource}` line {line}: glucose value `{value}` is not a number")]
    InvalidGlucose {
        resource: String,
        line: u64,
        value: String,
    },

    #[error("resource `{resource}` line {line}: timestamp `{value}` is not recognised")]
    InvalidTimestamp {
        resource: String,
        line: u64,
        value: String,
    },

    #[error("resource `{resource}` line {line}: `{value}` is not a known {column}")]
    UnknownCategory {
        resource: String,
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("resource `{resource}` is not valid CSV: {message}")]
    Csv { resource: String, message: String },
}

// KPI error taxonomy
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum KpiError {
    /// No row carries both a value and a target.
    #[error("no valid value/target pair available")]
    NotAvailable,

    #[error("configuration error for indicator '{indicator}': {reason}")]
    Configuration { indicator: String, reason: String },

    #[error("malformed record: field '{field}' holds non-numeric value '{raw}'")]
    MalformedRecord { field: String, raw: String },

    #[error("target series has {targets} periods but value series has {values}")]
    SeriesLengthMismatch { values: usize, targets: usize },
}

impl KpiError {
    pub fn configuration(indicator: impl Into<String>, reason: impl Into<String>) -> Self {
        KpiError::Configuration {
            indicator: indicator.into(),
            reason: reason.into(),
        }
    }
}

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EtaError {
    #[error("total units must be positive and finite, got {0}")]
    InvalidTotal(f64),

    #[error("invalid option `{name}`: {reason}")]
    InvalidOption { name: &'static str, reason: String },
}

impl EtaError {
    pub(crate) fn option(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            name,
            reason: reason.into(),
        }
    }
}

/// Checks a total unit count for construction and reset.
#[inline]
pub(crate) fn validate_total(total: f64) -> Result<f64, EtaError> {
    if total.is_finite() && total > 0.0 {
        Ok(total)
    } else {
        Err(EtaError::InvalidTotal(total))
    }
}

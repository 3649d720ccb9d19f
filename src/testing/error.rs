use std::fmt;
use thiserror::Error;

/// Which moment of a distribution was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Moment {
    Mean,
    Variance,
    StdDev,
}

impl fmt::Display for Moment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Moment::Mean => write!(f, "mean"),
            Moment::Variance => write!(f, "variance"),
            Moment::StdDev => write!(f, "standard deviation"),
        }
    }
}

/// Errors raised by the inference engine and the distribution tables.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InferenceError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("The {moment} is undefined: {reason}")]
    UndefinedMoment { moment: Moment, reason: String },
}

impl InferenceError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        InferenceError::InvalidParameter(message.into())
    }

    pub(crate) fn undefined(moment: Moment, reason: impl Into<String>) -> Self {
        InferenceError::UndefinedMoment {
            moment,
            reason: reason.into(),
        }
    }

    /// True if this error reports an undefined moment rather than bad input.
    pub fn is_undefined_moment(&self) -> bool {
        matches!(self, InferenceError::UndefinedMoment { .. })
    }
}

pub type Result<T> = std::result::Result<T, InferenceError>;

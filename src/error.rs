use thiserror::Error;

/// Unified error type for `marketscope` operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MarketError {
    /// Raised when a share computation receives no records.
    #[error("cannot compute {context} from an empty record set")]
    EmptyInput {
        /// Human-readable context describing the operation.
        context: &'static str,
    },

    /// Raised when a solver parameter would make the closed form undefined.
    #[error("invalid model parameter `{parameter}` = {value}: {reason}")]
    InvalidParameter {
        /// Parameter name as used in the demand specification (`a`, `b`, `c`, `d`, `n`).
        parameter: &'static str,
        /// The offending value.
        value: f64,
        /// Short description of the violated requirement.
        reason: &'static str,
    },

    /// Raised when a tabular row does not carry a required column.
    #[error("required column `{column}` is missing")]
    MissingColumn { column: String },

    /// Raised when a required cell is present but blank.
    #[error("row {row} has no value for required column `{column}`")]
    MissingValue { column: String, row: usize },

    /// Raised when metrics are requested for an activity absent from the records.
    #[error("activity `{activity}` does not occur in the record set")]
    UnknownActivity { activity: String },
}

impl MarketError {
    /// Helper to raise an [`EmptyInput`](MarketError::EmptyInput) error.
    pub fn empty_input(context: &'static str) -> Self {
        Self::EmptyInput { context }
    }

    /// Helper to format an [`InvalidParameter`](MarketError::InvalidParameter) error.
    pub fn invalid_parameter(parameter: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidParameter {
            parameter,
            value,
            reason,
        }
    }
}

/// Type alias for results returned by this crate.
pub type Result<T> = std::result::Result<T, MarketError>;

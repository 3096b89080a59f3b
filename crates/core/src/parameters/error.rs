//! Parameter store errors

/// Errors from reading, registering or writing parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterError {
    /// Name longer than `PARAM_NAME_LEN`
    NameTooLong,
    /// Parameter was never registered
    Unknown,
    /// No room for another parameter
    StoreFull,
    /// Parameter is flagged read-only
    ReadOnly,
    /// Stored value cannot be applied (e.g. a mixer row beyond the table)
    Rejected,
}

impl core::fmt::Display for ParameterError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParameterError::NameTooLong => write!(f, "parameter name too long"),
            ParameterError::Unknown => write!(f, "unknown parameter"),
            ParameterError::StoreFull => write!(f, "parameter store full"),
            ParameterError::ReadOnly => write!(f, "parameter is read-only"),
            ParameterError::Rejected => write!(f, "parameter value rejected"),
        }
    }
}

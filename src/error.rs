use thiserror::Error;

/// Invalid invocation: a malformed flag value, a choice outside its allowed
/// set, or a value-expecting flag with nothing following it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct UsageError {
    message: String,
}

impl UsageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

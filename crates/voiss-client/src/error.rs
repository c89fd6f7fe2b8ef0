/// Client-specific result type
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors from calls to Fish Audio or the synthesis proxy
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport failure or undecodable response body
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP error! status: {status}, message: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body text
        message: String,
    },

    /// Invalid client configuration
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// HTTP status for errors that carry one
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(_) | Self::Config(_) => None,
        }
    }
}

/// A required field was empty at submission time
///
/// Messages are meant to be shown to the user as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter the text to synthesize")]
    MissingText,

    #[error("Please enter an authorization token")]
    MissingCredential,

    #[error("Please enter a model ID")]
    MissingReference,

    #[error("Please select an audio file")]
    MissingAudio,
}

/// A field-update event could not be applied
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("unknown field `{0}`")]
    UnknownField(String),

    #[error("invalid value `{value}` for `{field}`: {reason}")]
    InvalidValue {
        field: &'static str,
        value: String,
        reason: String,
    },
}

impl FormError {
    pub(crate) fn invalid(field: &'static str, value: &str, reason: impl ToString) -> Self {
        Self::InvalidValue {
            field,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

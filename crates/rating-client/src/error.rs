use thiserror::Error;

/// Errors that can occur while looking up a single film.
///
/// None of these are fatal to a batch: the pool drops the candidate and
/// moves on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Request timed out")]
    Timeout,

    #[error("Failed to connect to rating service: {0}")]
    Connection(String),

    #[error("No film identifier in search response")]
    Unresolved,

    #[error("Rating service returned HTTP {0}")]
    HttpStatus(u16),

    #[error("Rating value is not numeric: {0:?}")]
    MalformedRating(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Coarse classification of lookup failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Timeouts and connection failures
    Transient,
    /// The search did not yield an identifier
    Resolution,
    /// The rating service answered with something unusable
    Data,
}

impl LookupError {
    pub fn kind(&self) -> FailureKind {
        match self {
            LookupError::Timeout | LookupError::Connection(_) | LookupError::Transport(_) => {
                FailureKind::Transient
            }
            LookupError::Unresolved => FailureKind::Resolution,
            LookupError::HttpStatus(_) | LookupError::MalformedRating(_) => FailureKind::Data,
        }
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LookupError::Timeout
        } else if err.is_connect() {
            LookupError::Connection(err.to_string())
        } else if let Some(status) = err.status() {
            LookupError::HttpStatus(status.as_u16())
        } else {
            LookupError::Transport(err.to_string())
        }
    }
}

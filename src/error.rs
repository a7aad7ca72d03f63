/// Error types for the translation orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    /// Bad static data or settings, detected at startup
    ConfigurationError(String),
    /// Transport-level failure, including request timeouts
    NetworkError(String),
    /// The endpoint answered with a non-success status
    UpstreamError { status: u16, body: String },
    /// The endpoint answered, but not with the expected shape
    ProtocolError(String),
}

impl TranslateError {
    /// The fieldless classification used in settled results
    pub fn kind(&self) -> ErrorKind {
        match self {
            TranslateError::ConfigurationError(_) => ErrorKind::Configuration,
            TranslateError::NetworkError(_) => ErrorKind::Network,
            TranslateError::UpstreamError { .. } => ErrorKind::Upstream,
            TranslateError::ProtocolError(_) => ErrorKind::Protocol,
        }
    }
}

impl std::fmt::Display for TranslateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranslateError::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
            TranslateError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            TranslateError::UpstreamError { status, body } => {
                write!(f, "Upstream error (status {}): {}", status, body)
            }
            TranslateError::ProtocolError(msg) => write!(f, "Protocol error: {}", msg),
        }
    }
}

impl std::error::Error for TranslateError {}

impl From<reqwest::Error> for TranslateError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            TranslateError::ProtocolError(format!("Failed to decode response: {}", err))
        } else if err.is_timeout() {
            TranslateError::NetworkError(format!("Request timed out: {}", err))
        } else if let Some(status) = err.status() {
            TranslateError::UpstreamError {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            TranslateError::NetworkError(err.to_string())
        }
    }
}

/// Why a remote translation failed
///
/// Every kind collapses into the same user-visible failure notification;
/// the distinction exists for logs and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    Network,
    Upstream,
    Protocol,
    /// The resolution task itself faulted
    Internal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Network => "network",
            ErrorKind::Upstream => "upstream",
            ErrorKind::Protocol => "protocol",
            ErrorKind::Internal => "internal",
        };
        f.write_str(name)
    }
}

/// Result type for translation operations
pub type TranslateResult<T> = Result<T, TranslateError>;

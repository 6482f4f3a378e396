use std::fmt;

/// Custom error type for report generation
#[derive(Debug)]
pub enum ReportError {
    /// Configuration error
    Config(String),

    /// A required parameter or request placeholder has no value
    UnknownParameter(String),

    /// Network/IO failure while talking to the server
    Transport(String),

    /// The server answered something that is not the expected JSON shape
    MalformedResponse { message: String, payload: String },

    /// The server answered with an explicit `errors` payload
    ServerReported(String),

    /// The project's quality gate is missing from the server's gate list
    UnknownQualityGate(String),

    /// IO error
    Io(std::io::Error),

    /// Serialization error
    Serialization(serde_json::Error),
}

impl ReportError {
    /// Builds a `MalformedResponse` keeping the raw payload for diagnostics
    pub fn malformed(message: impl Into<String>, payload: impl Into<String>) -> Self {
        ReportError::MalformedResponse {
            message: message.into(),
            payload: payload.into(),
        }
    }
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::Config(msg) => write!(f, "Configuration error: {}", msg),
            ReportError::UnknownParameter(name) => write!(f, "Unknown parameter: {}", name),
            ReportError::Transport(msg) => write!(f, "Transport error: {}", msg),
            ReportError::MalformedResponse { message, payload } => {
                write!(f, "Malformed response: {}. Server answered: {}", message, payload)
            }
            ReportError::ServerReported(msg) => write!(f, "{}", msg),
            ReportError::UnknownQualityGate(name) => {
                write!(f, "Unknown quality gate: {}", name)
            }
            ReportError::Io(err) => write!(f, "IO error: {}", err),
            ReportError::Serialization(err) => write!(f, "Serialization error: {}", err),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReportError::Io(err) => Some(err),
            ReportError::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ReportError {
    fn from(err: std::io::Error) -> Self {
        ReportError::Io(err)
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        ReportError::Serialization(err)
    }
}

impl From<reqwest::Error> for ReportError {
    fn from(err: reqwest::Error) -> Self {
        ReportError::Transport(err.to_string())
    }
}

/// Result type for report operations
pub type Result<T> = std::result::Result<T, ReportError>;

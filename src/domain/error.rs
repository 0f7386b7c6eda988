use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Server error: HTTP {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl DomainError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::TransportError(msg.into())
    }

    pub fn server(status: u16, body: impl Into<String>) -> Self {
        Self::ServerError {
            status,
            body: body.into(),
        }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigError(_))
    }

    pub fn is_transport_error(&self) -> bool {
        matches!(self, Self::TransportError(_))
    }

    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ServerError { .. })
    }

    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::ParseError(_))
    }

    /// Errors that end only the current turn; the session keeps running.
    pub fn is_recoverable(&self) -> bool {
        !self.is_config_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_includes_status_and_body() {
        let err = DomainError::server(429, "{\"error\":\"slow down\"}");
        let msg = err.to_string();
        assert!(msg.contains("429"));
        assert!(msg.contains("slow down"));
        assert!(err.is_server_error());
    }

    #[test]
    fn config_errors_are_fatal() {
        assert!(!DomainError::config("missing key").is_recoverable());
        assert!(DomainError::transport("refused").is_recoverable());
        assert!(DomainError::parse("no choices").is_recoverable());
    }
}

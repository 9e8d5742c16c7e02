use thiserror::Error;

/// Errors that can occur while resolving credentials or talking to the
/// chat deployment.
#[derive(Error, Debug)]
pub enum AgentError {
    /// Credential construction or token acquisition failed.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The request failed due to an HTTP error.
    #[error("HTTP error: {status} - {message}")]
    Http { status: u16, message: String },

    /// The API returned an error response.
    #[error("API error ({code}): {message}")]
    Api { code: String, message: String },

    /// The HTTP request failed at the transport level.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The request payload could not be serialized, or a response or tool
    /// argument payload could not be deserialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The endpoint URL is invalid.
    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(String),

    /// A required configuration value is missing.
    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    /// A tool call could not be dispatched.
    #[error("Tool error: {0}")]
    Tool(String),
}

/// Result type alias for agent operations.
pub type AgentResult<T> = std::result::Result<T, AgentError>;

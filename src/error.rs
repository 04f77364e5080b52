//! Error types and handling for the weathervane service

use thiserror::Error;

/// Main error type for the weathervane service
#[derive(Error, Debug)]
pub enum WeathervaneError {
    /// Request parameters failed hard validation
    #[error("Invalid parameters")]
    InvalidParameters { errors: Vec<String> },

    /// The geocoder had no match for the requested address
    #[error("Location not found.")]
    LocationNotFound,

    /// The geocoder call itself failed
    #[error("Geocoding failed: {message}")]
    Geocoding { message: String },

    /// The forecast provider could not be reached at all
    #[error("Connection error: {message}")]
    Connection { message: String },

    /// The forecast provider answered with an error status
    #[error("{message}")]
    Upstream { message: String },

    /// The forecast provider answered 2xx with a body we could not use.
    /// The decode detail stays internal; clients get the stable message.
    #[error("Invalid JSON response from the API.")]
    MalformedResponse { message: String },

    /// Cache backend errors
    #[error("Cache error: {message}")]
    Cache { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl WeathervaneError {
    /// Create a validation error from the collected violation messages
    pub fn invalid_parameters(errors: Vec<String>) -> Self {
        Self::InvalidParameters { errors }
    }

    /// Create a new geocoding error
    pub fn geocoding<S: Into<String>>(message: S) -> Self {
        Self::Geocoding {
            message: message.into(),
        }
    }

    /// Create a new connection error
    pub fn connection<S: Into<String>>(message: S) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a new upstream error
    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    /// Create a new malformed-response error
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Create a new cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Detail strings for the client-facing error envelope
    #[must_use]
    pub fn user_messages(&self) -> Vec<String> {
        match self {
            WeathervaneError::InvalidParameters { errors } => errors.clone(),
            other => vec![other.to_string()],
        }
    }
}

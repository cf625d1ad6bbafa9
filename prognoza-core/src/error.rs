//! Error types for forecast fetches and geocoding lookups.

use thiserror::Error;

/// Placeholder shown by every front end when a fetch fails.
pub const UNAVAILABLE_MESSAGE: &str = "Weather data unavailable";

#[derive(Error, Debug)]
pub enum FetchError {
    /// The request could not be built (blank key, non-finite coordinate,
    /// bad base URL). No network call was made.
    #[error("Invalid forecast request: {0}")]
    InvalidRequest(String),

    /// Network failure, non-success status or unreadable body.
    #[error("Forecast transport error: {0}")]
    Transport(String),

    /// Body is not JSON or lacks required forecast fields.
    #[error("Malformed forecast response: {0}")]
    Malformed(String),

    #[error("Forecast fetch was cancelled")]
    Cancelled,
}

impl FetchError {
    /// Failure kinds are not distinguished on screen.
    pub fn user_message(&self) -> &'static str {
        UNAVAILABLE_MESSAGE
    }
}

#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("No placemark found for {0}")]
    NotFound(String),

    #[error("Invalid geocoding request: {0}")]
    InvalidRequest(String),

    #[error("Geocoding transport error: {0}")]
    Transport(String),

    #[error("Malformed geocoding response: {0}")]
    Malformed(String),
}

/// Why one favorite could not be refreshed.
#[derive(Error, Debug)]
pub enum RefreshError {
    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_is_the_same_for_every_kind() {
        let errors = [
            FetchError::InvalidRequest("x".into()),
            FetchError::Transport("x".into()),
            FetchError::Malformed("x".into()),
            FetchError::Cancelled,
        ];

        for err in errors {
            assert_eq!(err.user_message(), "Weather data unavailable");
        }
    }

    #[test]
    fn refresh_error_is_transparent() {
        let err = RefreshError::from(GeocodeError::NotFound("'Atlantis'".into()));
        assert_eq!(err.to_string(), "No placemark found for 'Atlantis'");
    }
}

//! Places API error types.

/// Errors that can occur when interacting with the Places API.
#[derive(Debug, thiserror::Error)]
pub enum PlacesError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API key was rejected
    #[error("request denied: {message}")]
    RequestDenied { message: String },

    /// Quota exhausted
    #[error("rate limited by Places API")]
    RateLimited,

    /// The request was malformed (bad location, radius, etc.)
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    /// Place ID unknown or no longer valid
    #[error("place not found: {place_id}")]
    NotFound { place_id: String },

    /// API returned an unexpected HTTP or provider status
    #[error("API error {status}: {message}")]
    Api { status: String, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Response was well-formed but not a usable place
    #[error("invalid place data: {0}")]
    Conversion(#[from] super::convert::ConversionError),
}

impl PlacesError {
    /// Map a non-OK provider status to an error.
    pub(crate) fn from_status(status: &str, message: Option<String>) -> Self {
        let message = message.unwrap_or_default();
        match status {
            "REQUEST_DENIED" => PlacesError::RequestDenied { message },
            "OVER_QUERY_LIMIT" => PlacesError::RateLimited,
            "INVALID_REQUEST" => PlacesError::InvalidRequest { message },
            other => PlacesError::Api {
                status: other.to_string(),
                message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert!(matches!(
            PlacesError::from_status("REQUEST_DENIED", Some("bad key".into())),
            PlacesError::RequestDenied { .. }
        ));
        assert!(matches!(
            PlacesError::from_status("OVER_QUERY_LIMIT", None),
            PlacesError::RateLimited
        ));
        assert!(matches!(
            PlacesError::from_status("INVALID_REQUEST", None),
            PlacesError::InvalidRequest { .. }
        ));

        let err = PlacesError::from_status("UNKNOWN_ERROR", Some("try again".into()));
        assert_eq!(err.to_string(), "API error UNKNOWN_ERROR: try again");
    }
}

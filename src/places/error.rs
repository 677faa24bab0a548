use std::fmt::Formatter;

use reqwest::StatusCode;

#[derive(Debug)]
pub enum PlacesApiError {
    /// The API answered with a non success status
    Status(StatusCode),
    /// The API could not be reached, or the response body could not be read
    Transport(reqwest::Error),
    /// The response body is not a valid OS Places response
    InvalidResponse(serde_json::Error),
}

impl PlacesApiError {
    /// Server errors, failed connections and timeouts may succeed when tried again.
    pub fn is_retryable(&self) -> bool {
        match self {
            PlacesApiError::Status(status) => status.is_server_error(),
            PlacesApiError::Transport(inner) => inner.is_connect() || inner.is_timeout(),
            PlacesApiError::InvalidResponse(_) => false,
        }
    }
}

impl std::fmt::Display for PlacesApiError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let reason = match self {
            PlacesApiError::Status(status) => match status.canonical_reason() {
                Some(reason) => reason.to_owned(),
                None => status.as_str().to_owned(),
            },
            PlacesApiError::Transport(inner) => inner.to_string(),
            PlacesApiError::InvalidResponse(inner) => inner.to_string(),
        };
        write!(f, "Error calling OS Places API: {}", reason)
    }
}

impl std::error::Error for PlacesApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlacesApiError::Status(_) => None,
            PlacesApiError::Transport(inner) => Some(inner),
            PlacesApiError::InvalidResponse(inner) => Some(inner),
        }
    }
}

impl From<reqwest::Error> for PlacesApiError {
    fn from(error: reqwest::Error) -> Self {
        PlacesApiError::Transport(error)
    }
}

impl From<serde_json::Error> for PlacesApiError {
    fn from(error: serde_json::Error) -> Self {
        PlacesApiError::InvalidResponse(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_status() {
        let err = PlacesApiError::Status(StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "Error calling OS Places API: Unauthorized");
    }

    #[test]
    fn test_display_invalid_response() {
        let inner = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let expected = format!("Error calling OS Places API: {}", inner);
        assert_eq!(PlacesApiError::from(inner).to_string(), expected);
    }

    #[test]
    fn test_is_retryable() {
        assert!(PlacesApiError::Status(StatusCode::BAD_GATEWAY).is_retryable());
        assert!(!PlacesApiError::Status(StatusCode::UNAUTHORIZED).is_retryable());
        let inner = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(!PlacesApiError::from(inner).is_retryable());
    }
}

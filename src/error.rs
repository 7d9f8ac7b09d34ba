use thiserror::Error;

/// Unified error type for the Carousel library
#[derive(Error, Debug)]
pub enum CarouselError {
    // Pool errors
    #[error("No proxies available")]
    NoProxiesAvailable,

    #[error("All proxies exhausted after {attempts} attempts")]
    AllProxiesExhausted { attempts: u32 },

    #[error("Invalid proxy address: {0}")]
    InvalidProxyAddress(String),

    // Source errors
    #[error("Source '{source_name}' failed: {message}")]
    SourceFetchFailed {
        source_name: String,
        message: String,
    },

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(String),
}

/// Result type alias for Carousel operations
pub type Result<T> = std::result::Result<T, CarouselError>;

impl CarouselError {
    /// Check if this error means the pool ran dry (as opposed to a
    /// configuration or transport problem)
    pub fn is_exhaustion(&self) -> bool {
        matches!(
            self,
            CarouselError::NoProxiesAvailable | CarouselError::AllProxiesExhausted { .. }
        )
    }
}

// Convert from reqwest errors
impl From<reqwest::Error> for CarouselError {
    fn from(err: reqwest::Error) -> Self {
        CarouselError::Http(err.to_string())
    }
}

// Convert from URL parse errors
impl From<url::ParseError> for CarouselError {
    fn from(err: url::ParseError) -> Self {
        CarouselError::InvalidProxyAddress(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            CarouselError::NoProxiesAvailable.to_string(),
            "No proxies available"
        );
        assert_eq!(
            CarouselError::AllProxiesExhausted { attempts: 7 }.to_string(),
            "All proxies exhausted after 7 attempts"
        );
        assert_eq!(
            CarouselError::SourceFetchFailed {
                source_name: "free-list".to_string(),
                message: "timed out".to_string(),
            }
            .to_string(),
            "Source 'free-list' failed: timed out"
        );
    }

    #[test]
    fn test_is_exhaustion() {
        assert!(CarouselError::NoProxiesAvailable.is_exhaustion());
        assert!(CarouselError::AllProxiesExhausted { attempts: 1 }.is_exhaustion());
        assert!(!CarouselError::InvalidConfig("bad".to_string()).is_exhaustion());
        assert!(!CarouselError::Http("boom".to_string()).is_exhaustion());
    }

    #[test]
    fn test_url_parse_error_conversion() {
        let err: CarouselError = url::ParseError::EmptyHost.into();
        assert!(matches!(err, CarouselError::InvalidProxyAddress(_)));
    }
}

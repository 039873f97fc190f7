use crate::backend::error::BackendError;
use crate::logging::LogLevel;

#[derive(Debug, Clone)]
pub struct ErrorClassifier;

impl ErrorClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Log level for a failed device fetch.
    pub fn classify_fetch_error(&self, error: &BackendError) -> LogLevel {
        match error.status() {
            // Rate limiting - low priority
            Some(429) => LogLevel::Debug,

            // Server errors - usually temporary
            Some(500..=599) => LogLevel::Warn,

            // Authentication errors - critical
            Some(401) | Some(403) => LogLevel::Error,

            // Network issues and malformed bodies
            _ => LogLevel::Warn,
        }
    }

    /// Log level for a failed wipe dispatch. A command that did not go out is always an error.
    pub fn classify_dispatch_error(&self, error: &BackendError) -> LogLevel {
        match error.status() {
            Some(429) => LogLevel::Warn,
            _ => LogLevel::Error,
        }
    }
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16) -> BackendError {
        BackendError::Http {
            status,
            message: String::new(),
        }
    }

    #[test]
    fn fetch_errors_by_status() {
        let classifier = ErrorClassifier::new();
        assert_eq!(classifier.classify_fetch_error(&http(429)), LogLevel::Debug);
        assert_eq!(classifier.classify_fetch_error(&http(503)), LogLevel::Warn);
        assert_eq!(classifier.classify_fetch_error(&http(401)), LogLevel::Error);
        assert_eq!(classifier.classify_fetch_error(&http(403)), LogLevel::Error);
        assert_eq!(classifier.classify_fetch_error(&http(404)), LogLevel::Warn);
    }

    #[test]
    fn decode_errors_are_warnings() {
        let decode = serde_json::from_slice::<serde_json::Value>(b"{").unwrap_err();
        let error = BackendError::Decode(decode);
        assert_eq!(
            ErrorClassifier::new().classify_fetch_error(&error),
            LogLevel::Warn
        );
    }

    #[test]
    fn dispatch_errors_are_errors_unless_rate_limited() {
        let classifier = ErrorClassifier::new();
        assert_eq!(classifier.classify_dispatch_error(&http(500)), LogLevel::Error);
        assert_eq!(classifier.classify_dispatch_error(&http(429)), LogLevel::Warn);
    }
}

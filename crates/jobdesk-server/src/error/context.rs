//! Error context utilities.

use super::types::ApiError;

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Add context to an error, converting to ApiError.
    fn context(self, context: impl Into<String>) -> Result<T, ApiError>;
}

impl<T, E: std::error::Error + Send + Sync + 'static> ErrorContext<T> for Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T, ApiError> {
        self.map_err(|e| {
            ApiError::Internal(anyhow::Error::from(e).context(context.into()))
        })
    }
}

impl<T> ErrorContext<T> for Option<T> {
    fn context(self, context: impl Into<String>) -> Result<T, ApiError> {
        self.ok_or_else(|| ApiError::Internal(anyhow::anyhow!(context.into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_context_is_internal() {
        let result: Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        let err = result.context("writing metrics").unwrap_err();

        match err {
            ApiError::Internal(inner) => assert_eq!(inner.to_string(), "writing metrics"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_option_context_is_internal() {
        let missing: Option<u32> = None;
        let err = missing.context("template registry").unwrap_err();
        assert!(matches!(err, ApiError::Internal(_)));
    }
}

//! Authentication extractor for handlers.
//!
//! Guards insert the [`Identity`] they authorized into request extensions;
//! [`Auth`] hands it to handlers.

use super::types::Identity;
use crate::error::ApiError;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};

/// Extractor for the authorized identity (required).
pub struct Auth(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(Auth)
            .ok_or(ApiError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::auth::types::Role;
    use axum::http::Request;

    fn identity() -> Identity {
        Identity::new("user-1", "test@example.com", "Test", "ADMIN")
    }

    #[tokio::test]
    async fn test_auth_extractor_success() {
        let req = Request::new(());
        let (mut parts, _) = req.into_parts();
        parts.extensions.insert(identity());

        let Auth(extracted) = Auth::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(extracted.id, "user-1");
        assert_eq!(extracted.role, Some(Role::Admin));
    }

    #[tokio::test]
    async fn test_auth_extractor_missing() {
        let req = Request::new(());
        let (mut parts, _) = req.into_parts();

        let result = Auth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }
}

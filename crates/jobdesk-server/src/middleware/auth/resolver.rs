//! Session resolution.
//!
//! A [`SessionResolver`] turns request headers into a [`Session`]. Missing,
//! malformed, forged and expired tokens all resolve to an anonymous session;
//! only a failing session backend produces an error.

use super::{
    jwt::decode_token,
    types::{Identity, Session},
};
use crate::config::AuthConfig;
use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use axum_extra::extract::cookie::CookieJar;
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Session backend failure.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session backend unavailable: {0}")]
    Unavailable(String),
}

/// Resolves the session attached to a request.
#[async_trait]
pub trait SessionResolver: Send + Sync {
    async fn resolve(&self, headers: &HeaderMap) -> Result<Session, SessionError>;
}

/// Pull the session token from `Authorization: Bearer` or the session cookie.
pub fn extract_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        if let Some(token) = auth_header
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
        {
            return Some(token.to_string());
        }
    }

    CookieJar::from_headers(headers)
        .get(cookie_name)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

/// Resolves sessions from signed JWTs.
pub struct JwtSessionResolver {
    secret: Arc<String>,
    cookie_name: String,
}

impl JwtSessionResolver {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            secret: Arc::new(config.secret.clone()),
            cookie_name: config.session_cookie.clone(),
        }
    }
}

#[async_trait]
impl SessionResolver for JwtSessionResolver {
    async fn resolve(&self, headers: &HeaderMap) -> Result<Session, SessionError> {
        let Some(token) = extract_token(headers, &self.cookie_name) else {
            return Ok(Session::anonymous());
        };

        match decode_token(&token, &self.secret) {
            Ok(claims) if !claims.is_expired() => {
                Ok(Session::authenticated(claims.into_identity()))
            }
            Ok(_) => {
                debug!("Session token expired");
                Ok(Session::anonymous())
            }
            Err(err) => {
                debug!(error = %err, "Rejected session token");
                Ok(Session::anonymous())
            }
        }
    }
}

#[derive(sqlx::FromRow)]
struct IdentityRow {
    id: String,
    email: String,
    name: String,
    role: String,
    image: Option<String>,
    logo: Option<String>,
}

/// Resolves opaque session tokens stored in the `sessions` table.
pub struct DatabaseSessionResolver {
    pool: PgPool,
    cookie_name: String,
}

impl DatabaseSessionResolver {
    pub fn new(pool: PgPool, config: &AuthConfig) -> Self {
        Self {
            pool,
            cookie_name: config.session_cookie.clone(),
        }
    }
}

#[async_trait]
impl SessionResolver for DatabaseSessionResolver {
    async fn resolve(&self, headers: &HeaderMap) -> Result<Session, SessionError> {
        let Some(token) = extract_token(headers, &self.cookie_name) else {
            return Ok(Session::anonymous());
        };

        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT u.id, u.email, u.name, u.role, u.image, u.logo
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.session_token = $1 AND s.expires > NOW()
            "#,
        )
        .bind(&token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| SessionError::Unavailable(err.to_string()))?;

        Ok(match row {
            Some(row) => Session::authenticated(
                Identity::new(row.id, row.email, row.name, &row.role)
                    .with_image(row.image)
                    .with_logo(row.logo),
            ),
            None => {
                debug!("Unknown or expired session token");
                Session::anonymous()
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionStrategy;
    use crate::middleware::auth::{encode_token, Claims, Role};
    use axum::http::HeaderValue;
    use sqlx::postgres::PgPoolOptions;
    use std::time::Duration;

    const SECRET: &str = "resolver_test_secret_32_chars!!!";
    const COOKIE: &str = "jobdesk.session-token";

    fn resolver() -> JwtSessionResolver {
        JwtSessionResolver::new(&AuthConfig {
            strategy: SessionStrategy::Jwt,
            secret: SECRET.to_string(),
            session_cookie: COOKIE.to_string(),
        })
    }

    fn token(role: &str, expires_in: i64) -> String {
        let claims = Claims::new("user-1", "u@example.com", "User One", role, expires_in);
        encode_token(&claims, SECRET).unwrap()
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        headers
    }

    #[test]
    fn test_extract_token_from_bearer_header() {
        let headers = bearer("test_token");
        assert_eq!(extract_token(&headers, COOKIE).as_deref(), Some("test_token"));
    }

    #[test]
    fn test_extract_token_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; jobdesk.session-token=test_token"),
        );
        assert_eq!(extract_token(&headers, COOKIE).as_deref(), Some("test_token"));
    }

    #[test]
    fn test_extract_token_missing() {
        assert!(extract_token(&HeaderMap::new(), COOKIE).is_none());
        assert!(extract_token(&bearer(""), COOKIE).is_none());
    }

    #[tokio::test]
    async fn test_no_token_is_anonymous() {
        let session = resolver().resolve(&HeaderMap::new()).await.unwrap();
        assert!(session.is_anonymous());
    }

    #[tokio::test]
    async fn test_valid_token_resolves_identity() {
        let session = resolver().resolve(&bearer(&token("ADMIN", 3600))).await.unwrap();
        let identity = session.identity().unwrap();
        assert_eq!(identity.id, "user-1");
        assert_eq!(identity.role, Some(Role::Admin));
    }

    #[tokio::test]
    async fn test_garbage_and_expired_tokens_are_anonymous() {
        let resolver = resolver();
        assert!(resolver.resolve(&bearer("not-a-jwt")).await.unwrap().is_anonymous());
        assert!(resolver
            .resolve(&bearer(&token("ADMIN", -3600)))
            .await
            .unwrap()
            .is_anonymous());
    }

    #[tokio::test]
    async fn test_unknown_role_resolves_without_privilege() {
        let session = resolver().resolve(&bearer(&token("GUEST", 3600))).await.unwrap();
        assert_eq!(session.identity().unwrap().role, None);
    }

    fn unreachable_database() -> (PgPool, DatabaseSessionResolver) {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_secs(1))
            .connect_lazy("postgres://jobdesk@127.0.0.1:1/jobdesk")
            .unwrap();
        let resolver = DatabaseSessionResolver::new(
            pool.clone(),
            &AuthConfig {
                strategy: SessionStrategy::Database,
                secret: String::new(),
                session_cookie: COOKIE.to_string(),
            },
        );
        (pool, resolver)
    }

    #[tokio::test]
    async fn test_database_resolver_without_token_skips_lookup() {
        let (pool, resolver) = unreachable_database();

        let session = resolver.resolve(&HeaderMap::new()).await.unwrap();
        assert!(session.is_anonymous());
        assert_eq!(pool.size(), 0);
    }

    #[tokio::test]
    async fn test_database_resolver_backend_failure_is_unavailable() {
        let (_pool, resolver) = unreachable_database();

        let result = resolver.resolve(&bearer("opaque-session-token")).await;
        assert!(matches!(result, Err(SessionError::Unavailable(_))));
    }
}

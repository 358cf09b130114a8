//! Route guard layer.
//!
//! [`GuardLayer`] resolves the session, evaluates it against the route's
//! capability and either forwards the request with the [`Identity`] in its
//! extensions or answers the denial itself. The wrapped handler never runs on
//! deny.
//!
//! Nested guards share one resolution: the first stores the [`Session`] in the
//! request extensions and later guards reuse it.

use super::{
    audit::AuthzAuditEvent,
    policy::{evaluate, Capability, Decision, DenyReason},
};
use crate::{
    error::ApiError,
    middleware::auth::{
        resolver::SessionResolver,
        types::{Identity, Session},
    },
};
use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Redirect, Response},
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::error;

/// What a guard answers when it denies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDeny {
    /// `401 {"error":"Unauthorized"}` whatever the reason.
    Unauthorized,
    /// `303 See Other` to the given path.
    Redirect(&'static str),
}

impl OnDeny {
    fn respond(self) -> Response {
        match self {
            Self::Unauthorized => ApiError::Unauthorized.into_response(),
            Self::Redirect(path) => Redirect::to(path).into_response(),
        }
    }
}

/// Guard layer configuration.
#[derive(Clone)]
pub struct GuardLayer {
    resolver: Arc<dyn SessionResolver>,
    capability: Capability,
    on_deny: OnDeny,
}

impl GuardLayer {
    pub fn new(
        resolver: Arc<dyn SessionResolver>,
        capability: Capability,
        on_deny: OnDeny,
    ) -> Self {
        Self {
            resolver,
            capability,
            on_deny,
        }
    }

    /// Guard for API handlers.
    pub fn api(resolver: Arc<dyn SessionResolver>, capability: Capability) -> Self {
        Self::new(resolver, capability, OnDeny::Unauthorized)
    }

    /// Guard for rendered pages.
    pub fn page(
        resolver: Arc<dyn SessionResolver>,
        capability: Capability,
        fallback: &'static str,
    ) -> Self {
        Self::new(resolver, capability, OnDeny::Redirect(fallback))
    }
}

impl<S> Layer<S> for GuardLayer {
    type Service = GuardMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        GuardMiddleware {
            inner,
            resolver: self.resolver.clone(),
            capability: self.capability,
            on_deny: self.on_deny,
        }
    }
}

/// Guard middleware service.
#[derive(Clone)]
pub struct GuardMiddleware<S> {
    inner: S,
    resolver: Arc<dyn SessionResolver>,
    capability: Capability,
    on_deny: OnDeny,
}

impl<S> Service<Request<Body>> for GuardMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let resolver = self.resolver.clone();
        let capability = self.capability;
        let on_deny = self.on_deny;
        // Keep the service that was polled ready.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let path = req.uri().path().to_string();

            let session = match req.extensions().get::<Session>().cloned() {
                Some(session) => session,
                None => {
                    let resolved = resolver.resolve(req.headers()).await;
                    match resolved {
                        Ok(session) => {
                            req.extensions_mut().insert(session.clone());
                            session
                        }
                        Err(err) => {
                            error!(error = %err, path = %path, "Session resolution failed");
                            AuthzAuditEvent::denied(
                                &path,
                                capability,
                                DenyReason::SessionUnavailable,
                            )
                            .log();
                            return Ok(on_deny.respond());
                        }
                    }
                }
            };

            let identity: Identity = match evaluate(&session, capability) {
                Decision::Allow(identity) => {
                    AuthzAuditEvent::granted(&path, capability, identity).log();
                    identity.clone()
                }
                Decision::Deny(reason) => {
                    AuthzAuditEvent::denied(&path, capability, reason)
                        .for_identity(session.identity())
                        .log();
                    return Ok(on_deny.respond());
                }
            };

            req.extensions_mut().insert(identity);
            inner.call(req).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::auth::{
        resolver::SessionError,
        types::{Identity, Session},
        Auth,
    };
    use async_trait::async_trait;
    use axum::{
        body::to_bytes,
        http::{header, HeaderMap, StatusCode},
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    /// Resolver returning a fixed session, or failing.
    struct FixedResolver(Option<Session>);

    #[async_trait]
    impl SessionResolver for FixedResolver {
        async fn resolve(&self, _headers: &HeaderMap) -> Result<Session, SessionError> {
            self.0
                .clone()
                .ok_or_else(|| SessionError::Unavailable("connection reset".into()))
        }
    }

    fn resolver_for(raw_role: Option<&str>) -> Arc<dyn SessionResolver> {
        let session = match raw_role {
            Some(role) => Session::authenticated(Identity::new("u1", "u1@example.com", "U1", role)),
            None => Session::anonymous(),
        };
        Arc::new(FixedResolver(Some(session)))
    }

    async fn whoami(Auth(identity): Auth) -> String {
        identity.id
    }

    fn app(layer: GuardLayer) -> Router {
        Router::new().route("/", get(whoami)).layer(layer)
    }

    async fn call(layer: GuardLayer) -> Response {
        app(layer)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_api_guard_allows_and_passes_identity() {
        let layer = GuardLayer::api(resolver_for(Some("ADMIN")), Capability::AdminOrSuper);
        let response = call(layer).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"u1");
    }

    #[tokio::test]
    async fn test_api_guard_wrong_role_is_401_not_403() {
        let layer = GuardLayer::api(resolver_for(Some("USER")), Capability::AdminOrSuper);
        let response = call(layer).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"error":"Unauthorized"}"#);
    }

    #[tokio::test]
    async fn test_api_guard_anonymous_is_401() {
        let response = call(GuardLayer::api(resolver_for(None), Capability::Authenticated)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_resolver_failure_denies() {
        let failing: Arc<dyn SessionResolver> = Arc::new(FixedResolver(None));
        let response = call(GuardLayer::api(failing.clone(), Capability::Authenticated)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = call(GuardLayer::page(failing, Capability::Authenticated, "/")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    /// Counts resolutions.
    struct CountingResolver(std::sync::atomic::AtomicUsize);

    #[async_trait]
    impl SessionResolver for CountingResolver {
        async fn resolve(&self, _headers: &HeaderMap) -> Result<Session, SessionError> {
            self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(Session::authenticated(Identity::new("u1", "u1@example.com", "U1", "SUPER_ADMIN")))
        }
    }

    #[tokio::test]
    async fn test_nested_guards_resolve_once() {
        let counting = Arc::new(CountingResolver(Default::default()));
        let resolver: Arc<dyn SessionResolver> = counting.clone();

        let page_guard = GuardLayer::page(resolver.clone(), Capability::SuperOnly, "/admin");
        let router = Router::new()
            .route("/", get(whoami).route_layer(page_guard))
            .layer(GuardLayer::page(resolver, Capability::AdminOrSuper, "/"));

        let response = router
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(counting.0.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_page_guard_redirects_to_fallback() {
        let response = call(GuardLayer::page(
            resolver_for(Some("ADMIN")),
            Capability::SuperOnly,
            "/admin",
        ))
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/admin");
    }
}

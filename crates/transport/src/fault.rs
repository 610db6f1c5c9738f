//! Global fault classifier: session/authorization side effects of failed responses.

use std::sync::Arc;

use backoffice_auth::{DEFAULT_LOGIN_PATH, DEFAULT_UNAUTHORIZED_PATH};
use backoffice_core::{Navigator, Redirect};
use backoffice_session::SessionStore;

use crate::client::ResponseInterceptor;
use crate::error::ApiError;
use crate::path::{PublicPaths, resolve_request_path};

/// What a failed response demands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaultAction {
    /// Let the error through untouched.
    PassThrough,
    /// 401 on a protected endpoint: drop the session; redirect unless already on login.
    InvalidateSession { redirect: Option<Redirect> },
    /// 403: authenticated but forbidden; redirect unless already on the unauthorized route.
    Forbidden { redirect: Option<Redirect> },
}

/// Response interceptor enforcing session invariants.
///
/// - 401 on a non-public path → clear session, go to login
/// - 401 on a public path (e.g. a login attempt) → nothing
/// - 403 → go to the unauthorized route, session untouched
/// - anything else → nothing
pub struct FaultClassifier {
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
    public_paths: PublicPaths,
    login_path: String,
    unauthorized_path: String,
}

impl FaultClassifier {
    pub fn new(session: Arc<SessionStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            session,
            navigator,
            public_paths: PublicPaths::default(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            unauthorized_path: DEFAULT_UNAUTHORIZED_PATH.to_string(),
        }
    }

    pub fn with_public_paths(mut self, public_paths: PublicPaths) -> Self {
        self.public_paths = public_paths;
        self
    }

    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    pub fn with_unauthorized_path(mut self, path: impl Into<String>) -> Self {
        self.unauthorized_path = path.into();
        self
    }

    pub fn public_paths(&self) -> &PublicPaths {
        &self.public_paths
    }

    /// Decide the side effects for `error` given the current location. No mutation.
    pub fn classify(&self, error: &ApiError) -> FaultAction {
        match error.status() {
            Some(401) => {
                let request = error.request();
                let path = resolve_request_path(Some(&request.url), request.base_url.as_deref());
                if self.public_paths.is_public(&path) {
                    return FaultAction::PassThrough;
                }
                FaultAction::InvalidateSession {
                    redirect: self.redirect_unless_on(&self.login_path),
                }
            }
            Some(403) => FaultAction::Forbidden {
                redirect: self.redirect_unless_on(&self.unauthorized_path),
            },
            _ => FaultAction::PassThrough,
        }
    }

    fn redirect_unless_on(&self, target: &str) -> Option<Redirect> {
        let current = self.navigator.current_path();
        if current == target {
            return None;
        }
        Some(Redirect::to(target).replacing().from_location(current))
    }

    fn apply(&self, action: FaultAction) {
        match action {
            FaultAction::PassThrough => {}
            FaultAction::InvalidateSession { redirect } => {
                tracing::warn!("protected endpoint answered 401; invalidating session");
                self.session.clear();
                if let Some(redirect) = redirect {
                    self.navigator.navigate(redirect);
                }
            }
            FaultAction::Forbidden { redirect } => {
                tracing::warn!("endpoint answered 403");
                if let Some(redirect) = redirect {
                    self.navigator.navigate(redirect);
                }
            }
        }
    }
}

impl ResponseInterceptor for FaultClassifier {
    fn on_error(&self, error: &ApiError) {
        self.apply(self.classify(error));
    }
}

use std::borrow::Cow;

use serde::Serialize;

use backoffice_core::{Redirect, Role, Session};

pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_UNAUTHORIZED_PATH: &str = "/unauthorized";

/// Per-route guard configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardOptions {
    pub required_role: Option<Role>,
    pub login_path: Cow<'static, str>,
    pub unauthorized_path: Cow<'static, str>,
}

impl Default for GuardOptions {
    fn default() -> Self {
        Self {
            required_role: None,
            login_path: Cow::Borrowed(DEFAULT_LOGIN_PATH),
            unauthorized_path: Cow::Borrowed(DEFAULT_UNAUTHORIZED_PATH),
        }
    }
}

impl GuardOptions {
    pub fn requiring(role: Role) -> Self {
        Self {
            required_role: Some(role),
            ..Self::default()
        }
    }

    pub fn with_login_path(mut self, path: impl Into<Cow<'static, str>>) -> Self {
        self.login_path = path.into();
        self
    }

    pub fn with_unauthorized_path(mut self, path: impl Into<Cow<'static, str>>) -> Self {
        self.unauthorized_path = path.into();
        self
    }
}

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Render the guarded content unchanged.
    Granted,
    Redirect(Redirect),
}

impl Access {
    pub fn is_granted(&self) -> bool {
        matches!(self, Access::Granted)
    }
}

/// Decide whether a protected view may render.
///
/// - No IO
/// - No panics
/// - `origin` is carried on the login redirect so the caller can come back post-login
pub fn check_access(session: &Session, options: &GuardOptions, origin: &str) -> Access {
    if !session.is_authenticated() {
        return Access::Redirect(
            Redirect::to(options.login_path.as_ref())
                .replacing()
                .from_location(origin),
        );
    }

    match options.required_role {
        Some(required) if session.role != Some(required) => {
            Access::Redirect(Redirect::to(options.unauthorized_path.as_ref()).replacing())
        }
        _ => Access::Granted,
    }
}

/// A guard bound to one route's options.
#[derive(Debug, Clone, Default)]
pub struct AccessGuard {
    options: GuardOptions,
}

impl AccessGuard {
    pub fn new(options: GuardOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GuardOptions {
        &self.options
    }

    pub fn check(&self, session: &Session, origin: &str) -> Access {
        let access = check_access(session, &self.options, origin);
        if let Access::Redirect(redirect) = &access {
            tracing::debug!(origin, to = %redirect.to, "route guard redirect");
        }
        access
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Access Explanation
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    NotAuthenticated,
    RoleMismatch,
}

/// Human-readable account of a guard decision (for `whoami`-style diagnostics).
#[derive(Debug, Clone, Serialize)]
pub struct AccessExplanation {
    pub granted: bool,
    pub reason: String,
    pub role: Option<Role>,
    pub required_role: Option<Role>,
    pub denial: Option<DenialKind>,
    pub redirect_to: Option<String>,
}

pub fn explain_access(session: &Session, options: &GuardOptions, origin: &str) -> AccessExplanation {
    let access = check_access(session, options, origin);
    let redirect_to = match &access {
        Access::Granted => None,
        Access::Redirect(r) => Some(r.to.clone()),
    };

    let (denial, reason) = match (&access, options.required_role) {
        (Access::Granted, None) => (None, "authenticated; route has no role requirement".to_string()),
        (Access::Granted, Some(required)) => (None, format!("role '{required}' matches requirement")),
        (Access::Redirect(_), _) if !session.is_authenticated() => (
            Some(DenialKind::NotAuthenticated),
            "no credential in session".to_string(),
        ),
        (Access::Redirect(_), required) => (
            Some(DenialKind::RoleMismatch),
            format!(
                "route requires role '{}', session has {}",
                required.map(|r| r.as_str()).unwrap_or("-"),
                session
                    .role
                    .map(|r| format!("'{r}'"))
                    .unwrap_or_else(|| "no role".to_string())
            ),
        ),
    };

    AccessExplanation {
        granted: access.is_granted(),
        reason,
        role: session.role,
        required_role: options.required_role,
        denial,
        redirect_to,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> Session {
        Session::authenticated("t", Some(Role::Admin), false)
    }

    #[test]
    fn no_token_redirects_to_login_with_origin() {
        let access = check_access(&Session::anonymous(), &GuardOptions::default(), "/tickets");

        let Access::Redirect(r) = access else {
            panic!("expected redirect");
        };
        assert_eq!(r.to, "/login");
        assert_eq!(r.from.as_deref(), Some("/tickets"));
        assert!(r.replace);
    }

    #[test]
    fn custom_login_path_is_honoured() {
        let options = GuardOptions::requiring(Role::Admin).with_login_path("/admin/login");
        let Access::Redirect(r) = check_access(&Session::anonymous(), &options, "/") else {
            panic!("expected redirect");
        };
        assert_eq!(r.to, "/admin/login");
    }

    #[test]
    fn wrong_role_redirects_to_unauthorized() {
        let session = Session::authenticated("t", Some(Role::Employee), true);
        let options = GuardOptions::requiring(Role::Admin).with_unauthorized_path("/403");

        let Access::Redirect(r) = check_access(&session, &options, "/payments") else {
            panic!("expected redirect");
        };
        assert_eq!(r.to, "/403");
        assert_eq!(r.from, None);
    }

    #[test]
    fn missing_role_with_requirement_is_unauthorized() {
        let session = Session::authenticated("t", None, false);
        let access = check_access(&session, &GuardOptions::requiring(Role::User), "/");
        assert!(matches!(access, Access::Redirect(r) if r.to == DEFAULT_UNAUTHORIZED_PATH));
    }

    #[test]
    fn token_without_requirement_is_granted() {
        let session = Session::authenticated("t", None, false);
        assert!(check_access(&session, &GuardOptions::default(), "/").is_granted());
    }

    #[test]
    fn matching_role_is_granted() {
        let guard = AccessGuard::new(GuardOptions::requiring(Role::Admin));
        assert_eq!(guard.check(&admin(), "/tickets"), Access::Granted);
    }

    #[test]
    fn explanation_reports_role_mismatch() {
        let session = Session::authenticated("t", Some(Role::User), false);
        let exp = explain_access(&session, &GuardOptions::requiring(Role::Admin), "/payments");

        assert!(!exp.granted);
        assert_eq!(exp.denial, Some(DenialKind::RoleMismatch));
        assert_eq!(exp.redirect_to.as_deref(), Some("/unauthorized"));
        assert!(exp.reason.contains("'admin'"));

        let json = serde_json::to_value(&exp).unwrap();
        assert_eq!(json["denial"], "role_mismatch");
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn role() -> impl Strategy<Value = Option<Role>> {
            prop_oneof![
                Just(None),
                Just(Some(Role::User)),
                Just(Some(Role::Admin)),
                Just(Some(Role::Employee)),
            ]
        }

        proptest! {
            /// Property: access is granted iff a token is present and the role requirement (if any) matches.
            #[test]
            fn granted_iff_token_and_role_match(
                token in proptest::option::of("[a-z0-9]{0,8}"),
                session_role in role(),
                required in role(),
            ) {
                let session = Session { token: token.clone(), role: session_role, remember: false };
                let options = GuardOptions { required_role: required, ..GuardOptions::default() };

                let has_token = token.as_deref().is_some_and(|t| !t.is_empty());
                let expected = has_token && required.is_none_or(|r| session_role == Some(r));
                prop_assert_eq!(check_access(&session, &options, "/x").is_granted(), expected);
            }
        }
    }
}

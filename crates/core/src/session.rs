use serde::{Deserialize, Serialize};

use crate::Role;

/// Who is logged in, as seen by the client.
///
/// `remember` is true iff the credential came from (or was written to) the
/// durable storage tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: Option<String>,
    pub role: Option<Role>,
    pub remember: bool,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(token: impl Into<String>, role: Option<Role>, remember: bool) -> Self {
        Self {
            token: Some(token.into()),
            role,
            remember,
        }
    }

    /// A session holds a credential when its token is present and non-empty.
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_session_is_empty() {
        let s = Session::anonymous();
        assert_eq!(s.token, None);
        assert_eq!(s.role, None);
        assert!(!s.remember);
        assert!(!s.is_authenticated());
    }

    #[test]
    fn empty_token_is_not_authenticated() {
        let s = Session::authenticated("", Some(Role::Admin), false);
        assert!(!s.is_authenticated());
    }
}

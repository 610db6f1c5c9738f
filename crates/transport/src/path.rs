//! Request path resolution and the public endpoint allowlist.

use std::borrow::Cow;

use url::Url;

/// Endpoints that may legitimately answer 401 without meaning "session expired"
/// (a failed login is "invalid credentials").
pub const PUBLIC_PATH_PREFIXES: &[&str] = &[
    "/api/auth/login",
    "/api/auth/register",
    "/api/auth/forgot-password",
    "/api/auth/reset-password",
];

/// `http://` or `https://`, case-insensitive.
pub fn is_absolute_url(url: &str) -> bool {
    let has_prefix = |prefix: &str| {
        url.get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    };
    has_prefix("http://") || has_prefix("https://")
}

fn strip_query(url: &str) -> String {
    match url.split_once('?') {
        Some((path, _)) => path.to_string(),
        None => url.to_string(),
    }
}

/// Path component a request targets.
///
/// 1. missing url → `""`
/// 2. absolute url → its path
/// 3. base url present → path of `url` resolved against the base
/// 4. otherwise `url` is taken as a path, cut at the first `?`
///
/// Any URL parse failure falls back to (4).
pub fn resolve_request_path(url: Option<&str>, base_url: Option<&str>) -> String {
    let url = url.unwrap_or("");

    let parsed = if is_absolute_url(url) {
        Url::parse(url)
    } else if let Some(base) = base_url.filter(|b| !b.is_empty()) {
        Url::parse(base).and_then(|base| base.join(url))
    } else {
        return strip_query(url);
    };

    match parsed {
        Ok(resolved) => resolved.path().to_string(),
        Err(err) => {
            tracing::trace!(url, %err, "url parse failed; using raw path");
            strip_query(url)
        }
    }
}

/// Ordered list of public path prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicPaths {
    prefixes: Vec<Cow<'static, str>>,
}

impl Default for PublicPaths {
    fn default() -> Self {
        Self {
            prefixes: PUBLIC_PATH_PREFIXES.iter().copied().map(Cow::Borrowed).collect(),
        }
    }
}

impl PublicPaths {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with(mut self, prefix: impl Into<Cow<'static, str>>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.prefixes.iter().map(|p| p.as_ref())
    }

    /// Prefix match, not equality.
    pub fn is_public(&self, path: &str) -> bool {
        self.prefixes.iter().any(|prefix| path.starts_with(prefix.as_ref()))
    }
}

//! Navigation primitive consumed from the routing layer.
//!
//! The core never renders anything; it only asks the routing collaborator to
//! move somewhere else.

use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

/// "Redirect to path X, optionally replacing history, optionally carrying origin state."
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redirect {
    pub to: String,
    pub replace: bool,
    /// Location the user was on when the redirect was issued (used to return post-login).
    pub from: Option<String>,
}

impl Redirect {
    pub fn to(path: impl Into<String>) -> Self {
        Self {
            to: path.into(),
            replace: false,
            from: None,
        }
    }

    pub fn replacing(mut self) -> Self {
        self.replace = true;
        self
    }

    pub fn from_location(mut self, origin: impl Into<String>) -> Self {
        self.from = Some(origin.into());
        self
    }
}

/// Routing collaborator.
pub trait Navigator: Send + Sync {
    /// Path of the current location (no query string).
    fn current_path(&self) -> String;

    fn navigate(&self, redirect: Redirect);
}

#[derive(Debug)]
struct NavState {
    location: String,
    history: Vec<String>,
    redirects: Vec<Redirect>,
}

/// In-memory history navigator.
///
/// Used by the console and by tests; it keeps the full list of redirects it
/// was asked to perform so callers can inspect them.
#[derive(Debug)]
pub struct MemoryNavigator {
    state: Mutex<NavState>,
}

impl MemoryNavigator {
    pub fn new(location: impl Into<String>) -> Self {
        let location = location.into();
        Self {
            state: Mutex::new(NavState {
                history: vec![location.clone()],
                location,
                redirects: Vec::new(),
            }),
        }
    }

    /// Plain user navigation (push), not a redirect.
    pub fn visit(&self, path: impl Into<String>) {
        let path = path.into();
        let mut state = self.lock();
        state.history.push(path.clone());
        state.location = path;
    }

    pub fn history(&self) -> Vec<String> {
        self.lock().history.clone()
    }

    pub fn redirects(&self) -> Vec<Redirect> {
        self.lock().redirects.clone()
    }

    pub fn last_redirect(&self) -> Option<Redirect> {
        self.lock().redirects.last().cloned()
    }

    fn lock(&self) -> MutexGuard<'_, NavState> {
        // A panicked writer cannot leave the location half-updated.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MemoryNavigator {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for MemoryNavigator {
    fn current_path(&self) -> String {
        let location = self.lock().location.clone();
        match location.split_once('?') {
            Some((path, _)) => path.to_string(),
            None => location,
        }
    }

    fn navigate(&self, redirect: Redirect) {
        tracing::debug!(to = %redirect.to, replace = redirect.replace, "navigating");
        let mut state = self.lock();
        if redirect.replace {
            if let Some(last) = state.history.last_mut() {
                *last = redirect.to.clone();
            } else {
                state.history.push(redirect.to.clone());
            }
        } else {
            state.history.push(redirect.to.clone());
        }
        state.location = redirect.to.clone();
        state.redirects.push(redirect);
    }
}

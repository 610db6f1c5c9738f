//! Session state with dual persistence.

use std::sync::{Mutex, MutexGuard};

use backoffice_core::{Role, Session};
use tokio::sync::watch;

use crate::storage::StorageTier;

/// Storage key holding the bearer credential.
pub const TOKEN_KEY: &str = "token";
/// Storage key holding the role name.
pub const ROLE_KEY: &str = "role";

/// Process-wide session state, mirrored into exactly one storage tier.
///
/// - `set_credential` writes one tier and scrubs the other
/// - `clear` scrubs both tiers unconditionally
/// - storage failures degrade to in-memory state (logged, never propagated)
pub struct SessionStore {
    ephemeral: Box<dyn StorageTier>,
    durable: Box<dyn StorageTier>,
    state: Mutex<Session>,
    token_tx: watch::Sender<Option<String>>,
    role_tx: watch::Sender<Option<Role>>,
}

impl SessionStore {
    /// Build the store and hydrate it from the tiers (runs once per store).
    ///
    /// Token and role are each looked up in the ephemeral tier first and the
    /// durable tier second; `remember` is set iff the token came from the
    /// durable tier.
    pub fn hydrate<E, D>(ephemeral: E, durable: D) -> Self
    where
        E: StorageTier + 'static,
        D: StorageTier + 'static,
    {
        let ephemeral: Box<dyn StorageTier> = Box::new(ephemeral);
        let durable: Box<dyn StorageTier> = Box::new(durable);

        let (token, remember) = match read_tier(ephemeral.as_ref(), TOKEN_KEY, "ephemeral") {
            Some(token) => (Some(token), false),
            None => match read_tier(durable.as_ref(), TOKEN_KEY, "durable") {
                Some(token) => (Some(token), true),
                None => (None, false),
            },
        };

        let role = read_tier(ephemeral.as_ref(), ROLE_KEY, "ephemeral")
            .or_else(|| read_tier(durable.as_ref(), ROLE_KEY, "durable"))
            .and_then(|raw| match raw.parse::<Role>() {
                Ok(role) => Some(role),
                Err(err) => {
                    tracing::warn!(%err, "ignoring stored role");
                    None
                }
            });

        let session = match token {
            Some(token) => Session::authenticated(token, role, remember),
            None => Session::anonymous(),
        };

        tracing::debug!(
            authenticated = session.is_authenticated(),
            remember = session.remember,
            "session hydrated"
        );

        let (token_tx, _) = watch::channel(session.token.clone());
        let (role_tx, _) = watch::channel(session.role);

        Self {
            ephemeral,
            durable,
            state: Mutex::new(session),
            token_tx,
            role_tx,
        }
    }

    /// Record a fresh credential (explicit login).
    pub fn set_credential(&self, token: impl Into<String>, remember: bool, role: Role) {
        let token = token.into();

        let (target, target_name, stale, stale_name) = if remember {
            (self.durable.as_ref(), "durable", self.ephemeral.as_ref(), "ephemeral")
        } else {
            (self.ephemeral.as_ref(), "ephemeral", self.durable.as_ref(), "durable")
        };

        write_tier(target, TOKEN_KEY, &token, target_name);
        write_tier(target, ROLE_KEY, role.as_str(), target_name);
        remove_tier(stale, TOKEN_KEY, stale_name);
        remove_tier(stale, ROLE_KEY, stale_name);

        self.replace(Session::authenticated(token, Some(role), remember));
        tracing::info!(%role, remember, "credential stored");
    }

    /// Forget the credential everywhere (explicit logout or forced invalidation).
    ///
    /// Idempotent.
    pub fn clear(&self) {
        for (tier, name) in [
            (self.ephemeral.as_ref(), "ephemeral"),
            (self.durable.as_ref(), "durable"),
        ] {
            remove_tier(tier, TOKEN_KEY, name);
            remove_tier(tier, ROLE_KEY, name);
        }

        self.replace(Session::anonymous());
        tracing::info!("session cleared");
    }

    pub fn snapshot(&self) -> Session {
        self.lock().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.lock().token.clone()
    }

    pub fn role(&self) -> Option<Role> {
        self.lock().role
    }

    pub fn remember(&self) -> bool {
        self.lock().remember
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().is_authenticated()
    }

    /// Token projection; receivers wake only when the token itself changes.
    pub fn watch_token(&self) -> watch::Receiver<Option<String>> {
        self.token_tx.subscribe()
    }

    /// Role projection; receivers wake only when the role itself changes.
    pub fn watch_role(&self) -> watch::Receiver<Option<Role>> {
        self.role_tx.subscribe()
    }

    fn replace(&self, next: Session) {
        {
            let mut state = self.lock();
            *state = next.clone();
        }

        self.token_tx.send_if_modified(|current| {
            if *current == next.token {
                return false;
            }
            *current = next.token.clone();
            true
        });
        self.role_tx.send_if_modified(|current| {
            if *current == next.role {
                return false;
            }
            *current = next.role;
            true
        });
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl core::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let session = self.snapshot();
        f.debug_struct("SessionStore")
            .field("authenticated", &session.is_authenticated())
            .field("role", &session.role)
            .field("remember", &session.remember)
            .finish_non_exhaustive()
    }
}

fn read_tier(tier: &dyn StorageTier, key: &str, tier_name: &str) -> Option<String> {
    match tier.get(key) {
        Ok(value) => value.filter(|v| !v.is_empty()),
        Err(err) => {
            tracing::warn!(tier = tier_name, key, %err, "storage read failed; treating as empty");
            None
        }
    }
}

fn write_tier(tier: &dyn StorageTier, key: &str, value: &str, tier_name: &str) {
    if let Err(err) = tier.set(key, value) {
        tracing::warn!(tier = tier_name, key, %err, "storage write failed; keeping in-memory state only");
    }
}

fn remove_tier(tier: &dyn StorageTier, key: &str, tier_name: &str) {
    if let Err(err) = tier.remove(key) {
        tracing::warn!(tier = tier_name, key, %err, "storage remove failed");
    }
}

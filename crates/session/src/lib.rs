//! `backoffice-session`: single source of truth for "who is logged in".
//!
//! The session is mirrored into one of two key-value storage tiers:
//! an ephemeral tier (lives as long as the client process/browser session)
//! and a durable tier (survives restarts). Only [`SessionStore`] writes them.

pub mod storage;
pub mod store;

pub use storage::{FileStorage, MemoryStorage, StorageError, StorageTier};
pub use store::{ROLE_KEY, SessionStore, TOKEN_KEY};

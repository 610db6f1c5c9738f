//! `backoffice-auth`: route access decisions (pure).
//!
//! This crate is intentionally decoupled from storage and transport: it sees a
//! [`backoffice_core::Session`] snapshot and answers "render or redirect".

pub mod guard;

pub use guard::{
    Access, AccessExplanation, AccessGuard, DenialKind, GuardOptions, check_access,
    explain_access, DEFAULT_LOGIN_PATH, DEFAULT_UNAUTHORIZED_PATH,
};

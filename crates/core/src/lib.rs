//! `backoffice-core`: shared client-side building blocks.
//!
//! This crate contains **pure data** primitives (no storage, no transport).

pub mod error;
pub mod field_errors;
pub mod navigation;
pub mod role;
pub mod session;

pub use error::{CoreError, CoreResult};
pub use field_errors::FieldErrors;
pub use navigation::{MemoryNavigator, Navigator, Redirect};
pub use role::Role;
pub use session::Session;

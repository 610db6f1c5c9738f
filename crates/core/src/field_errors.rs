//! Server-reported validation failures, keyed by field name.

use std::collections::BTreeMap;

/// Mapping from filter/form field name to its validation messages.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

use serde::Serialize;

use backoffice_core::FieldErrors;

/// Normalised state of one resource list.
///
/// At most one of `error` and `field_errors` is set; `loading` is true only
/// while a fetch is in flight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub loading: bool,
    pub error: Option<String>,
    pub field_errors: Option<FieldErrors>,
}

impl<T> Default for QueryResult<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            loading: false,
            error: None,
            field_errors: None,
        }
    }
}

impl<T> QueryResult<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

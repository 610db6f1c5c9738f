use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::filters::FilterSet;

/// A list endpoint and its item/filter types.
pub trait Resource: Send + Sync + 'static {
    type Item: DeserializeOwned + Clone + core::fmt::Debug + Send + Sync + 'static;
    type Filters: FilterSet;

    /// Short name used in logs.
    const NAME: &'static str;
    /// List endpoint, relative to the API base.
    const PATH: &'static str;
}

/// List envelope: `{ "data": [...], "total": n }`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListPage<T> {
    #[serde(rename = "data", alias = "items")]
    pub items: Vec<T>,
    #[serde(default)]
    total: Option<u64>,
}

impl<T> ListPage<T> {
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self {
            items,
            total: Some(total),
        }
    }

    /// Reported total; falls back to the number of items on this page.
    pub fn total(&self) -> u64 {
        self.total.unwrap_or(self.items.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_total_falls_back_to_item_count() {
        let page: ListPage<u8> = serde_json::from_value(serde_json::json!({ "items": [1, 2, 3] })).unwrap();
        assert_eq!(page.total(), 3);

        let page: ListPage<u8> = serde_json::from_value(serde_json::json!({ "data": [1], "total": 40 })).unwrap();
        assert_eq!(page.total(), 40);
    }
}

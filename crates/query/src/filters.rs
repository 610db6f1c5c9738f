//! Filter values and request-parameter building.

use serde::Serialize;

pub const PAGE: &str = "page";
pub const PER_PAGE: &str = "per_page";

/// One scalar filter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Free text or an enumerated value; empty means "no filter".
    Text(String),
    /// Optional integer; `None` means "no filter".
    Number(Option<i64>),
}

impl FilterValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Text(s) => s.is_empty(),
            FilterValue::Number(n) => n.is_none(),
        }
    }

    /// Query-string form, `None` when the value is empty.
    pub fn to_param(&self) -> Option<String> {
        match self {
            FilterValue::Text(s) if !s.is_empty() => Some(s.clone()),
            FilterValue::Number(Some(n)) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// The filter object of one list resource.
///
/// Implementations are plain structs; this trait exposes them as an ordered
/// field list and lets single fields be reset by name.
pub trait FilterSet: Clone + PartialEq + core::fmt::Debug + Send + Sync + 'static {
    /// Fields in declaration order.
    fn fields(&self) -> Vec<(&'static str, FilterValue)>;

    /// Reset `field` to its declared default. Returns `false` for unknown fields.
    fn reset_field(&mut self, field: &str) -> bool;

    fn page(&self) -> u32;

    fn set_page(&mut self, page: u32);

    /// Stored value; may be invalid (< 1) until it is clamped for transmission.
    fn per_page(&self) -> i64;
}

/// Request parameters for `filters`.
///
/// Empty fields are dropped; everything else is copied verbatim except
/// `per_page`, which is sent as `max(1, per_page)`. `filters` is not modified.
pub fn build_query_params<F: FilterSet>(filters: &F) -> Vec<(String, String)> {
    filters
        .fields()
        .into_iter()
        .filter_map(|(name, value)| {
            let value = match value {
                FilterValue::Number(Some(n)) if name == PER_PAGE => FilterValue::Number(Some(n.max(1))),
                other => other,
            };
            value.to_param().map(|param| (name.to_string(), param))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::payments::PaymentFilters;

    fn param<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
        params.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    #[test]
    fn empty_values_are_omitted() {
        let params = build_query_params(&PaymentFilters::default());
        assert_eq!(param(&params, "status"), None);
        assert_eq!(param(&params, "user_id"), None);
        assert_eq!(param(&params, PAGE), Some("1"));
    }

    #[test]
    fn per_page_is_clamped_on_the_wire_only() {
        let filters = PaymentFilters {
            per_page: 0,
            ..PaymentFilters::default()
        };
        let params = build_query_params(&filters);

        assert_eq!(param(&params, PER_PAGE), Some("1"));
        assert_eq!(filters.per_page, 0);
    }

    #[test]
    fn params_follow_field_order() {
        let filters = PaymentFilters {
            status: "issued".into(),
            user_id: Some(7),
            ..PaymentFilters::default()
        };
        let names: Vec<String> = build_query_params(&filters).into_iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["status", "user_id", "page", "per_page"]);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: transmitted per_page is max(1, stored), stored value unchanged.
            #[test]
            fn transmitted_per_page_is_clamped(per_page in -1000i64..1000) {
                let filters = PaymentFilters { per_page, ..PaymentFilters::default() };
                let before = filters.clone();

                let params = build_query_params(&filters);
                let sent: i64 = param(&params, PER_PAGE).unwrap().parse().unwrap();

                prop_assert_eq!(sent, per_page.max(1));
                prop_assert_eq!(filters, before);
            }
        }
    }
}

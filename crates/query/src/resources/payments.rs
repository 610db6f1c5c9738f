use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::DEFAULT_PER_PAGE;
use crate::filters::{FilterSet, FilterValue};
use crate::resource::Resource;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(deserialize_with = "decimal")]
    pub amount: f64,
    pub status: String,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Amounts arrive either as JSON numbers or as decimal strings.
fn decimal<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Payment status is free text here: the server owns the set of valid values
/// and reports unknown ones as a field error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentFilters {
    pub status: String,
    pub method: String,
    pub user_id: Option<i64>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub page: u32,
    pub per_page: i64,
}

impl Default for PaymentFilters {
    fn default() -> Self {
        Self {
            status: String::new(),
            method: String::new(),
            user_id: None,
            date_from: None,
            date_to: None,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

fn date(value: Option<NaiveDate>) -> FilterValue {
    FilterValue::Text(value.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default())
}

impl FilterSet for PaymentFilters {
    fn fields(&self) -> Vec<(&'static str, FilterValue)> {
        vec![
            ("status", FilterValue::text(self.status.as_str())),
            ("method", FilterValue::text(self.method.as_str())),
            ("user_id", FilterValue::Number(self.user_id)),
            ("date_from", date(self.date_from)),
            ("date_to", date(self.date_to)),
            ("page", FilterValue::Number(Some(i64::from(self.page)))),
            ("per_page", FilterValue::Number(Some(self.per_page))),
        ]
    }

    fn reset_field(&mut self, field: &str) -> bool {
        let defaults = Self::default();
        match field {
            "status" => self.status = defaults.status,
            "method" => self.method = defaults.method,
            "user_id" => self.user_id = defaults.user_id,
            "date_from" => self.date_from = defaults.date_from,
            "date_to" => self.date_to = defaults.date_to,
            "page" => self.page = defaults.page,
            "per_page" => self.per_page = defaults.per_page,
            _ => return false,
        }
        true
    }

    fn page(&self) -> u32 {
        self.page
    }

    fn set_page(&mut self, page: u32) {
        self.page = page;
    }

    fn per_page(&self) -> i64 {
        self.per_page
    }
}

/// `GET /api/payments`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Payments;

impl Resource for Payments {
    type Item = Payment;
    type Filters = PaymentFilters;

    const NAME: &'static str = "payments";
    const PATH: &'static str = "/api/payments";
}

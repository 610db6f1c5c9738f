use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::DEFAULT_PER_PAGE;
use crate::filters::{FilterSet, FilterValue};
use crate::resource::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 4] = [
        TicketStatus::Open,
        TicketStatus::InProgress,
        TicketStatus::Resolved,
        TicketStatus::Closed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    Low,
    Medium,
    High,
}

impl TicketPriority {
    pub const ALL: [TicketPriority; 3] = [TicketPriority::Low, TicketPriority::Medium, TicketPriority::High];

    pub fn as_str(self) -> &'static str {
        match self {
            TicketPriority::Low => "low",
            TicketPriority::Medium => "medium",
            TicketPriority::High => "high",
        }
    }
}

impl FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TicketStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown ticket status: {s}"))
    }
}

impl FromStr for TicketPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TicketPriority::ALL
            .into_iter()
            .find(|priority| priority.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown ticket priority: {s}"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i64,
    pub subject: String,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketFilters {
    pub search: String,
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    pub user_id: Option<i64>,
    pub page: u32,
    pub per_page: i64,
}

impl Default for TicketFilters {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: None,
            priority: None,
            user_id: None,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl FilterSet for TicketFilters {
    fn fields(&self) -> Vec<(&'static str, FilterValue)> {
        vec![
            ("search", FilterValue::text(self.search.as_str())),
            ("status", FilterValue::text(self.status.map(TicketStatus::as_str).unwrap_or_default())),
            ("priority", FilterValue::text(self.priority.map(TicketPriority::as_str).unwrap_or_default())),
            ("user_id", FilterValue::Number(self.user_id)),
            ("page", FilterValue::Number(Some(i64::from(self.page)))),
            ("per_page", FilterValue::Number(Some(self.per_page))),
        ]
    }

    fn reset_field(&mut self, field: &str) -> bool {
        let defaults = Self::default();
        match field {
            "search" => self.search = defaults.search,
            "status" => self.status = defaults.status,
            "priority" => self.priority = defaults.priority,
            "user_id" => self.user_id = defaults.user_id,
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

/// `GET /api/tickets`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tickets;

impl Resource for Tickets {
    type Item = Ticket;
    type Filters = TicketFilters;

    const NAME: &'static str = "tickets";
    const PATH: &'static str = "/api/tickets";
}

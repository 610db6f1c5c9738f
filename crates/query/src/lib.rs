//! `backoffice-query`: paginated, filterable resource lists.
//!
//! A list page owns a filter value ([`FilterSet`]); a [`FilterReconciler`]
//! drives a [`ResourceQueryController`] whenever the filters change by value,
//! and folds server-side field validation failures back into the filters.

pub mod controller;
pub mod filters;
pub mod pagination;
pub mod reconciler;
pub mod resource;
pub mod resources;
pub mod result;

pub use controller::{FetchStatus, ResourceQueryController};
pub use filters::{FilterSet, FilterValue, PAGE, PER_PAGE, build_query_params};
pub use pagination::page_count;
pub use reconciler::{FilterReconciler, reconcile};
pub use resource::{ListPage, Resource};
pub use resources::{Payments, Tickets};
pub use result::QueryResult;

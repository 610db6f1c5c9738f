//! Page-level filter ownership and validation-driven correction.

use std::sync::Arc;

use backoffice_core::FieldErrors;
use backoffice_session::SessionStore;

use crate::controller::{FetchStatus, ResourceQueryController};
use crate::filters::FilterSet;
use crate::pagination::page_count;
use crate::resource::Resource;
use crate::result::QueryResult;

/// Reset every field named in `field_errors` to its default.
///
/// Fields not named are untouched; names that are not filters are ignored.
pub fn reconcile<F: FilterSet>(filters: &F, field_errors: &FieldErrors) -> F {
    let mut next = filters.clone();
    for field in field_errors.keys() {
        if !next.reset_field(field) {
            tracing::debug!(field = %field, "validation error names no filter field");
        }
    }
    next
}

/// Owns the filters of one list view and re-fetches when they change.
///
/// A cycle that ends in field errors is followed by one corrected cycle per
/// reconciliation that actually changes the filters.
pub struct FilterReconciler<R: Resource> {
    filters: R::Filters,
    controller: ResourceQueryController<R>,
    session: Arc<SessionStore>,
    corrections: FieldErrors,
}

impl<R: Resource> FilterReconciler<R> {
    pub fn new(controller: ResourceQueryController<R>, session: Arc<SessionStore>, filters: R::Filters) -> Self {
        Self {
            filters,
            controller,
            session,
            corrections: FieldErrors::new(),
        }
    }

    pub fn filters(&self) -> &R::Filters {
        &self.filters
    }

    pub fn controller(&self) -> &ResourceQueryController<R> {
        &self.controller
    }

    pub fn result(&self) -> QueryResult<R::Item> {
        self.controller.snapshot()
    }

    /// Field errors that caused the most recent automatic correction.
    pub fn corrections(&self) -> &FieldErrors {
        &self.corrections
    }

    pub fn page_count(&self) -> u64 {
        page_count(self.controller.snapshot().total, self.filters.per_page())
    }

    /// Fetch with the current filters.
    pub async fn load(&mut self) -> FetchStatus {
        self.corrections.clear();
        self.run().await
    }

    /// Replace the filters; fetches only if they differ by value.
    pub async fn set_filters(&mut self, next: R::Filters) -> Option<FetchStatus> {
        if next == self.filters {
            return None;
        }
        self.filters = next;
        Some(self.load().await)
    }

    pub async fn update_filters(&mut self, change: impl FnOnce(&mut R::Filters)) -> Option<FetchStatus> {
        let mut next = self.filters.clone();
        change(&mut next);
        self.set_filters(next).await
    }

    /// Move to `page`, clamped to 1.
    pub async fn set_page(&mut self, page: u32) -> Option<FetchStatus> {
        self.update_filters(|f| f.set_page(page.max(1))).await
    }

    async fn run(&mut self) -> FetchStatus {
        loop {
            let token = self.session.token();
            let status = self.controller.fetch(&self.filters, token.as_deref()).await;
            if status != FetchStatus::Invalid {
                return status;
            }

            let Some(errors) = self.controller.snapshot().field_errors else {
                return status;
            };
            let corrected = reconcile(&self.filters, &errors);
            if corrected == self.filters {
                tracing::warn!(
                    resource = R::NAME,
                    fields = ?errors.keys().collect::<Vec<_>>(),
                    "validation failed on fields that cannot be reset"
                );
                return status;
            }

            tracing::info!(
                resource = R::NAME,
                fields = ?errors.keys().collect::<Vec<_>>(),
                "resetting rejected filters"
            );
            self.filters = corrected;
            self.corrections = errors;
        }
    }
}

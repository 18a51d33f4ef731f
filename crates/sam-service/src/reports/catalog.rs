//! License browsing: filtered listings, category search and lookup.

use std::sync::Arc;

use sam_core::error::AppError;
use sam_core::result::AppResult;
use sam_core::types::{LicenseId, PageRequest, PageResponse};
use sam_database::store::LicenseStore;
use sam_entity::license::{LicenseFilter, LicenseSearch, LicenseWithInfo};

/// Lists licenses with their software catalog entries, in license id order.
#[derive(Clone)]
pub struct LicenseCatalogService {
    licenses: Arc<dyn LicenseStore>,
}

impl LicenseCatalogService {
    /// Creates a new catalog service.
    pub fn new(licenses: Arc<dyn LicenseStore>) -> Self {
        Self { licenses }
    }

    /// Licenses matching `filter`.
    pub async fn list(
        &self,
        filter: LicenseFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<LicenseWithInfo>> {
        self.licenses
            .list_licenses_with_info(&filter, page.normalized())
            .await
    }

    /// Licenses matching `filter` and the search criterion together.
    pub async fn search(
        &self,
        filter: LicenseFilter,
        search: LicenseSearch,
        page: PageRequest,
    ) -> AppResult<PageResponse<LicenseWithInfo>> {
        let page = page.normalized();
        match filter.narrowed(search) {
            Some(filter) => self.licenses.list_licenses_with_info(&filter, page).await,
            None => Ok(PageResponse::new(Vec::new(), page, 0)),
        }
    }

    /// One license with its catalog entry.
    pub async fn get(&self, id: LicenseId) -> AppResult<LicenseWithInfo> {
        self.licenses
            .find_license_with_info(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Software license with ID {id} not found")))
    }
}

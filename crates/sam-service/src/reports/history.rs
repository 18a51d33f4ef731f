//! Usage record listings.

use std::sync::Arc;

use sam_core::error::AppError;
use sam_core::result::AppResult;
use sam_core::types::{LicenseId, PageRequest, PageResponse};
use sam_database::store::LicenseStore;
use sam_entity::usage::UsageRecord;

use crate::context::RequestContext;

/// Lists usage records, most recent checkout first.
#[derive(Clone)]
pub struct UsageHistoryService {
    licenses: Arc<dyn LicenseStore>,
}

impl UsageHistoryService {
    /// Creates a new history service.
    pub fn new(licenses: Arc<dyn LicenseStore>) -> Self {
        Self { licenses }
    }

    /// The caller's own records, optionally only open ones.
    pub async fn my_records(
        &self,
        ctx: &RequestContext,
        active_only: bool,
        page: PageRequest,
    ) -> AppResult<PageResponse<UsageRecord>> {
        self.licenses
            .find_records_by_user(ctx.user_id, active_only, page.normalized())
            .await
    }

    /// Every record of one license. Admin only; the route guard enforces it.
    pub async fn license_history(
        &self,
        license_id: LicenseId,
        page: PageRequest,
    ) -> AppResult<PageResponse<UsageRecord>> {
        if self.licenses.find_license(license_id).await?.is_none() {
            return Err(AppError::not_found(format!("License {license_id} not found")));
        }
        self.licenses
            .find_records_by_license(license_id, page.normalized())
            .await
    }
}

#[cfg(test)]
mod tests {
    use sam_core::error::ErrorKind;

    use super::*;
    use crate::test_support::Fixture;

    #[tokio::test]
    async fn test_my_records_filters_and_orders() {
        let fx = Fixture::new().await;
        let alice = fx.user("E100", 3).await;
        fx.license(1, None).await;
        fx.license(2, None).await;

        fx.manager.apply(&alice, LicenseId::new(1), 5).await.unwrap();
        fx.manager.return_license(&alice, LicenseId::new(1)).await.unwrap();
        let latest = fx.manager.apply(&alice, LicenseId::new(2), 5).await.unwrap();

        let history = UsageHistoryService::new(Arc::new(fx.store.clone()));
        let all = history
            .my_records(&alice, false, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(all.total_items, 2);
        assert_eq!(all.items[0].record_id, latest.record_id);

        let active = history
            .my_records(&alice, true, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(active.total_items, 1);
        assert!(active.items[0].is_active());
    }

    #[tokio::test]
    async fn test_license_history_unknown_license() {
        let fx = Fixture::new().await;
        let history = UsageHistoryService::new(Arc::new(fx.store.clone()));
        let err = history
            .license_history(LicenseId::new(77), PageRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}

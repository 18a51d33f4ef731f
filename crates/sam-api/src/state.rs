//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sam_auth::jwt::{JwtDecoder, JwtEncoder};
use sam_auth::password::{PasswordHasher, PasswordValidator};
use sam_core::config::AppConfig;
use sam_database::store::{AccountStore, LicenseStore};
use sam_service::{
    AccountService, DashboardService, LicenseCatalogService, LicenseLifecycleManager,
    UsageHistoryService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// License store, kept for health checks
    pub license_store: Arc<dyn LicenseStore>,
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Apply / return / renew
    pub lifecycle: Arc<LicenseLifecycleManager>,
    /// Dashboard counters
    pub dashboard: Arc<DashboardService>,
    /// Usage record listings
    pub history: Arc<UsageHistoryService>,
    /// License listings and search
    pub catalog: Arc<LicenseCatalogService>,
    /// Login, profile, and account administration
    pub accounts: Arc<AccountService>,
}

impl AppState {
    /// Wire every service on top of the given stores.
    pub fn build(
        config: AppConfig,
        license_store: Arc<dyn LicenseStore>,
        account_store: Arc<dyn AccountStore>,
    ) -> Self {
        let jwt_encoder = Arc::new(JwtEncoder::new(&config.auth));
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
        let password_hasher = Arc::new(PasswordHasher::new());
        let password_validator = Arc::new(PasswordValidator::new(&config.auth));

        let lifecycle = Arc::new(LicenseLifecycleManager::new(
            Arc::clone(&license_store),
            config.lifecycle.clone(),
        ));
        let dashboard = Arc::new(DashboardService::new(
            Arc::clone(&license_store),
            Arc::clone(&account_store),
            &config.lifecycle,
        ));
        let history = Arc::new(UsageHistoryService::new(Arc::clone(&license_store)));
        let catalog = Arc::new(LicenseCatalogService::new(Arc::clone(&license_store)));
        let accounts = Arc::new(AccountService::new(
            account_store,
            password_hasher,
            password_validator,
            jwt_encoder,
        ));

        Self {
            config: Arc::new(config),
            license_store,
            jwt_decoder,
            lifecycle,
            dashboard,
            history,
            catalog,
            accounts,
        }
    }
}

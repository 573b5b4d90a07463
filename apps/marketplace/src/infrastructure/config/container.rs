//! Dependency Injection Container
//!
//! Manages creation and wiring of all application components.

use std::sync::Arc;

use crate::application::ports::{Clock, CredentialPort, Repositories, ShowcaseCache, SystemClock};
use crate::application::use_cases::{
    BackOfficeUseCase, CartUseCase, ItemsUseCase, PaymentUseCase, ProfileUseCase,
    SalesStatisticsUseCase, SessionUseCase, ShopsUseCase, ShowcaseUseCase,
};
use crate::config::{Config, PageSizes};
use crate::infrastructure::auth::Argon2Credentials;
use crate::infrastructure::cache::TtlShowcaseCache;
use crate::infrastructure::http::AppState;

/// Dependency injection container.
///
/// Holds the store and the shared ports. Every use case is built from the
/// same store, clock and showcase cache so catalog writes invalidate the
/// listings the showcase reads.
pub struct Container<R>
where
    R: Repositories,
{
    repo: Arc<R>,
    credentials: Arc<dyn CredentialPort>,
    clock: Arc<dyn Clock>,
    showcase_cache: Arc<dyn ShowcaseCache>,
    page_sizes: PageSizes,
    token_ttl_secs: u64,
}

impl<R> Container<R>
where
    R: Repositories,
{
    /// Wire production adapters around `repo`.
    pub fn new(repo: Arc<R>, config: &Config) -> Self {
        Self {
            repo,
            credentials: Arc::new(Argon2Credentials::new()),
            clock: Arc::new(SystemClock),
            showcase_cache: Arc::new(TtlShowcaseCache::new(
                config.catalog.showcase_cache_ttl_secs,
            )),
            page_sizes: config.catalog.page_sizes,
            token_ttl_secs: config.auth.token_ttl_secs,
        }
    }

    /// Replace the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the credential adapter.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialPort>) -> Self {
        self.credentials = credentials;
        self
    }

    /// Get the store.
    pub fn repo(&self) -> Arc<R> {
        Arc::clone(&self.repo)
    }

    /// Get the clock.
    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    /// Create a `SessionUseCase`.
    pub fn session_use_case(&self) -> SessionUseCase<R> {
        SessionUseCase::new(
            self.repo(),
            Arc::clone(&self.credentials),
            self.clock(),
            self.token_ttl_secs,
        )
    }

    /// Create a `ProfileUseCase`.
    pub fn profile_use_case(&self) -> ProfileUseCase<R> {
        ProfileUseCase::new(self.repo())
    }

    /// Create a `ShopsUseCase`.
    pub fn shops_use_case(&self) -> ShopsUseCase<R> {
        ShopsUseCase::new(self.repo(), self.page_sizes)
    }

    /// Create an `ItemsUseCase`.
    pub fn items_use_case(&self) -> ItemsUseCase<R> {
        ItemsUseCase::new(
            self.repo(),
            Arc::clone(&self.showcase_cache),
            self.page_sizes,
        )
    }

    /// Create a `ShowcaseUseCase`.
    pub fn showcase_use_case(&self) -> ShowcaseUseCase<R> {
        ShowcaseUseCase::new(
            self.repo(),
            Arc::clone(&self.showcase_cache),
            self.page_sizes,
        )
    }

    /// Create a `CartUseCase`.
    pub fn cart_use_case(&self) -> CartUseCase<R> {
        CartUseCase::new(self.repo(), self.clock())
    }

    /// Create a `PaymentUseCase`.
    pub fn payment_use_case(&self) -> PaymentUseCase<R> {
        PaymentUseCase::new(self.repo(), self.clock(), self.page_sizes)
    }

    /// Create a `SalesStatisticsUseCase`.
    pub fn statistics_use_case(&self) -> SalesStatisticsUseCase<R> {
        SalesStatisticsUseCase::new(self.repo())
    }

    /// Create a `BackOfficeUseCase`.
    pub fn back_office_use_case(&self) -> BackOfficeUseCase<R> {
        BackOfficeUseCase::new(self.repo(), self.page_sizes)
    }

    /// Build the HTTP state with every use case.
    pub fn app_state(&self, version: impl Into<String>) -> AppState<R> {
        AppState {
            session: Arc::new(self.session_use_case()),
            profile: Arc::new(self.profile_use_case()),
            shops: Arc::new(self.shops_use_case()),
            items: Arc::new(self.items_use_case()),
            showcase: Arc::new(self.showcase_use_case()),
            cart: Arc::new(self.cart_use_case()),
            payment: Arc::new(self.payment_use_case()),
            statistics: Arc::new(self.statistics_use_case()),
            back_office: Arc::new(self.back_office_use_case()),
            version: version.into(),
        }
    }
}

//! Shared fixture for use case tests: every use case over one in-memory store.

use std::str::FromStr;
use std::sync::Arc;

use crate::application::ports::{Clock, FixedClock};
use crate::config::PageSizes;
use crate::domain::accounts::{Account, AccountRepository, NewUser};
use crate::domain::catalog::{CatalogRepository, Item, ItemDraft, Shop, ShopDraft};
use crate::domain::shared::{Money, ShopId, Timestamp};
use crate::infrastructure::auth::Argon2Credentials;
use crate::infrastructure::cache::TtlShowcaseCache;
use crate::infrastructure::persistence::SqliteStore;

use super::{
    BackOfficeUseCase, CartUseCase, ItemsUseCase, PaymentUseCase, ProfileUseCase,
    SalesStatisticsUseCase, SessionUseCase, ShopsUseCase, ShowcaseUseCase,
};

pub(crate) struct Fixture {
    pub store: Arc<SqliteStore>,
    pub clock: Arc<FixedClock>,
    pub cache: Arc<TtlShowcaseCache>,
    pub sessions: SessionUseCase<SqliteStore>,
    pub profiles: ProfileUseCase<SqliteStore>,
    pub shops: ShopsUseCase<SqliteStore>,
    pub items: ItemsUseCase<SqliteStore>,
    pub showcase: ShowcaseUseCase<SqliteStore>,
    pub carts: CartUseCase<SqliteStore>,
    pub payments: PaymentUseCase<SqliteStore>,
    pub statistics: SalesStatisticsUseCase<SqliteStore>,
    pub back_office: BackOfficeUseCase<SqliteStore>,
}

impl Fixture {
    pub const TOKEN_TTL_SECS: i64 = 3600;

    pub async fn new() -> Self {
        let store = Arc::new(SqliteStore::in_memory().await.unwrap());
        let start = Timestamp::parse("2026-03-01T09:00:00Z").unwrap();
        let clock = Arc::new(FixedClock::new(start));
        let cache = Arc::new(TtlShowcaseCache::new(3600));
        let credentials = Arc::new(Argon2Credentials::with_cost(8, 1));
        let sizes = PageSizes::default();

        Self {
            sessions: SessionUseCase::new(
                Arc::clone(&store),
                credentials,
                clock.clone(),
                Self::TOKEN_TTL_SECS.unsigned_abs(),
            ),
            profiles: ProfileUseCase::new(Arc::clone(&store)),
            shops: ShopsUseCase::new(Arc::clone(&store), sizes),
            items: ItemsUseCase::new(Arc::clone(&store), cache.clone(), sizes),
            showcase: ShowcaseUseCase::new(Arc::clone(&store), cache.clone(), sizes),
            carts: CartUseCase::new(Arc::clone(&store), clock.clone()),
            payments: PaymentUseCase::new(Arc::clone(&store), clock.clone(), sizes),
            statistics: SalesStatisticsUseCase::new(Arc::clone(&store)),
            back_office: BackOfficeUseCase::new(Arc::clone(&store), sizes),
            store,
            clock,
            cache,
        }
    }

    async fn account(&self, username: &str, is_seller: bool, is_staff: bool) -> Account {
        self.store
            .create_account(NewUser {
                username: username.to_string(),
                password_hash: "unused".to_string(),
                first_name: String::new(),
                last_name: String::new(),
                is_staff,
                is_seller,
                registered_at: self.clock.now(),
            })
            .await
            .unwrap()
    }

    pub async fn buyer(&self, username: &str) -> Account {
        self.account(username, false, false).await
    }

    pub async fn seller(&self, username: &str) -> Account {
        self.account(username, true, false).await
    }

    pub async fn staff(&self, username: &str) -> Account {
        self.account(username, false, true).await
    }

    pub async fn reload(&self, account: &Account) -> Account {
        self.store.find_account(account.id()).await.unwrap().unwrap()
    }

    pub async fn fund(&self, account: &Account, amount: &str) {
        self.profiles
            .replenish_funds(account, Money::from_str(amount).unwrap())
            .await
            .unwrap();
    }

    pub async fn shop(&self, seller: &Account, name: &str) -> Shop {
        self.shops
            .create(
                seller,
                ShopDraft {
                    name: name.to_string(),
                    tags: String::new(),
                    logo: None,
                },
            )
            .await
            .unwrap()
    }

    pub fn draft(code: i64, price: &str, amount: u32) -> ItemDraft {
        ItemDraft {
            code,
            name: format!("Item {code}"),
            description: String::new(),
            price: Money::from_str(price).unwrap(),
            amount,
            is_promotion: false,
            is_offer: false,
            files: Vec::new(),
        }
    }

    pub async fn item(&self, seller: &Account, shop: ShopId, code: i64, price: &str, amount: u32) -> Item {
        let detail = self
            .items
            .create(seller, shop, Self::draft(code, price, amount))
            .await
            .unwrap();
        self.store.find_item(detail.id).await.unwrap().unwrap()
    }
}

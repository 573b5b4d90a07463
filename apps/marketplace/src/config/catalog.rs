//! Listing page sizes and showcase caching.

use serde::{Deserialize, Serialize};

/// Catalog listing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Page sizes per listing.
    #[serde(default)]
    pub page_sizes: PageSizes,
    /// Showcase cache lifetime; 0 disables caching.
    #[serde(default = "default_showcase_cache_ttl")]
    pub showcase_cache_ttl_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_sizes: PageSizes::default(),
            showcase_cache_ttl_secs: default_showcase_cache_ttl(),
        }
    }
}

/// Rows per page for each paginated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSizes {
    /// Home page item list.
    #[serde(default = "ten")]
    pub home: u32,
    /// All shops.
    #[serde(default = "ten")]
    pub shops: u32,
    /// Owner view of a shop's items.
    #[serde(default = "ten")]
    pub shop_detail: u32,
    /// Shop showcase.
    #[serde(default = "five")]
    pub showcase: u32,
    /// Promotions.
    #[serde(default = "five")]
    pub promotions: u32,
    /// Special offers.
    #[serde(default = "ten")]
    pub offers: u32,
    /// Order history.
    #[serde(default = "ten")]
    pub orders: u32,
    /// Back office listings.
    #[serde(default = "hundred")]
    pub admin: u32,
}

impl Default for PageSizes {
    fn default() -> Self {
        Self {
            home: ten(),
            shops: ten(),
            shop_detail: ten(),
            showcase: five(),
            promotions: five(),
            offers: ten(),
            orders: ten(),
            admin: hundred(),
        }
    }
}

impl PageSizes {
    /// Every size, with its key, for validation.
    #[must_use]
    pub fn entries(&self) -> [(&'static str, u32); 8] {
        [
            ("home", self.home),
            ("shops", self.shops),
            ("shop_detail", self.shop_detail),
            ("showcase", self.showcase),
            ("promotions", self.promotions),
            ("offers", self.offers),
            ("orders", self.orders),
            ("admin", self.admin),
        ]
    }
}

const fn five() -> u32 {
    5
}

const fn ten() -> u32 {
    10
}

const fn hundred() -> u32 {
    100
}

const fn default_showcase_cache_ttl() -> u64 {
    60 * 60
}

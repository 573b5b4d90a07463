//! Catalog Bounded Context
//!
//! Shops owned by sellers, the items they list and the read models used by
//! the public listings (home page, showcases, item pages).

pub mod entities;
pub mod repository;
pub mod value_objects;

pub use entities::{
    HomeEntry, ImportSummary, Item, ItemDetail, ItemFile, Shop, ShowcaseEntry, ShowcaseKind,
    StockLine,
};
pub use repository::CatalogRepository;
pub use value_objects::{ItemDraft, ShopDraft, description_lines, validate_code};

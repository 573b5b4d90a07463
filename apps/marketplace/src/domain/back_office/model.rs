//! Table descriptors for the back office.

use serde::Serialize;

use crate::domain::shared::Page;

/// A display column: field name and its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Column {
    /// Field name.
    pub name: &'static str,
    /// Human-readable label.
    pub label: &'static str,
}

const fn col(name: &'static str, label: &'static str) -> Column {
    Column { name, label }
}

const SHOP_COLUMNS: &[Column] = &[
    col("name", "name"),
    col("seller", "seller"),
    col("tags", "tags"),
    col("logo", "logo"),
];
const ITEM_COLUMNS: &[Column] = &[
    col("code", "article code"),
    col("name", "item name"),
    col("price", "price"),
    col("amount", "amount"),
];
const FILE_COLUMNS: &[Column] = &[col("item", "item"), col("file", "file")];
const ORDER_COLUMNS: &[Column] = &[
    col("code", "order code"),
    col("created", "created"),
    col("status", "order status"),
    col("user", "buyer"),
];
const CART_COLUMNS: &[Column] = &[
    col("item", "item"),
    col("quantity", "quantity"),
    col("user", "buyer"),
];
const ORDERED_ITEM_COLUMNS: &[Column] = &[
    col("order", "order number"),
    col("item", "item"),
    col("quantity", "quantity"),
    col("user", "buyer"),
    col("total_cost", "total cost"),
];
const PROFILE_COLUMNS: &[Column] = &[
    col("user", "user"),
    col("registration_date", "registration date"),
    col("funds", "available funds"),
    col("is_seller", "seller"),
    col("avatar", "avatar"),
];

/// Tables exposed in the back office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminModel {
    /// Shops.
    Shops,
    /// Items.
    Items,
    /// Item images.
    Files,
    /// Orders.
    Orders,
    /// Cart lines.
    Carts,
    /// Ordered items.
    OrderedItems,
    /// User profiles.
    Profiles,
}

impl AdminModel {
    /// Every table, in menu order.
    pub const ALL: [Self; 7] = [
        Self::Shops,
        Self::Items,
        Self::Files,
        Self::Orders,
        Self::Carts,
        Self::OrderedItems,
        Self::Profiles,
    ];

    /// URL segment.
    #[must_use]
    pub const fn slug(&self) -> &'static str {
        match self {
            Self::Shops => "shops",
            Self::Items => "items",
            Self::Files => "files",
            Self::Orders => "orders",
            Self::Carts => "carts",
            Self::OrderedItems => "ordered-items",
            Self::Profiles => "profiles",
        }
    }

    /// Look up by URL segment.
    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|model| model.slug() == slug)
    }

    /// Singular verbose name.
    #[must_use]
    pub const fn verbose_name(&self) -> &'static str {
        match self {
            Self::Shops => "shop",
            Self::Items => "item",
            Self::Files => "file",
            Self::Orders => "order",
            Self::Carts => "cart",
            Self::OrderedItems => "ordered item",
            Self::Profiles => "profile",
        }
    }

    /// Plural verbose name.
    #[must_use]
    pub const fn verbose_name_plural(&self) -> &'static str {
        match self {
            Self::Shops => "shops",
            Self::Items => "items",
            Self::Files => "files",
            Self::Orders => "orders",
            Self::Carts => "cart",
            Self::OrderedItems => "ordered items",
            Self::Profiles => "profiles",
        }
    }

    /// Display columns, in order.
    #[must_use]
    pub const fn columns(&self) -> &'static [Column] {
        match self {
            Self::Shops => SHOP_COLUMNS,
            Self::Items => ITEM_COLUMNS,
            Self::Files => FILE_COLUMNS,
            Self::Orders => ORDER_COLUMNS,
            Self::Carts => CART_COLUMNS,
            Self::OrderedItems => ORDERED_ITEM_COLUMNS,
            Self::Profiles => PROFILE_COLUMNS,
        }
    }

    /// Columns editable from the listing.
    #[must_use]
    pub const fn editable(&self) -> &'static [&'static str] {
        match self {
            Self::Orders => &["status"],
            Self::Profiles => &["is_seller"],
            _ => &[],
        }
    }
}

/// One row: its key and one display cell per column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminRow {
    /// Row key used by edit endpoints.
    pub key: String,
    /// Cells aligned with [`AdminModel::columns`].
    pub cells: Vec<String>,
}

/// A listing page with its table metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminListing {
    /// URL segment.
    pub model: &'static str,
    /// Singular name.
    pub verbose_name: &'static str,
    /// Plural name.
    pub verbose_name_plural: &'static str,
    /// Column metadata.
    pub columns: &'static [Column],
    /// Editable columns.
    pub editable: &'static [&'static str],
    /// Rows.
    pub rows: Page<AdminRow>,
}

impl AdminListing {
    /// Attach metadata to a page of rows.
    #[must_use]
    pub fn new(model: AdminModel, rows: Page<AdminRow>) -> Self {
        Self {
            model: model.slug(),
            verbose_name: model.verbose_name(),
            verbose_name_plural: model.verbose_name_plural(),
            columns: model.columns(),
            editable: model.editable(),
            rows,
        }
    }
}

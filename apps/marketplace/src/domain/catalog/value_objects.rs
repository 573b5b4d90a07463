//! Validated catalog input.

use serde::Deserialize;

use crate::domain::shared::{DomainError, Money};

/// Longest shop name.
pub const SHOP_NAME_MAX_LEN: usize = 36;
/// Longest shop tag list.
pub const SHOP_TAGS_MAX_LEN: usize = 150;
/// Longest item name.
pub const ITEM_NAME_MAX_LEN: usize = 150;

/// Shop fields set on create and edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ShopDraft {
    /// Display name.
    pub name: String,
    /// Free-form tags.
    #[serde(default)]
    pub tags: String,
    /// Stored logo path.
    #[serde(default)]
    pub logo: Option<String>,
}

impl ShopDraft {
    /// Check field lengths.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidValue`] for the first invalid field.
    pub fn validate(&self) -> Result<(), DomainError> {
        require_text("name", &self.name, SHOP_NAME_MAX_LEN)?;
        bounded_text("tags", &self.tags, SHOP_TAGS_MAX_LEN)
    }
}

/// Item fields set on create, edit and CSV import.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ItemDraft {
    /// Marketplace-wide unique article code.
    pub code: i64,
    /// Display name.
    pub name: String,
    /// Long description; `\n` separates lines.
    #[serde(default)]
    pub description: String,
    /// Unit price.
    pub price: Money,
    /// Units in stock.
    #[serde(default)]
    pub amount: u32,
    /// Listed under promotions.
    #[serde(default)]
    pub is_promotion: bool,
    /// Listed under special offers.
    #[serde(default)]
    pub is_offer: bool,
    /// Stored image paths to attach.
    #[serde(default)]
    pub files: Vec<String>,
}

impl ItemDraft {
    /// Check code range, name length, price precision and file paths.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidValue`] for the first invalid field.
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_code(self.code)?;
        require_text("name", &self.name, ITEM_NAME_MAX_LEN)?;
        self.price.validate_price("price")?;
        if self.files.iter().any(|path| path.trim().is_empty()) {
            return Err(DomainError::invalid("files", "file paths must not be empty"));
        }
        Ok(())
    }
}

/// Article codes are non-negative 32-bit integers.
///
/// # Errors
///
/// Returns [`DomainError::InvalidValue`] on `code`.
pub fn validate_code(code: i64) -> Result<(), DomainError> {
    if (0..=i64::from(i32::MAX)).contains(&code) {
        Ok(())
    } else {
        Err(DomainError::invalid(
            "code",
            format!("must be between 0 and {}", i32::MAX),
        ))
    }
}

/// Split a description into display lines.
///
/// Both real newlines and the two-character escape `\n` (as written by
/// spreadsheet exports) separate lines.
#[must_use]
pub fn description_lines(description: &str) -> Vec<String> {
    description
        .split('\n')
        .flat_map(|line| line.split("\\n"))
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect()
}

fn require_text(field: &str, value: &str, max_len: usize) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::invalid(field, "this field is required"));
    }
    bounded_text(field, value, max_len)
}

fn bounded_text(field: &str, value: &str, max_len: usize) -> Result<(), DomainError> {
    if value.chars().count() > max_len {
        return Err(DomainError::invalid(
            field,
            format!("must have at most {max_len} characters"),
        ));
    }
    Ok(())
}

//! Account value objects: buyer status and validated form input.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::DomainError;

/// Longest username accepted at registration.
pub const USERNAME_MAX_LEN: usize = 150;
/// Longest username accepted by the login form.
pub const LOGIN_USERNAME_MAX_LEN: usize = 24;
/// Longest first or last name.
pub const NAME_MAX_LEN: usize = 24;
/// Shortest acceptable password.
pub const PASSWORD_MIN_LEN: usize = 8;

/// Loyalty tier derived from the number of purchased order lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuyerStatus {
    /// Fewer than 100 purchases.
    Beginner,
    /// Fewer than 500 purchases.
    Experienced,
    /// Fewer than 1000 purchases.
    Regular,
    /// Fewer than 5000 purchases.
    Devoted,
    /// 5000 purchases or more.
    Privileged,
}

impl BuyerStatus {
    /// Tier for a purchase count.
    #[must_use]
    pub const fn from_purchases(purchases: u32) -> Self {
        match purchases {
            0..100 => Self::Beginner,
            100..500 => Self::Experienced,
            500..1000 => Self::Regular,
            1000..5000 => Self::Devoted,
            _ => Self::Privileged,
        }
    }

    /// Lowercase label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Experienced => "experienced",
            Self::Regular => "regular",
            Self::Devoted => "devoted",
            Self::Privileged => "privileged",
        }
    }
}

impl fmt::Display for BuyerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw registration input.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationForm {
    /// Desired username.
    pub username: String,
    /// Password.
    pub password1: String,
    /// Password confirmation.
    pub password2: String,
    /// Optional first name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Optional last name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Register as a seller.
    #[serde(default)]
    pub is_seller: bool,
}

impl RegistrationForm {
    /// Check every field.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidValue`] for the first invalid field.
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_username(&self.username, USERNAME_MAX_LEN)?;
        if self.password1 != self.password2 {
            return Err(DomainError::invalid(
                "password2",
                "the two password fields didn't match",
            ));
        }
        if self.password1.chars().count() < PASSWORD_MIN_LEN {
            return Err(DomainError::invalid(
                "password1",
                format!("must contain at least {PASSWORD_MIN_LEN} characters"),
            ));
        }
        validate_name("first_name", self.first_name.as_deref())?;
        validate_name("last_name", self.last_name.as_deref())
    }
}

/// Profile fields a user may change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProfileUpdate {
    /// New first name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// New last name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// New avatar path.
    #[serde(default)]
    pub avatar: Option<String>,
}

impl ProfileUpdate {
    /// Check name lengths.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidValue`] for an overlong name.
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_name("first_name", self.first_name.as_deref())?;
        validate_name("last_name", self.last_name.as_deref())
    }
}

/// Username rules: non-empty, bounded, letters, digits and `@.+-_` only.
///
/// # Errors
///
/// Returns [`DomainError::InvalidValue`] on `username`.
pub fn validate_username(username: &str, max_len: usize) -> Result<(), DomainError> {
    let len = username.chars().count();
    if len == 0 {
        return Err(DomainError::invalid("username", "this field is required"));
    }
    if len > max_len {
        return Err(DomainError::invalid(
            "username",
            format!("must have at most {max_len} characters"),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(DomainError::invalid(
            "username",
            "may contain only letters, numbers and @/./+/-/_ characters",
        ));
    }
    Ok(())
}

fn validate_name(field: &str, value: Option<&str>) -> Result<(), DomainError> {
    match value {
        Some(name) if name.chars().count() > NAME_MAX_LEN => Err(DomainError::invalid(
            field,
            format!("must have at most {NAME_MAX_LEN} characters"),
        )),
        _ => Ok(()),
    }
}

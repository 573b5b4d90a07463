//! Users, their marketplace profiles and login sessions.

use serde::Serialize;

use super::value_objects::BuyerStatus;
use crate::domain::shared::{DomainError, Money, Timestamp, UserId, rules};

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Row ID.
    pub id: UserId,
    /// Unique login name.
    pub username: String,
    /// First name, possibly empty.
    pub first_name: String,
    /// Last name, possibly empty.
    pub last_name: String,
    /// Back office access.
    pub is_staff: bool,
}

/// Marketplace data attached 1:1 to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    /// Owning user.
    pub user_id: UserId,
    /// When the account was created.
    pub registration_date: Timestamp,
    /// May own shops and see stock levels.
    pub is_seller: bool,
    /// Stored avatar path.
    pub avatar: Option<String>,
    /// Spendable balance.
    pub funds: Money,
    /// Number of ordered-item rows ever paid for.
    pub purchases: u32,
}

/// Outcome of charging a profile for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Charge {
    /// Amount debited.
    pub debited: Money,
    /// Tier before the purchase.
    pub previous_status: BuyerStatus,
    /// Tier after the purchase.
    pub status: BuyerStatus,
}

impl Charge {
    /// Whether the purchase moved the buyer to a higher tier.
    #[must_use]
    pub fn upgraded(&self) -> bool {
        self.status != self.previous_status
    }
}

impl Profile {
    /// Current buyer tier.
    #[must_use]
    pub const fn buyer_status(&self) -> BuyerStatus {
        BuyerStatus::from_purchases(self.purchases)
    }

    /// Add a top-up to the balance.
    ///
    /// # Errors
    ///
    /// Rejects non-positive or over-precise amounts, and balances past decimal(10,2).
    pub fn top_up(&mut self, amount: Money) -> Result<Money, DomainError> {
        amount.validate_top_up("amount")?;
        self.funds = self.funds.checked_add(amount).ok_or_else(|| {
            DomainError::rule(
                rules::FUNDS_LIMIT,
                format!("balance may not exceed {}", Money::MAX),
            )
        })?;
        Ok(self.funds)
    }

    /// Debit an order total and count its ordered-item rows as purchases.
    ///
    /// # Errors
    ///
    /// Returns [`rules::INSUFFICIENT_FUNDS`] when the balance is below `total`;
    /// the profile is left unchanged.
    pub fn charge(&mut self, total: Money, lines: u32) -> Result<Charge, DomainError> {
        if self.funds < total {
            return Err(DomainError::rule(
                rules::INSUFFICIENT_FUNDS,
                format!("order total {total} exceeds available funds {}", self.funds),
            ));
        }
        let previous_status = self.buyer_status();
        self.funds = self.funds - total;
        self.purchases = self.purchases.saturating_add(lines);
        Ok(Charge {
            debited: total,
            previous_status,
            status: self.buyer_status(),
        })
    }
}

/// A user together with its profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    /// The user.
    pub user: User,
    /// The profile.
    pub profile: Profile,
}

impl Account {
    /// Shorthand for the user ID.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.user.id
    }

    /// Shorthand for the seller flag.
    #[must_use]
    pub const fn is_seller(&self) -> bool {
        self.profile.is_seller
    }

    /// Fail unless this account may act as a seller.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::PermissionDenied`].
    pub fn require_seller(&self, action: &str) -> Result<(), DomainError> {
        if self.is_seller() {
            Ok(())
        } else {
            Err(DomainError::denied(format!("{action} requires a seller account")))
        }
    }

    /// Fail unless this account has back office access.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::PermissionDenied`].
    pub fn require_staff(&self) -> Result<(), DomainError> {
        if self.user.is_staff {
            Ok(())
        } else {
            Err(DomainError::denied("back office requires a staff account"))
        }
    }
}

/// Data needed to insert a user and its profile.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Unique login name.
    pub username: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Back office access.
    pub is_staff: bool,
    /// Seller flag for the profile.
    pub is_seller: bool,
    /// Registration time.
    pub registered_at: Timestamp,
}

/// Stored login secret for a username.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// User the secret belongs to.
    pub user_id: UserId,
    /// Argon2 PHC string.
    pub password_hash: String,
}

/// A login session, keyed by the SHA-256 digest of its bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Hex SHA-256 of the token.
    pub token_hash: String,
    /// Authenticated user.
    pub user_id: UserId,
    /// Issue time.
    pub created_at: Timestamp,
    /// Expiry time.
    pub expires_at: Timestamp,
}

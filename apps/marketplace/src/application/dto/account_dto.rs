//! Account DTOs

use serde::{Deserialize, Serialize};

use crate::domain::accounts::{Account, BuyerStatus};
use crate::domain::shared::{Money, Timestamp, UserId};

/// A logged-in session handed to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDto {
    /// Bearer token.
    pub token: String,
    /// Authenticated user.
    pub user_id: UserId,
    /// Username.
    pub username: String,
    /// Token expiry.
    pub expires_at: Timestamp,
}

/// Profile page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileDto {
    /// User ID.
    pub user_id: UserId,
    /// Username.
    pub username: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Back office access.
    pub is_staff: bool,
    /// Account creation time.
    pub registration_date: Timestamp,
    /// Seller flag.
    pub is_seller: bool,
    /// Avatar path.
    pub avatar: Option<String>,
    /// Spendable balance.
    pub funds: Money,
    /// Paid ordered-item rows.
    pub purchases: u32,
    /// Tier derived from purchases.
    pub buyer_status: BuyerStatus,
}

impl ProfileDto {
    /// Create from a domain account.
    #[must_use]
    pub fn from_account(account: &Account) -> Self {
        Self {
            user_id: account.user.id,
            username: account.user.username.clone(),
            first_name: account.user.first_name.clone(),
            last_name: account.user.last_name.clone(),
            is_staff: account.user.is_staff,
            registration_date: account.profile.registration_date,
            is_seller: account.profile.is_seller,
            avatar: account.profile.avatar.clone(),
            funds: account.profile.funds,
            purchases: account.profile.purchases,
            buyer_status: account.profile.buyer_status(),
        }
    }
}

/// Balance after a top-up.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FundsDto {
    /// Amount added.
    pub added: Money,
    /// New balance.
    pub balance: Money,
}

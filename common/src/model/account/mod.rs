//! Account model and related types

use serde::{Deserialize, Serialize};

#[cfg(feature = "utoipa")]
use crate::utoipa::ToSchema;

/// Account identity as stored in the repository
pub type AccountId = i32;

/// Signed amount added to a balance: positive = deposit, negative = withdrawal
pub type Amount = i64;

/// Account model
///
/// The balance is a signed 64-bit integer and never goes negative as
/// observed through the balance service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
pub struct Account {
    /// Unique account ID
    pub id: i32,
    /// Current balance
    pub balance: i64,
}

impl Account {
    /// Create a new account with an opening balance
    pub fn new(id: AccountId, balance: Amount) -> Self {
        Self { id, balance }
    }
}

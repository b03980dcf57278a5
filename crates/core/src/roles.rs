//! Buyer roles

use std::fmt;

use serde::{Deserialize, Serialize};

/// The role a request acts under.
///
/// Pricing only distinguishes dealers from everyone else; order reads
/// additionally distinguish elevated (back-office) roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A visitor browsing without an account.
    Anonymous,

    /// A retail customer.
    Customer,

    /// A registered dealer buying at wholesale volume.
    Dealer,

    /// Back-office catalog staff.
    Merchandiser,

    /// Store administrator.
    Admin,
}

impl Role {
    /// Whether this role qualifies for dealer volume pricing.
    #[must_use]
    pub const fn is_dealer(self) -> bool {
        matches!(self, Role::Dealer)
    }

    /// Whether this role may read records owned by other users.
    #[must_use]
    pub const fn is_elevated(self) -> bool {
        matches!(self, Role::Admin | Role::Merchandiser)
    }

    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Anonymous => "anonymous",
            Role::Customer => "customer",
            Role::Dealer => "dealer",
            Role::Merchandiser => "merchandiser",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

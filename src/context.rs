//! Caller context
//!
//! The session layer resolves a caller to an [`Identity`] before any report
//! runs; nothing in this crate looks up session state on its own.

use thiserror::Error;

use crate::{buyers::BuyerKey, shops::ShopKey};

/// Errors raised when a caller lacks the role a report requires.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessError {
    /// The caller must hold the admin role.
    #[error("Admin access required")]
    AdminRequired,

    /// The caller must be signed in as a buyer.
    #[error("Sign-in required")]
    SignInRequired,

    /// The caller may only view records they own.
    #[error("Access denied")]
    Forbidden,
}

/// Role resolved by the session layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// A signed-in buyer.
    Buyer,

    /// A seller managing a shop.
    Seller,

    /// A platform administrator.
    Admin,
}

/// An already-resolved caller identity.
#[derive(Debug, Clone, Copy)]
pub struct Identity {
    buyer: Option<BuyerKey>,
    shop: Option<ShopKey>,
    role: Role,
}

impl Identity {
    /// Creates an identity with the given account keys and role.
    #[must_use]
    pub fn new(buyer: Option<BuyerKey>, shop: Option<ShopKey>, role: Role) -> Self {
        Self { buyer, shop, role }
    }

    /// An admin identity with no accounts attached.
    #[must_use]
    pub fn admin() -> Self {
        Self::new(None, None, Role::Admin)
    }

    /// A signed-in buyer identity.
    #[must_use]
    pub fn buyer(key: BuyerKey) -> Self {
        Self::new(Some(key), None, Role::Buyer)
    }

    /// A seller identity managing the given shop.
    #[must_use]
    pub fn seller(shop: ShopKey) -> Self {
        Self::new(None, Some(shop), Role::Seller)
    }

    /// The caller's role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// The caller's buyer account, if any.
    #[must_use]
    pub fn buyer_key(&self) -> Option<BuyerKey> {
        self.buyer
    }

    /// The shop the caller manages, if any.
    #[must_use]
    pub fn shop_key(&self) -> Option<ShopKey> {
        self.shop
    }

    /// Require the admin role.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::AdminRequired`] for non-admin callers.
    pub fn require_admin(&self) -> Result<(), AccessError> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(AccessError::AdminRequired)
        }
    }

    /// Require a signed-in buyer and return their key.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::SignInRequired`] if no buyer account is attached.
    pub fn require_signed_in(&self) -> Result<BuyerKey, AccessError> {
        self.buyer.ok_or(AccessError::SignInRequired)
    }

    /// Require that the caller can act for the given buyer account.
    ///
    /// Admins pass; everyone else must be signed in as that buyer.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::SignInRequired`] if no buyer account is
    /// attached, or [`AccessError::Forbidden`] if it is a different buyer.
    pub fn require_buyer(&self, buyer: BuyerKey) -> Result<(), AccessError> {
        if self.role == Role::Admin {
            return Ok(());
        }

        if self.require_signed_in()? == buyer {
            Ok(())
        } else {
            Err(AccessError::Forbidden)
        }
    }

    /// Require that the caller manages the given shop.
    ///
    /// Admins pass; everyone else must be the seller of that shop.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::Forbidden`] for any other caller.
    pub fn require_shop(&self, shop: ShopKey) -> Result<(), AccessError> {
        if self.role == Role::Admin || self.shop == Some(shop) {
            Ok(())
        } else {
            Err(AccessError::Forbidden)
        }
    }
}

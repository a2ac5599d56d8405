//! Buyers

use chrono::{DateTime, Utc};
use slotmap::new_key_type;

new_key_type! {
    /// Buyer Key
    pub struct BuyerKey;
}

/// A buyer account.
///
/// The signup timestamp feeds cohort retention analysis; nothing else about
/// the account matters to this layer.
#[derive(Debug, Clone)]
pub struct Buyer {
    /// Display name
    pub display_name: String,

    /// When the account was created
    pub signed_up_at: DateTime<Utc>,
}

impl Buyer {
    /// Creates a new buyer.
    pub fn new(display_name: impl Into<String>, signed_up_at: DateTime<Utc>) -> Self {
        Self {
            display_name: display_name.into(),
            signed_up_at,
        }
    }
}

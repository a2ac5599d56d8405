//! Evercraft
//!
//! Evercraft is the order economics engine of a sustainability-focused
//! marketplace: shipping quotes, eco-profile scoring, donation splitting at
//! checkout, and impact aggregation over the recorded ledger.

pub mod buyers;
pub mod cart;
pub mod checkout;
pub mod context;
pub mod donations;
pub mod eco;
pub mod fixtures;
pub mod impact;
pub mod nonprofits;
pub mod orders;
pub mod prelude;
pub mod rates;
pub mod shipping;
pub mod shops;
pub mod utils;

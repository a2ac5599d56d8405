//! Evercraft prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    buyers::{Buyer, BuyerKey},
    cart::{Cart, CartError, CartLineItem},
    checkout::{CheckoutError, CheckoutInput, PlacedOrder, place_order},
    context::{AccessError, Identity, Role},
    donations::{
        Donation, DonationStatus, DonorType,
        split::{BuyerDirectDonation, DonationSplit, SplitError, split_order_donations},
    },
    eco::{EcoProfile, EcoScore, EcoTier},
    fixtures::{Fixture, FixtureError},
    impact::{
        DonationSummary, ImpactScope, Ledger, NonprofitBreakdown, ReportError,
        cohort::{CohortRow, retention},
        forecast::{FORECAST_HORIZON, ProjectedMonth, project_revenue},
        monthly::{MonthlyBucket, TRAILING_MONTHS},
    },
    nonprofits::{Nonprofit, NonprofitKey},
    orders::{Order, OrderError, OrderId, OrderItem, OrderStatus},
    rates::{PlatformRates, RateError},
    shipping::{
        RateOption, ShippingConfig, ShippingError, ShippingMethod, ShippingQuote,
        calculate_cart_shipping,
    },
    shops::{Shop, ShopError, ShopKey},
};

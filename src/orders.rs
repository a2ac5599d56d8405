//! Orders
//!
//! Orders are created at checkout and only ever move forward through their
//! status lifecycle; they are never deleted, so the table doubles as an
//! audit trail. Monetary fields are frozen at creation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{buyers::BuyerKey, shops::ShopKey};

/// Order identifier assigned by the caller's persistence layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrderId(pub u64);

/// Errors related to order lifecycle transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    /// The requested status transition is not allowed.
    #[error("Cannot move order from {0:?} to {1:?}")]
    InvalidTransition(OrderStatus, OrderStatus),
}

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    /// Placed, payment not yet confirmed.
    Pending,

    /// Payment confirmed, being prepared.
    Processing,

    /// Handed to the carrier.
    Shipped,

    /// Received by the buyer.
    Delivered,

    /// Cancelled before shipping.
    Cancelled,
}

impl OrderStatus {
    /// Whether an order may move from this status to `next`.
    ///
    /// Forward-only: cancellation is allowed only before shipping, and
    /// nothing leaves a delivered or cancelled order.
    #[must_use]
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Processing | OrderStatus::Cancelled)
                | (OrderStatus::Processing, OrderStatus::Shipped | OrderStatus::Cancelled)
                | (OrderStatus::Shipped, OrderStatus::Delivered)
        )
    }
}

/// A purchased line on an order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem<'a> {
    price: Money<'a, Currency>,
    quantity: u32,
}

impl<'a> OrderItem<'a> {
    /// Creates an order item.
    #[must_use]
    pub fn new(price: Money<'a, Currency>, quantity: u32) -> Self {
        Self { price, quantity }
    }

    /// Unit price.
    pub fn price(&self) -> &Money<'a, Currency> {
        &self.price
    }

    /// Quantity purchased.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// A placed order.
#[derive(Debug, Clone)]
pub struct Order<'a> {
    id: OrderId,
    buyer: BuyerKey,
    shop: ShopKey,
    items: Vec<OrderItem<'a>>,
    subtotal: Money<'a, Currency>,
    shipping_cost: Money<'a, Currency>,
    total: Money<'a, Currency>,
    nonprofit_donation: Decimal,
    status: OrderStatus,
    created_at: DateTime<Utc>,
}

impl<'a> Order<'a> {
    /// Creates a pending order with frozen amounts.
    ///
    /// `nonprofit_donation` is the sum of the donation rows the order
    /// produced, kept on the order for audit convenience.
    #[expect(clippy::too_many_arguments, reason = "record constructor mirrors the row")]
    #[must_use]
    pub fn new(
        id: OrderId,
        buyer: BuyerKey,
        shop: ShopKey,
        items: Vec<OrderItem<'a>>,
        subtotal: Money<'a, Currency>,
        shipping_cost: Money<'a, Currency>,
        total: Money<'a, Currency>,
        nonprofit_donation: Decimal,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            buyer,
            shop,
            items,
            subtotal,
            shipping_cost,
            total,
            nonprofit_donation,
            status: OrderStatus::Pending,
            created_at,
        }
    }

    /// Order identifier.
    #[must_use]
    pub fn id(&self) -> OrderId {
        self.id
    }

    /// Purchasing buyer.
    #[must_use]
    pub fn buyer(&self) -> BuyerKey {
        self.buyer
    }

    /// Selling shop.
    #[must_use]
    pub fn shop(&self) -> ShopKey {
        self.shop
    }

    /// Purchased lines.
    #[must_use]
    pub fn items(&self) -> &[OrderItem<'a>] {
        &self.items
    }

    /// Item subtotal before shipping.
    #[must_use]
    pub fn subtotal(&self) -> &Money<'a, Currency> {
        &self.subtotal
    }

    /// Shipping cost charged.
    #[must_use]
    pub fn shipping_cost(&self) -> &Money<'a, Currency> {
        &self.shipping_cost
    }

    /// Subtotal plus shipping.
    #[must_use]
    pub fn total(&self) -> &Money<'a, Currency> {
        &self.total
    }

    /// Sum of the order's donation rows, frozen at creation.
    #[must_use]
    pub fn nonprofit_donation(&self) -> Decimal {
        self.nonprofit_donation
    }

    /// Current lifecycle status.
    #[must_use]
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// When the order was placed.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Move the order to a new lifecycle status.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::InvalidTransition`] if the lifecycle does not
    /// allow the move.
    pub fn transition_to(&mut self, next: OrderStatus) -> Result<(), OrderError> {
        if self.status.can_transition_to(next) {
            self.status = next;
            Ok(())
        } else {
            Err(OrderError::InvalidTransition(self.status, next))
        }
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use slotmap::SlotMap;
    use testresult::TestResult;

    use super::*;

    fn order() -> Order<'static> {
        let mut buyers = SlotMap::<BuyerKey, ()>::with_key();
        let mut shops = SlotMap::<ShopKey, ()>::with_key();

        Order::new(
            OrderId(1),
            buyers.insert(()),
            shops.insert(()),
            vec![OrderItem::new(Money::from_minor(2500, USD), 2)],
            Money::from_minor(5000, USD),
            Money::from_minor(499, USD),
            Money::from_minor(5499, USD),
            Decimal::new(575, 2),
            Utc::now(),
        )
    }

    #[test]
    fn new_order_is_pending() {
        assert_eq!(order().status(), OrderStatus::Pending);
    }

    #[test]
    fn happy_path_transitions_succeed() -> TestResult {
        let mut order = order();

        order.transition_to(OrderStatus::Processing)?;
        order.transition_to(OrderStatus::Shipped)?;
        order.transition_to(OrderStatus::Delivered)?;

        assert_eq!(order.status(), OrderStatus::Delivered);

        Ok(())
    }

    #[test]
    fn cancellation_is_allowed_before_shipping_only() -> TestResult {
        let mut order = order();
        order.transition_to(OrderStatus::Processing)?;
        order.transition_to(OrderStatus::Cancelled)?;

        assert_eq!(order.status(), OrderStatus::Cancelled);

        let mut shipped = shipped_order()?;

        assert_eq!(
            shipped.transition_to(OrderStatus::Cancelled),
            Err(OrderError::InvalidTransition(
                OrderStatus::Shipped,
                OrderStatus::Cancelled
            ))
        );

        Ok(())
    }

    fn shipped_order() -> Result<Order<'static>, OrderError> {
        let mut order = order();
        order.transition_to(OrderStatus::Processing)?;
        order.transition_to(OrderStatus::Shipped)?;

        Ok(order)
    }

    #[test]
    fn nothing_leaves_a_terminal_status() -> TestResult {
        let mut order = order();
        order.transition_to(OrderStatus::Cancelled)?;

        assert!(order.transition_to(OrderStatus::Processing).is_err());

        Ok(())
    }

    #[test]
    fn skipping_statuses_is_rejected() {
        let mut order = order();

        assert_eq!(
            order.transition_to(OrderStatus::Delivered),
            Err(OrderError::InvalidTransition(
                OrderStatus::Pending,
                OrderStatus::Delivered
            ))
        );
    }
}

//! Cart lines, orders and their ordered items.

use serde::Serialize;

use super::value_objects::{OrderCode, OrderStatus};
use crate::domain::accounts::BuyerStatus;
use crate::domain::shared::{DomainError, ItemId, Money, OrderId, Timestamp, UserId};

/// One item in a buyer's cart, joined with the item's current price and stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    /// Cart row ID.
    pub id: i64,
    /// Item in the cart.
    pub item_id: ItemId,
    /// Item name.
    pub name: String,
    /// Current unit price.
    pub price: Money,
    /// Current stock.
    pub stock: u32,
    /// Requested quantity.
    pub quantity: u32,
}

impl CartLine {
    /// `price * quantity`.
    #[must_use]
    pub fn cost(&self) -> Money {
        self.price * self.quantity
    }
}

/// The whole cart with its grand total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    /// Lines in insertion order.
    pub lines: Vec<CartLine>,
    /// Sum of line costs.
    pub total: Money,
}

impl CartSummary {
    /// Total up a set of lines.
    #[must_use]
    pub fn new(lines: Vec<CartLine>) -> Self {
        let total = lines.iter().map(CartLine::cost).sum();
        Self { lines, total }
    }
}

/// An order header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    /// Row ID.
    pub id: OrderId,
    /// Public reference.
    pub code: OrderCode,
    /// Placement time, replaced by the payment time once paid.
    pub created: Timestamp,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// Buyer.
    pub user_id: UserId,
}

impl Order {
    /// Move to [`OrderStatus::Paid`] at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidStateTransition`] if already paid.
    pub fn mark_paid(&mut self, now: Timestamp) -> Result<(), DomainError> {
        if self.status == OrderStatus::Paid {
            return Err(DomainError::InvalidStateTransition {
                entity: "Order".to_string(),
                from: self.status.to_string(),
                to: OrderStatus::Paid.to_string(),
                reason: format!("order {} is already paid", self.code),
            });
        }
        self.status = OrderStatus::Paid;
        self.created = now;
        Ok(())
    }
}

/// One ordered item with the item's name and unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    /// Ordered item.
    pub item_id: ItemId,
    /// Item name.
    pub name: String,
    /// Current unit price.
    pub price: Money,
    /// Ordered quantity.
    pub quantity: u32,
    /// Cost fixed at checkout.
    pub total_cost: Money,
}

/// An order with its lines and total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderDetail {
    /// Header.
    pub order: Order,
    /// Ordered items.
    pub lines: Vec<OrderLine>,
    /// Sum of `total_cost`.
    pub total: Money,
}

impl OrderDetail {
    /// Total up the lines.
    #[must_use]
    pub fn new(order: Order, lines: Vec<OrderLine>) -> Self {
        let total = lines.iter().map(|l| l.total_cost).sum();
        Self {
            order,
            lines,
            total,
        }
    }
}

/// Result of a successful payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentReceipt {
    /// Paid order.
    pub order: Order,
    /// Amount taken from funds.
    pub debited: Money,
    /// Funds left.
    pub balance: Money,
    /// Purchase count after payment.
    pub purchases: u32,
    /// Buyer tier after payment.
    pub buyer_status: BuyerStatus,
    /// Whether the tier changed.
    pub status_upgraded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(item: i64, price: Money, quantity: u32) -> CartLine {
        CartLine {
            id: item,
            item_id: ItemId::new(item),
            name: format!("item {item}"),
            price,
            stock: 10,
            quantity,
        }
    }

    #[test]
    fn cart_summary_totals_line_costs() {
        let summary = CartSummary::new(vec![
            line(1, Money::new(dec!(2.50)), 2),
            line(2, Money::new(dec!(10)), 1),
        ]);
        assert_eq!(summary.total, Money::new(dec!(15)));
        assert_eq!(summary.lines[0].cost(), Money::new(dec!(5)));
    }

    #[test]
    fn empty_cart_totals_zero() {
        assert_eq!(CartSummary::new(vec![]).total, Money::ZERO);
    }

    fn order(status: OrderStatus) -> Order {
        Order {
            id: OrderId::new(1),
            code: OrderCode::generate(UserId::new(1), Timestamp::now()),
            created: Timestamp::parse("2026-01-01T00:00:00Z").unwrap(),
            status,
            user_id: UserId::new(1),
        }
    }

    #[test]
    fn mark_paid_updates_status_and_time() {
        let mut o = order(OrderStatus::Placed);
        let now = Timestamp::parse("2026-02-01T10:00:00Z").unwrap();
        o.mark_paid(now).unwrap();
        assert_eq!(o.status, OrderStatus::Paid);
        assert_eq!(o.created, now);
    }

    #[test]
    fn mark_paid_twice_is_rejected() {
        let mut o = order(OrderStatus::Paid);
        let err = o.mark_paid(Timestamp::now()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidStateTransition { .. }));
    }

    #[test]
    fn order_detail_total() {
        let detail = OrderDetail::new(
            order(OrderStatus::Placed),
            vec![
                OrderLine {
                    item_id: ItemId::new(1),
                    name: "a".to_string(),
                    price: Money::new(dec!(3)),
                    quantity: 2,
                    total_cost: Money::new(dec!(6)),
                },
                OrderLine {
                    item_id: ItemId::new(2),
                    name: "b".to_string(),
                    price: Money::new(dec!(1.25)),
                    quantity: 1,
                    total_cost: Money::new(dec!(1.25)),
                },
            ],
        );
        assert_eq!(detail.total, Money::new(dec!(7.25)));
    }
}

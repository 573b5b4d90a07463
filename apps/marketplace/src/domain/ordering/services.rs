//! Checkout and payment rules.
//!
//! Pure functions evaluated by the persistence adapter inside the checkout and
//! payment transactions.

use std::collections::HashSet;

use super::entities::CartLine;
use super::value_objects::CheckoutSelection;
use crate::domain::shared::{DomainError, ItemId, Money, rules};

/// An ordered-item row to insert at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedLine {
    /// Cart row to delete.
    pub cart_line_id: i64,
    /// Ordered item.
    pub item_id: ItemId,
    /// Ordered quantity.
    pub quantity: u32,
    /// `price * quantity` at checkout time.
    pub total_cost: Money,
}

/// Turn a selection of cart lines into ordered-item rows.
///
/// # Errors
///
/// - [`rules::EMPTY_SELECTION`] when nothing is selected
/// - [`rules::NOT_IN_CART`] when a selected item is not in `cart`
/// - [`DomainError::InvalidValue`] for a zero quantity or a repeated item
pub fn plan_checkout(
    cart: &[CartLine],
    selection: &[CheckoutSelection],
) -> Result<Vec<PlannedLine>, DomainError> {
    if selection.is_empty() {
        return Err(DomainError::rule(
            rules::EMPTY_SELECTION,
            "select at least one cart item to place an order",
        ));
    }

    let mut seen = HashSet::with_capacity(selection.len());
    selection
        .iter()
        .map(|picked| {
            if !seen.insert(picked.item_id) {
                return Err(DomainError::invalid(
                    "items",
                    format!("item {} selected more than once", picked.item_id),
                ));
            }
            let line = cart
                .iter()
                .find(|line| line.item_id == picked.item_id)
                .ok_or_else(|| {
                    DomainError::rule(
                        rules::NOT_IN_CART,
                        format!("item {} is not in the cart", picked.item_id),
                    )
                })?;
            let quantity = picked.quantity.unwrap_or(line.quantity);
            if quantity == 0 {
                return Err(DomainError::invalid("quantity", "must be at least 1"));
            }
            Ok(PlannedLine {
                cart_line_id: line.id,
                item_id: line.item_id,
                quantity,
                total_cost: line.price * quantity,
            })
        })
        .collect()
}

/// Stock left after shipping `ordered` units.
///
/// # Errors
///
/// Returns [`rules::INSUFFICIENT_STOCK`] if `ordered` exceeds `stock`.
pub fn take_stock(item: ItemId, stock: u32, ordered: u32) -> Result<u32, DomainError> {
    stock.checked_sub(ordered).ok_or_else(|| {
        DomainError::rule(
            rules::INSUFFICIENT_STOCK,
            format!("item {item} has {stock} in stock, {ordered} ordered"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn cart() -> Vec<CartLine> {
        vec![
            CartLine {
                id: 10,
                item_id: ItemId::new(1),
                name: "mug".to_string(),
                price: Money::new(dec!(4.20)),
                stock: 5,
                quantity: 1,
            },
            CartLine {
                id: 11,
                item_id: ItemId::new(2),
                name: "plate".to_string(),
                price: Money::new(dec!(7)),
                stock: 2,
                quantity: 3,
            },
        ]
    }

    fn pick(item: i64, quantity: Option<u32>) -> CheckoutSelection {
        CheckoutSelection {
            item_id: ItemId::new(item),
            quantity,
        }
    }

    #[test]
    fn plans_selected_lines_with_costs() {
        let planned = plan_checkout(&cart(), &[pick(1, Some(3)), pick(2, None)]).unwrap();
        assert_eq!(planned.len(), 2);
        assert_eq!(planned[0].cart_line_id, 10);
        assert_eq!(planned[0].quantity, 3);
        assert_eq!(planned[0].total_cost, Money::new(dec!(12.60)));
        assert_eq!(planned[1].quantity, 3);
        assert_eq!(planned[1].total_cost, Money::new(dec!(21)));
    }

    #[test]
    fn rejects_empty_selection() {
        let err = plan_checkout(&cart(), &[]).unwrap_err();
        assert!(err.to_string().contains(rules::EMPTY_SELECTION));
    }

    #[test]
    fn rejects_item_not_in_cart() {
        let err = plan_checkout(&cart(), &[pick(99, None)]).unwrap_err();
        assert!(err.to_string().contains(rules::NOT_IN_CART));
    }

    #[test]
    fn rejects_zero_quantity() {
        assert!(plan_checkout(&cart(), &[pick(1, Some(0))]).is_err());
    }

    #[test]
    fn rejects_repeated_item() {
        assert!(plan_checkout(&cart(), &[pick(1, None), pick(1, Some(2))]).is_err());
    }

    #[test]
    fn take_stock_rejects_oversell() {
        assert_eq!(take_stock(ItemId::new(1), 5, 5).unwrap(), 0);
        let err = take_stock(ItemId::new(1), 2, 3).unwrap_err();
        assert!(err.to_string().contains(rules::INSUFFICIENT_STOCK));
    }

    proptest! {
        #[test]
        fn planned_cost_is_price_times_quantity(cents in 0i64..1_000_000, qty in 1u32..1000) {
            let mut lines = cart();
            lines[0].price = Money::from_cents(cents);
            let planned = plan_checkout(&lines, &[pick(1, Some(qty))]).unwrap();
            prop_assert_eq!(planned[0].total_cost, Money::from_cents(cents * i64::from(qty)));
        }

        #[test]
        fn take_stock_never_underflows(stock in 0u32..10_000, ordered in 0u32..10_000) {
            match take_stock(ItemId::new(1), stock, ordered) {
                Ok(left) => prop_assert_eq!(left + ordered, stock),
                Err(_) => prop_assert!(ordered > stock),
            }
        }
    }
}

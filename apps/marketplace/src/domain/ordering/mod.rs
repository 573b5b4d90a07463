//! Ordering Bounded Context
//!
//! Buyer carts, checkout into orders and payment from the funds balance.
//!
//! # Key Concepts
//!
//! - **Checkout**: selected cart lines become one `PLACED` order and its
//!   ordered items; the lines leave the cart
//! - **Payment**: debits funds, counts purchases, takes stock and marks the
//!   order `PAID`, all or nothing

pub mod entities;
pub mod repository;
pub mod services;
pub mod value_objects;

pub use entities::{CartLine, CartSummary, Order, OrderDetail, OrderLine, PaymentReceipt};
pub use repository::OrderingRepository;
pub use services::{PlannedLine, plan_checkout, take_stock};
pub use value_objects::{CheckoutSelection, OrderCode, OrderStatus};

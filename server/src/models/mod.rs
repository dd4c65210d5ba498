// kedai_server/src/models/mod.rs

//! Contains data structures representing database entities.

pub mod money;
pub mod order;
pub mod order_item;
pub mod product;
pub mod user;

pub use money::Money;
pub use order::{Order, OrderStatus, OrderView};
pub use order_item::OrderItem;
pub use product::{Product, ProductView};
pub use user::User;

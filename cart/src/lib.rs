// kedai_cart/src/lib.rs

//! Client side of the kedai storefront.
//!
//! * [`CartStore`] keeps the shopping cart in memory and mirrors every change
//!   to a [`CartStorage`] so it survives restarts.
//! * [`StorefrontClient`] talks to the storefront HTTP API.
//! * [`CheckoutSession`] turns the cart into an order and clears it on success.
//!
//! ```ignore
//! let store = Arc::new(CartStore::open(FileCartStorage::new("kedai-cart.json")));
//! store.add(&product, 2);
//! let session = CheckoutSession::new(store.clone(), StorefrontClient::new(api_url)?);
//! let order = session.checkout(CustomerDetails::named("Andi")).await?;
//! ```

pub mod checkout;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod storage;
pub mod store;

pub use checkout::{CheckoutSession, CheckoutState, CustomerDetails};
pub use client::StorefrontClient;
pub use config::ClientConfig;
pub use error::{CartError, CheckoutError, ClientError, ConfigError};
pub use model::{CartLine, CartSnapshot, CreateOrderPayload, Order, OrderItem, OrderLinePayload, Product, User};
pub use storage::{CartStorage, FileCartStorage, MemoryCartStorage};
pub use store::CartStore;

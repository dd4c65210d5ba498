// kedai_server/src/flows/mod.rs

//! Defines and registers the flows used by the storefront.

use crate::errors::AppError;
use kedai_flow::FlowRegistry;

pub mod checkout_flow;
pub mod contexts;

/// Registers every application flow. Called once while building `AppState`.
pub fn register_all_flows(registry: &FlowRegistry<AppError>) {
  tracing::info!("Registering application flows...");
  checkout_flow::register_checkout_flow(registry);
  tracing::info!(count = registry.len(), "Application flows registered.");
}

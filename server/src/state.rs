// kedai_server/src/state.rs

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::flows;
use kedai_flow::FlowRegistry;
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub db_pool: SqlitePool,
  pub flows: Arc<FlowRegistry<AppError>>,
  pub config: Arc<AppConfig>,
}

impl AppState {
  /// Builds the shared state and registers every application flow.
  pub fn new(db_pool: SqlitePool, config: Arc<AppConfig>) -> Self {
    let registry = Arc::new(FlowRegistry::<AppError>::new());
    flows::register_all_flows(&registry);
    Self {
      db_pool,
      flows: registry,
      config,
    }
  }
}

// kedai_server/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use kedai_flow::FlowError;
use rust_decimal::Decimal;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Cart is empty: an order needs at least one item.")]
  EmptyCart,

  #[error("Customer identity is missing: provide user_id or customer_name.")]
  MissingIdentity,

  #[error("Supplied total {supplied} does not match the computed total {computed}.")]
  InvalidTotal { supplied: Decimal, computed: Decimal },

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Conflict: {0}")]
  Conflict(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Persistence(#[from] sqlx::Error),

  #[error("Workflow Error: {source}")]
  Workflow {
    #[from]
    source: FlowError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),

  /// A flow handler returned `Stop` where the HTTP handler needed a result.
  #[error("Checkout flow was halted by a handler.")]
  FlowHalted,
}

impl AppError {
  /// Message placed in the `error` field of the response body. Storage and
  /// workflow faults are not described to the caller.
  fn public_message(&self) -> String {
    match self {
      AppError::Validation(m) | AppError::NotFound(m) | AppError::Conflict(m) => m.clone(),
      AppError::Persistence(_) => "Database operation failed.".to_string(),
      AppError::Config(_) => "Configuration issue.".to_string(),
      AppError::Workflow { .. } | AppError::FlowHalted => "Workflow processing error.".to_string(),
      AppError::Internal(_) => "An internal error occurred.".to_string(),
      other => other.to_string(),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) | AppError::EmptyCart | AppError::MissingIdentity | AppError::InvalidTotal { .. } => {
        StatusCode::BAD_REQUEST
      }
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Conflict(_) => StatusCode::CONFLICT,
      AppError::Persistence(_)
      | AppError::Config(_)
      | AppError::Workflow { .. }
      | AppError::Internal(_)
      | AppError::FlowHalted => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, status = status.as_u16(), "Rejecting request");
    }
    HttpResponse::build(status).json(json!({
      "success": false,
      "error": self.public_message(),
    }))
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;

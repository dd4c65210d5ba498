// kedai_server/src/services/pricing.rs

//! Server-side order pricing. The client's figures are never trusted: the
//! subtotal is recomputed from the submitted lines and a supplied total is
//! only a cross-check.

use crate::errors::{AppError, Result};
use crate::web::dto::OrderLineRequest;
use rust_decimal::Decimal;

/// Largest accepted difference between a client total and the recomputed subtotal.
pub const TOTAL_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderPricing {
  pub subtotal: Decimal,
  pub surcharge: Decimal,
  pub total: Decimal,
}

/// Σ price × quantity. Fails instead of overflowing, since both factors come
/// from the request body.
pub fn subtotal(lines: &[OrderLineRequest]) -> Result<Decimal> {
  lines.iter().try_fold(Decimal::ZERO, |total, line| {
    line
      .price
      .checked_mul(Decimal::from(line.quantity))
      .and_then(|line_total| total.checked_add(line_total))
      .ok_or_else(|| {
        AppError::Validation(format!(
          "Item for product {} puts the order total out of range.",
          line.product_id
        ))
      })
  })
}

/// Prices an order. `supplied_total` is the client's subtotal; a difference of
/// more than [`TOTAL_TOLERANCE`] rejects the order.
pub fn price_order(
  lines: &[OrderLineRequest],
  supplied_total: Option<Decimal>,
  surcharge_percent: Decimal,
) -> Result<OrderPricing> {
  let subtotal = subtotal(lines)?;

  if let Some(supplied) = supplied_total {
    let within_tolerance = supplied
      .checked_sub(subtotal)
      .map(|difference| difference.abs() <= TOTAL_TOLERANCE)
      .unwrap_or(false);
    if !within_tolerance {
      return Err(AppError::InvalidTotal {
        supplied,
        computed: subtotal,
      });
    }
  }

  let (surcharge, total) = subtotal
    .checked_mul(surcharge_percent)
    .map(|scaled| (scaled / Decimal::ONE_HUNDRED).round_dp(2))
    .and_then(|surcharge| subtotal.checked_add(surcharge).map(|total| (surcharge, total)))
    .ok_or_else(|| AppError::Validation("Order total with surcharge is out of range.".to_string()))?;

  Ok(OrderPricing {
    subtotal,
    surcharge,
    total,
  })
}

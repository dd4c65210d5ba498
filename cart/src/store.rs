// kedai_cart/src/store.rs

//! `CartStore`: the in-memory cart and its write-through persistence.
//!
//! In-memory state is authoritative. Every mutation is applied under the
//! state lock, then mirrored to storage outside it; storage failures are
//! logged and otherwise ignored.

use crate::error::CartError;
use crate::model::{checked_cart_total, saturating_cart_total, CartLine, CartSnapshot, Product};
use crate::storage::{CartStorage, MemoryCartStorage};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

struct CartState {
  lines: Vec<CartLine>,
  /// Bumped on every change; lets the writer drop snapshots that are already stale.
  generation: u64,
}

pub struct CartStore {
  state: Mutex<CartState>,
  storage: Box<dyn CartStorage>,
  /// Generation of the newest snapshot handed to storage.
  persisted: Mutex<u64>,
}

impl CartStore {
  /// Creates a store primed with whatever `storage` last saved. A storage that
  /// cannot be read yields an empty cart.
  pub fn open(storage: impl CartStorage + 'static) -> Self {
    let lines = match storage.load() {
      Ok(lines) => normalize(lines),
      Err(e) => {
        warn!(error = %e, "Could not load saved cart, starting empty.");
        Vec::new()
      }
    };
    let lines = if checked_cart_total(&lines).is_some() {
      lines
    } else {
      warn!("Saved cart total is out of range, starting empty.");
      Vec::new()
    };
    info!(lines = lines.len(), "Cart opened.");

    Self {
      state: Mutex::new(CartState { lines, generation: 0 }),
      storage: Box::new(storage),
      persisted: Mutex::new(0),
    }
  }

  /// A store that only lives in memory.
  pub fn in_memory() -> Self {
    Self::open(MemoryCartStorage::new())
  }

  /// Adds `quantity` of `product`. An existing line for the same product keeps
  /// its captured name and price and only grows in quantity. An add that
  /// would push the cart total past what a `Decimal` holds is ignored.
  pub fn add(&self, product: &Product, quantity: u32) {
    if quantity == 0 {
      debug!(product_id = product.id, "Ignoring add with zero quantity.");
      return;
    }
    self.mutate(|lines| {
      let mut next = lines.clone();
      match next.iter_mut().find(|line| line.product_id == product.id) {
        Some(line) => line.quantity = line.quantity.saturating_add(quantity),
        None => next.push(CartLine::from_product(product, quantity)),
      }
      if checked_cart_total(&next).is_none() {
        warn!(product_id = product.id, quantity, "Ignoring add that overflows the cart total.");
        return false;
      }
      *lines = next;
      true
    });
  }

  /// Sets the quantity of an existing line. Values below 1 and unknown
  /// products are ignored; removal goes through [`CartStore::remove`].
  pub fn update_quantity(&self, product_id: i64, new_quantity: i64) {
    let quantity = match u32::try_from(new_quantity) {
      Ok(q) if q >= 1 => q,
      _ => {
        debug!(product_id, new_quantity, "Ignoring out-of-range quantity.");
        return;
      }
    };
    self.mutate(|lines| {
      let Some(index) = lines.iter().position(|line| line.product_id == product_id) else {
        return false;
      };
      if lines[index].quantity == quantity {
        return false;
      }
      let mut next = lines.clone();
      next[index].quantity = quantity;
      if checked_cart_total(&next).is_none() {
        warn!(product_id, new_quantity, "Ignoring quantity that overflows the cart total.");
        return false;
      }
      *lines = next;
      true
    });
  }

  pub fn remove(&self, product_id: i64) {
    self.mutate(|lines| {
      let before = lines.len();
      lines.retain(|line| line.product_id != product_id);
      lines.len() != before
    });
  }

  pub fn clear(&self) {
    self.mutate(|lines| {
      lines.clear();
      true
    });
  }

  pub fn total_items(&self) -> u64 {
    self.state.lock().lines.iter().map(|line| u64::from(line.quantity)).sum()
  }

  /// Sum of line totals, without any surcharge.
  pub fn total_price(&self) -> Decimal {
    saturating_cart_total(&self.state.lock().lines)
  }

  pub fn snapshot(&self) -> CartSnapshot {
    CartSnapshot::from_lines(self.lines())
  }

  pub fn lines(&self) -> Vec<CartLine> {
    self.state.lock().lines.clone()
  }

  pub fn line(&self, product_id: i64) -> Option<CartLine> {
    self
      .state
      .lock()
      .lines
      .iter()
      .find(|line| line.product_id == product_id)
      .cloned()
  }

  pub fn is_empty(&self) -> bool {
    self.state.lock().lines.is_empty()
  }

  /// Writes the current cart to storage. Meant for shutdown; unlike the
  /// write-through on mutations, the error is returned.
  pub fn flush(&self) -> Result<(), CartError> {
    let (lines, generation) = {
      let state = self.state.lock();
      (state.lines.clone(), state.generation)
    };
    let mut persisted = self.persisted.lock();
    self.storage.save(&lines)?;
    *persisted = (*persisted).max(generation);
    Ok(())
  }

  fn mutate(&self, change: impl FnOnce(&mut Vec<CartLine>) -> bool) {
    let (lines, generation) = {
      let mut state = self.state.lock();
      if !change(&mut state.lines) {
        return;
      }
      state.generation += 1;
      (state.lines.clone(), state.generation)
    };
    self.persist(lines, generation);
  }

  fn persist(&self, lines: Vec<CartLine>, generation: u64) {
    let mut persisted = self.persisted.lock();
    if generation <= *persisted {
      debug!(generation, persisted = *persisted, "Skipping stale cart snapshot.");
      return;
    }
    *persisted = generation;
    if let Err(e) = self.storage.save(&lines) {
      warn!(error = %e, generation, "Failed to persist cart; keeping in-memory state.");
    }
  }
}

/// Folds duplicate products together and drops empty lines, so a hand-edited
/// or older file still yields one line per product.
fn normalize(lines: Vec<CartLine>) -> Vec<CartLine> {
  let mut merged: Vec<CartLine> = Vec::with_capacity(lines.len());
  for line in lines.into_iter().filter(|line| line.quantity >= 1) {
    match merged.iter_mut().find(|existing| existing.product_id == line.product_id) {
      Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
      None => merged.push(line),
    }
  }
  merged
}

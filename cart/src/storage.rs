// kedai_cart/src/storage.rs

//! Durable homes for the cart. The whole cart is stored as one JSON array of
//! lines and replaced wholesale on every save.

use crate::error::CartError;
use crate::model::CartLine;
use parking_lot::Mutex;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tracing::debug;

pub const DEFAULT_CART_FILE: &str = "kedai-cart.json";

pub trait CartStorage: Send + Sync {
  /// Returns the last saved lines, or an empty cart when nothing was saved yet.
  fn load(&self) -> Result<Vec<CartLine>, CartError>;

  fn save(&self, lines: &[CartLine]) -> Result<(), CartError>;
}

/// Stores the cart in a single JSON file. Saves go to a sibling temp file
/// that is then renamed over the target, so readers never see half a cart.
#[derive(Debug, Clone)]
pub struct FileCartStorage {
  path: PathBuf,
}

impl FileCartStorage {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  fn temp_path(&self) -> PathBuf {
    let mut file_name = self
      .path
      .file_name()
      .map(|name| name.to_os_string())
      .unwrap_or_else(|| DEFAULT_CART_FILE.into());
    file_name.push(".tmp");
    self.path.with_file_name(file_name)
  }
}

impl Default for FileCartStorage {
  fn default() -> Self {
    Self::new(DEFAULT_CART_FILE)
  }
}

impl CartStorage for FileCartStorage {
  fn load(&self) -> Result<Vec<CartLine>, CartError> {
    let bytes = match fs::read(&self.path) {
      Ok(bytes) => bytes,
      Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
      Err(e) => return Err(e.into()),
    };
    if bytes.iter().all(u8::is_ascii_whitespace) {
      return Ok(Vec::new());
    }
    Ok(serde_json::from_slice(&bytes)?)
  }

  fn save(&self, lines: &[CartLine]) -> Result<(), CartError> {
    if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
      fs::create_dir_all(parent)?;
    }

    let encoded = serde_json::to_vec(lines)?;
    let temp_path = self.temp_path();
    {
      let mut file = File::create(&temp_path)?;
      file.write_all(&encoded)?;
      file.sync_all()?;
    }
    fs::rename(&temp_path, &self.path)?;
    debug!(path = %self.path.display(), lines = lines.len(), "Cart saved.");
    Ok(())
  }
}

/// In-process storage. Can be switched into a failing mode to exercise the
/// store's error handling.
#[derive(Debug, Default)]
pub struct MemoryCartStorage {
  lines: Mutex<Vec<CartLine>>,
  failing: AtomicBool,
  saves: AtomicUsize,
}

impl MemoryCartStorage {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_lines(lines: Vec<CartLine>) -> Self {
    Self {
      lines: Mutex::new(lines),
      ..Self::default()
    }
  }

  pub fn set_failing(&self, failing: bool) {
    self.failing.store(failing, Ordering::SeqCst);
  }

  /// What the last successful save wrote.
  pub fn saved_lines(&self) -> Vec<CartLine> {
    self.lines.lock().clone()
  }

  pub fn save_count(&self) -> usize {
    self.saves.load(Ordering::SeqCst)
  }
}

impl CartStorage for MemoryCartStorage {
  fn load(&self) -> Result<Vec<CartLine>, CartError> {
    if self.failing.load(Ordering::SeqCst) {
      return Err(CartError::Unavailable("memory storage set to fail".to_string()));
    }
    Ok(self.lines.lock().clone())
  }

  fn save(&self, lines: &[CartLine]) -> Result<(), CartError> {
    if self.failing.load(Ordering::SeqCst) {
      return Err(CartError::Unavailable("memory storage set to fail".to_string()));
    }
    *self.lines.lock() = lines.to_vec();
    self.saves.fetch_add(1, Ordering::SeqCst);
    Ok(())
  }
}

// Shared handles let a test keep a reference to the storage it gave the store.
impl<S: CartStorage + ?Sized> CartStorage for std::sync::Arc<S> {
  fn load(&self) -> Result<Vec<CartLine>, CartError> {
    (**self).load()
  }

  fn save(&self, lines: &[CartLine]) -> Result<(), CartError> {
    (**self).save(lines)
  }
}

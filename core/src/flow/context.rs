// bazaar/src/flow/context.rs

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// Shared, interior-mutable data handed to every handler of a flow run.
///
/// Guards returned by `read` and `write` are blocking and must be dropped
/// before the handler reaches an `.await`.
#[derive(Debug)]
pub struct FlowContext<T: Send + Sync + 'static>(Arc<RwLock<T>>);

impl<T: Send + Sync + 'static> FlowContext<T> {
  pub fn new(data: T) -> Self {
    FlowContext(Arc::new(RwLock::new(data)))
  }

  pub fn read(&self) -> RwLockReadGuard<'_, T> {
    self.0.read()
  }

  pub fn write(&self) -> RwLockWriteGuard<'_, T> {
    self.0.write()
  }

  /// Takes the data back out once no other handle is alive.
  /// Returns the context unchanged if it is still shared.
  pub fn try_into_inner(self) -> Result<T, Self> {
    Arc::try_unwrap(self.0).map(RwLock::into_inner).map_err(FlowContext)
  }
}

impl<T: Clone + Send + Sync + 'static> FlowContext<T> {
  /// Clones the current data under a short read lock.
  pub fn snapshot(&self) -> T {
    self.0.read().clone()
  }
}

impl<T: Send + Sync + 'static> Clone for FlowContext<T> {
  fn clone(&self) -> Self {
    FlowContext(Arc::clone(&self.0))
  }
}

impl<T: Default + Send + Sync + 'static> Default for FlowContext<T> {
  fn default() -> Self {
    Self::new(T::default())
  }
}

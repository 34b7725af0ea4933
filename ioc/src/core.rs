//! Core data structures shared by the collection, the container and the registrar.

use crate::error::{Error, Result};
use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

thread_local! {
  // The set of services currently being resolved on this thread.
  static RESOLVING_STACK: RefCell<HashSet<ServiceKey>> = RefCell::new(HashSet::new());
}

/// An RAII guard that detects circular resolution.
///
/// Entering pushes the key onto the thread-local resolution stack and fails if it is
/// already there. Dropping the guard pops the key again.
pub(crate) struct ResolutionGuard {
  key: ServiceKey,
}

impl ResolutionGuard {
  pub(crate) fn enter(key: ServiceKey) -> Result<Self> {
    let inserted = RESOLVING_STACK.with(|stack| stack.borrow_mut().insert(key));
    if !inserted {
      return Err(Error::CircularDependency {
        service: key.type_name(),
      });
    }
    Ok(Self { key })
  }
}

impl Drop for ResolutionGuard {
  fn drop(&mut self) {
    RESOLVING_STACK.with(|stack| {
      stack.borrow_mut().remove(&self.key);
    });
  }
}

/// The identity of a service: a concrete type or a trait object type.
///
/// Two keys are equal when they denote the same type. The type name is carried along
/// only for diagnostics.
#[derive(Clone, Copy)]
pub struct ServiceKey {
  type_id: TypeId,
  type_name: &'static str,
}

impl ServiceKey {
  /// The key for `T`. Use `ServiceKey::of::<dyn Trait>()` for trait services.
  pub fn of<T: ?Sized + Any>() -> Self {
    Self {
      type_id: TypeId::of::<T>(),
      type_name: std::any::type_name::<T>(),
    }
  }

  pub fn type_id(&self) -> TypeId {
    self.type_id
  }

  pub fn type_name(&self) -> &'static str {
    self.type_name
  }
}

impl PartialEq for ServiceKey {
  fn eq(&self, other: &Self) -> bool {
    self.type_id == other.type_id
  }
}

impl Eq for ServiceKey {}

impl Hash for ServiceKey {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.type_id.hash(state);
  }
}

impl fmt::Debug for ServiceKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Key({})", self.type_name)
  }
}

impl fmt::Display for ServiceKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.type_name)
  }
}

/// A type-erased, shared service value.
///
/// Internally this holds an `Arc<T>` for the type `T` it was created from, which may be a
/// trait object. Cloning is cheap and never clones the underlying value.
#[derive(Clone)]
pub struct Instance {
  value: Arc<dyn Any + Send + Sync>,
  type_name: &'static str,
}

impl Instance {
  pub fn new<T: ?Sized + Any + Send + Sync>(value: Arc<T>) -> Self {
    Self {
      value: Arc::new(value),
      type_name: std::any::type_name::<T>(),
    }
  }

  /// Recovers the `Arc<T>` this instance was created from, or `None` if `T` is not
  /// the type it was created with.
  pub fn downcast<T: ?Sized + Any + Send + Sync>(&self) -> Option<Arc<T>> {
    self.value.downcast_ref::<Arc<T>>().cloned()
  }

  /// Like [`Instance::downcast`], but reports a mismatch as an error.
  pub fn downcast_as<T: ?Sized + Any + Send + Sync>(&self) -> Result<Arc<T>> {
    self.downcast::<T>().ok_or(Error::TypeMismatch {
      expected: std::any::type_name::<T>(),
      found: self.type_name,
    })
  }

  pub fn is<T: ?Sized + Any + Send + Sync>(&self) -> bool {
    self.value.is::<Arc<T>>()
  }

  pub fn type_name(&self) -> &'static str {
    self.type_name
  }

  /// True if both instances share the same allocation.
  pub fn ptr_eq(&self, other: &Instance) -> bool {
    Arc::ptr_eq(&self.value, &other.value)
  }
}

impl fmt::Debug for Instance {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Instance({})", self.type_name)
  }
}

//! The `Resolver` seam and the `ServiceProvider` built from a `ServiceCollection`.

use crate::core::{Instance, ResolutionGuard, ServiceKey};
use crate::error::{Error, Result};
use crate::registration::Registration;
use once_cell::sync::OnceCell;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// Resolution by service key.
///
/// Factories and [`Injectable`](crate::Injectable) constructors receive a `&dyn Resolver`.
/// The typed helpers [`get`](#method.get), [`get_required`](#method.get_required) and
/// [`get_all`](#method.get_all) are available on any `dyn Resolver`.
pub trait Resolver {
  /// The value of the last registration for `key`, or `None` if there is none or it
  /// produced no value.
  fn resolve(&self, key: &ServiceKey) -> Result<Option<Instance>>;

  /// The values of every registration for `key`, in registration order. Registrations
  /// producing no value are skipped.
  fn resolve_all(&self, key: &ServiceKey) -> Result<Vec<Instance>>;

  /// Like [`Resolver::resolve`], but a missing value is an error.
  fn resolve_required(&self, key: &ServiceKey) -> Result<Instance> {
    self.resolve(key)?.ok_or(Error::NotRegistered {
      service: key.type_name(),
    })
  }
}

fn get<T: ?Sized + Any + Send + Sync>(resolver: &dyn Resolver) -> Result<Option<Arc<T>>> {
  match resolver.resolve(&ServiceKey::of::<T>())? {
    Some(instance) => instance.downcast_as::<T>().map(Some),
    None => Ok(None),
  }
}

fn get_required<T: ?Sized + Any + Send + Sync>(resolver: &dyn Resolver) -> Result<Arc<T>> {
  resolver
    .resolve_required(&ServiceKey::of::<T>())?
    .downcast_as::<T>()
}

fn get_all<T: ?Sized + Any + Send + Sync>(resolver: &dyn Resolver) -> Result<Vec<Arc<T>>> {
  resolver
    .resolve_all(&ServiceKey::of::<T>())?
    .iter()
    .map(Instance::downcast_as::<T>)
    .collect()
}

impl<'a> dyn Resolver + 'a {
  pub fn get<T: ?Sized + Any + Send + Sync>(&self) -> Result<Option<Arc<T>>> {
    get::<T>(self)
  }

  pub fn get_required<T: ?Sized + Any + Send + Sync>(&self) -> Result<Arc<T>> {
    get_required::<T>(self)
  }

  pub fn get_all<T: ?Sized + Any + Send + Sync>(&self) -> Result<Vec<Arc<T>>> {
    get_all::<T>(self)
  }
}

struct Entry {
  registration: Registration,
  cell: OnceCell<Option<Instance>>,
}

/// A read-only container built from a [`ServiceCollection`](crate::ServiceCollection).
///
/// The provider is a single root scope: `Singleton` and `Scoped` registrations are each
/// built at most once, even under concurrent resolution, and `Transient` registrations are
/// built on every resolution. Cached values are released when the provider is dropped.
pub struct ServiceProvider {
  entries: Vec<Entry>,
  index: HashMap<ServiceKey, Vec<usize>>,
}

impl ServiceProvider {
  pub(crate) fn new(registrations: Vec<Registration>) -> Self {
    let mut index: HashMap<ServiceKey, Vec<usize>> = HashMap::new();
    let entries = registrations
      .into_iter()
      .enumerate()
      .map(|(position, registration)| {
        index
          .entry(registration.service())
          .or_default()
          .push(position);
        Entry {
          registration,
          cell: OnceCell::new(),
        }
      })
      .collect();
    Self { entries, index }
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn registrations(&self) -> impl Iterator<Item = &Registration> {
    self.entries.iter().map(|entry| &entry.registration)
  }

  /// Resolves a service by type.
  pub fn get<T: ?Sized + Any + Send + Sync>(&self) -> Result<Option<Arc<T>>> {
    get::<T>(self)
  }

  /// Resolves a service by type, failing if it is not registered.
  pub fn get_required<T: ?Sized + Any + Send + Sync>(&self) -> Result<Arc<T>> {
    get_required::<T>(self)
  }

  /// Resolves every registration of a service, in registration order.
  pub fn get_all<T: ?Sized + Any + Send + Sync>(&self) -> Result<Vec<Arc<T>>> {
    get_all::<T>(self)
  }

  fn produce(&self, entry: &Entry) -> Result<Option<Instance>> {
    if entry.registration.lifetime().is_cached() {
      entry
        .cell
        .get_or_try_init(|| entry.registration.produce(self))
        .cloned()
    } else {
      entry.registration.produce(self)
    }
  }
}

impl Resolver for ServiceProvider {
  fn resolve(&self, key: &ServiceKey) -> Result<Option<Instance>> {
    let Some(&last) = self.index.get(key).and_then(|positions| positions.last()) else {
      return Ok(None);
    };
    let _guard = ResolutionGuard::enter(*key)?;
    self.produce(&self.entries[last])
  }

  fn resolve_all(&self, key: &ServiceKey) -> Result<Vec<Instance>> {
    let Some(positions) = self.index.get(key) else {
      return Ok(Vec::new());
    };
    let _guard = ResolutionGuard::enter(*key)?;
    let mut instances = Vec::with_capacity(positions.len());
    for &position in positions {
      if let Some(instance) = self.produce(&self.entries[position])? {
        instances.push(instance);
      }
    }
    Ok(instances)
  }
}

//! The ordered, mutable list of service registrations.

use crate::container::{Resolver, ServiceProvider};
use crate::core::ServiceKey;
use crate::lifetime::Lifetime;
use crate::registration::{Injectable, Registration};
use std::any::Any;
use std::ops::Index;
use std::sync::Arc;

/// An ordered list of [`Registration`]s.
///
/// Order matters: when a service has several registrations, single resolution returns the
/// last one and multi-resolution returns all of them in registration order.
///
/// Registration helpers return `&mut Self` so calls can be chained. Call
/// [`ServiceCollection::build`] once configuration is complete.
#[derive(Default, Clone, Debug)]
pub struct ServiceCollection {
  registrations: Vec<Registration>,
}

impl ServiceCollection {
  /// Creates a new, empty `ServiceCollection`.
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.registrations.len()
  }

  pub fn is_empty(&self) -> bool {
    self.registrations.is_empty()
  }

  pub fn get(&self, index: usize) -> Option<&Registration> {
    self.registrations.get(index)
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Registration> {
    self.registrations.iter()
  }

  /// True if any registration has `service` as its service key.
  pub fn contains(&self, service: &ServiceKey) -> bool {
    self.registrations.iter().any(|r| r.service() == *service)
  }

  /// The first registration for `service`.
  pub fn find(&self, service: &ServiceKey) -> Option<&Registration> {
    self.registrations.iter().find(|r| r.service() == *service)
  }

  // --- Raw Registration ---

  pub fn add(&mut self, registration: Registration) -> &mut Self {
    self.registrations.push(registration);
    self
  }

  /// Adds `registration` unless its service key is already registered.
  /// Returns whether it was added.
  pub fn try_add(&mut self, registration: Registration) -> bool {
    if self.contains(&registration.service()) {
      return false;
    }
    self.registrations.push(registration);
    true
  }

  /// Replaces the entry at `index` in place and returns the previous entry,
  /// or `None` if `index` is out of bounds.
  pub fn replace(&mut self, index: usize, registration: Registration) -> Option<Registration> {
    self
      .registrations
      .get_mut(index)
      .map(|slot| std::mem::replace(slot, registration))
  }

  // --- Instance Registration ---
  pub fn add_instance<S: ?Sized + Any + Send + Sync>(&mut self, value: Arc<S>) -> &mut Self {
    self.add(Registration::instance(value))
  }

  // --- Factory Registration ---
  pub fn add_singleton<S: ?Sized + Any + Send + Sync>(
    &mut self,
    factory: impl Fn(&dyn Resolver) -> Arc<S> + Send + Sync + 'static,
  ) -> &mut Self {
    self.add(Registration::factory(Lifetime::Singleton, factory))
  }

  pub fn add_scoped<S: ?Sized + Any + Send + Sync>(
    &mut self,
    factory: impl Fn(&dyn Resolver) -> Arc<S> + Send + Sync + 'static,
  ) -> &mut Self {
    self.add(Registration::factory(Lifetime::Scoped, factory))
  }

  pub fn add_transient<S: ?Sized + Any + Send + Sync>(
    &mut self,
    factory: impl Fn(&dyn Resolver) -> Arc<S> + Send + Sync + 'static,
  ) -> &mut Self {
    self.add(Registration::factory(Lifetime::Transient, factory))
  }

  pub fn add_factory<S: ?Sized + Any + Send + Sync>(
    &mut self,
    lifetime: Lifetime,
    factory: impl Fn(&dyn Resolver) -> crate::Result<Option<Arc<S>>> + Send + Sync + 'static,
  ) -> &mut Self {
    self.add(Registration::optional_factory(lifetime, factory))
  }

  // --- Type Registration ---
  pub fn add_type<S, I>(&mut self, lifetime: Lifetime, cast: fn(Arc<I>) -> Arc<S>) -> &mut Self
  where
    S: ?Sized + Any + Send + Sync,
    I: Injectable,
  {
    self.add(Registration::implementation(lifetime, cast))
  }

  pub fn add_self<I: Injectable>(&mut self, lifetime: Lifetime) -> &mut Self {
    self.add(Registration::of_self::<I>(lifetime))
  }

  /// Finalizes the collection into a read-only provider.
  pub fn build(self) -> ServiceProvider {
    ServiceProvider::new(self.registrations)
  }
}

impl Index<usize> for ServiceCollection {
  type Output = Registration;

  fn index(&self, index: usize) -> &Registration {
    &self.registrations[index]
  }
}

impl<'a> IntoIterator for &'a ServiceCollection {
  type Item = &'a Registration;
  type IntoIter = std::slice::Iter<'a, Registration>;

  fn into_iter(self) -> Self::IntoIter {
    self.registrations.iter()
  }
}

impl Extend<Registration> for ServiceCollection {
  fn extend<T: IntoIterator<Item = Registration>>(&mut self, iter: T) {
    self.registrations.extend(iter);
  }
}

//! Decorator registration.
//!
//! A decorator wraps the existing registrations of a service: resolving the service then
//! produces the original value first and passes it through the decorator. The original
//! implementations stay untouched.
//!
//! Registering a decorator rewrites the [`ServiceCollection`] in place. Every eligible
//! registration of the service is replaced, at the same index, by a registration whose
//! factory builds the original value and hands it to the decorator. Decorating the same
//! service twice stacks the decorators in call order.

use crate::collection::ServiceCollection;
use crate::component::{Component, ComponentType};
use crate::container::Resolver;
use crate::core::{Instance, ServiceKey};
use crate::error::{Error, Result};
use crate::lifetime::Lifetime;
use crate::registration::{Coercion, ImplementationSource, Registration, ServiceFactory};
use parking_lot::RwLock;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Holds the service wrapped by a decorator.
///
/// The slot is assigned by the container after the decorator is resolved, which is why it
/// is writable through a shared reference.
pub struct Wrapped<S: ?Sized> {
  inner: RwLock<Option<Arc<S>>>,
}

impl<S: ?Sized> Wrapped<S> {
  pub fn new() -> Self {
    Self {
      inner: RwLock::new(None),
    }
  }

  /// The wrapped service, once assigned.
  pub fn get(&self) -> Option<Arc<S>> {
    self.inner.read().clone()
  }

  pub fn set(&self, service: Arc<S>) {
    *self.inner.write() = Some(service);
  }

  pub fn is_set(&self) -> bool {
    self.inner.read().is_some()
  }
}

impl<S: ?Sized> Default for Wrapped<S> {
  fn default() -> Self {
    Self::new()
  }
}

impl<S: ?Sized> fmt::Debug for Wrapped<S> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Wrapped").field("is_set", &self.is_set()).finish()
  }
}

/// A type that decorates the service `S`.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use veneer_ioc::{implements, Decorator, Injectable, Lifetime, Resolver, ServiceCollection, Wrapped};
///
/// trait Counter: Send + Sync {
///   fn count(&self) -> u32;
/// }
///
/// struct Fixed;
/// impl Counter for Fixed {
///   fn count(&self) -> u32 {
///     1
///   }
/// }
///
/// #[derive(Default)]
/// struct Doubled {
///   decorated: Wrapped<dyn Counter>,
/// }
/// impl Counter for Doubled {
///   fn count(&self) -> u32 {
///     self.decorated.get().map_or(0, |inner| inner.count() * 2)
///   }
/// }
/// impl Decorator<dyn Counter> for Doubled {
///   fn decorated(&self) -> &Wrapped<dyn Counter> {
///     &self.decorated
///   }
/// }
/// impl Injectable for Doubled {
///   fn inject(_: &dyn Resolver) -> veneer_ioc::Result<Self> {
///     Ok(Self::default())
///   }
/// }
/// implements!(Doubled: dyn Counter);
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton::<dyn Counter>(|_| Arc::new(Fixed));
/// services.add_decorator::<dyn Counter, Doubled>(Lifetime::Transient).unwrap();
///
/// let provider = services.build();
/// assert_eq!(provider.get_required::<dyn Counter>().unwrap().count(), 2);
/// ```
pub trait Decorator<S: ?Sized>: Send + Sync + 'static {
  fn decorated(&self) -> &Wrapped<S>;
}

/// The erased setter of a decorator's wrapped slot for one service.
#[derive(Clone)]
pub struct WrappedSlot {
  service: ServiceKey,
  assign: Arc<dyn Fn(&Instance, &Instance) -> Result<()> + Send + Sync>,
}

impl WrappedSlot {
  pub fn of<S, D>() -> Self
  where
    S: ?Sized + Any + Send + Sync,
    D: Decorator<S>,
  {
    Self {
      service: ServiceKey::of::<S>(),
      assign: Arc::new(|decorator: &Instance, original: &Instance| {
        let decorator = decorator.downcast_as::<D>()?;
        decorator.decorated().set(original.downcast_as::<S>()?);
        Ok(())
      }),
    }
  }

  pub fn service(&self) -> ServiceKey {
    self.service
  }

  fn assign(&self, decorator: &Instance, original: &Instance) -> Result<()> {
    (self.assign)(decorator, original)
  }
}

impl fmt::Debug for WrappedSlot {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "WrappedSlot({})", self.service)
  }
}

/// Describes a decorator type for [`ServiceCollection::add_decorator_type`]: the type itself
/// plus the wrapped slots it exposes.
#[derive(Clone, Debug)]
pub struct DecoratorType {
  component: ComponentType,
  slots: Vec<WrappedSlot>,
}

impl DecoratorType {
  /// A decorator type without any slot yet.
  pub fn new(component: ComponentType) -> Self {
    Self {
      component,
      slots: Vec::new(),
    }
  }

  pub fn of<D: Component>() -> Self {
    Self::new(ComponentType::of::<D>())
  }

  /// `D` decorating `S`, with its slot for `S`.
  pub fn for_service<S, D>() -> Self
  where
    S: ?Sized + Any + Send + Sync,
    D: Component + Decorator<S>,
  {
    Self::of::<D>().with_slot(WrappedSlot::of::<S, D>())
  }

  pub fn with_slot(mut self, slot: WrappedSlot) -> Self {
    self.slots.push(slot);
    self
  }

  pub fn key(&self) -> ServiceKey {
    self.component.key()
  }

  pub fn slot(&self, service: &ServiceKey) -> Option<&WrappedSlot> {
    self.slots.iter().find(|slot| slot.service == *service)
  }

  /// Checks that this type can decorate `service`. Returns the decorator's coercion into
  /// the service type and its slot for it.
  fn validate(&self, service: ServiceKey) -> Result<(Coercion, WrappedSlot)> {
    let decorator = self.component.key();
    if self.component.is_abstract() {
      return Err(Error::AbstractType {
        type_name: decorator.type_name(),
      });
    }
    if !self.component.is_assignable_to(&service) {
      return Err(Error::NotAssignable {
        service: service.type_name(),
        decorator: decorator.type_name(),
      });
    }
    if decorator == service {
      return Err(Error::SameType {
        service: service.type_name(),
      });
    }
    let slot = self.slot(&service).ok_or(Error::MissingDecoratedSlot {
      service: service.type_name(),
      decorator: decorator.type_name(),
    })?;
    let coercion = self
      .component
      .interface(&service)
      .map(|interface| interface.coercion())
      .ok_or(Error::NotAssignable {
        service: service.type_name(),
        decorator: decorator.type_name(),
      })?;
    Ok((coercion, slot.clone()))
  }
}

// Turns an original value into the decorated one.
type Initializer = Arc<dyn Fn(&dyn Resolver, Instance) -> Result<Option<Instance>> + Send + Sync>;

/// Whether a decorator living for `decorator_lifetime` may wrap `entry` as `service`.
pub(crate) fn can_decorate(decorator_lifetime: Lifetime, entry: &Registration, service: ServiceKey) -> bool {
  if entry.service() != service {
    return false;
  }
  // Resolving a self-registered type would yield the decorated service, not the original.
  if entry.implementation_key() == Some(service) {
    return false;
  }
  // A wrapper must not outlive what it wraps.
  match decorator_lifetime {
    Lifetime::Transient => true,
    Lifetime::Scoped => entry.lifetime() != Lifetime::Transient,
    Lifetime::Singleton => entry.lifetime() == Lifetime::Singleton,
  }
}

/// Builds the factory replacing `entry`: it produces the original value and passes it to
/// `initializer`. May append a self-registration of `entry`'s implementation type.
fn decorator_factory(
  services: &mut ServiceCollection,
  entry: &Registration,
  initializer: Initializer,
) -> ServiceFactory {
  match entry.source() {
    ImplementationSource::Instance(instance) => {
      let instance = instance.clone();
      Arc::new(move |resolver: &dyn Resolver| initializer(resolver, instance.clone()))
    }
    ImplementationSource::Factory(original) => {
      let original = original.clone();
      Arc::new(move |resolver: &dyn Resolver| match original(resolver)? {
        Some(instance) => initializer(resolver, instance),
        None => Ok(None),
      })
    }
    ImplementationSource::Type(implementation) => {
      let key = implementation.key();
      if !services.contains(&key) {
        tracing::debug!(
          implementation = key.type_name(),
          lifetime = %entry.lifetime(),
          "registering implementation type against itself"
        );
        services.add(Registration::new(
          key,
          ImplementationSource::Type(implementation.as_self()),
          entry.lifetime(),
        ));
      }
      let implementation = implementation.clone();
      Arc::new(move |resolver: &dyn Resolver| match resolver.resolve(&key)? {
        Some(raw) => initializer(resolver, implementation.coerce(&raw)?),
        None => Ok(None),
      })
    }
  }
}

impl ServiceCollection {
  // Single forward pass. Appends never match `service`, so indices stay stable.
  fn decorate_registrations(
    &mut self,
    service: ServiceKey,
    decorator_lifetime: Lifetime,
    initializer: Initializer,
  ) -> usize {
    let mut decorated = 0;
    let mut index = 0;
    while index < self.len() {
      let entry = &self[index];
      if can_decorate(decorator_lifetime, entry, service) {
        let entry = entry.clone();
        let factory = decorator_factory(self, &entry, initializer.clone());
        self.replace(
          index,
          Registration::new(service, ImplementationSource::Factory(factory), decorator_lifetime),
        );
        decorated += 1;
      } else if entry.service() == service {
        tracing::trace!(
          service = service.type_name(),
          index,
          lifetime = %entry.lifetime(),
          %decorator_lifetime,
          "registration not eligible for decoration"
        );
      }
      index += 1;
    }
    tracing::debug!(
      service = service.type_name(),
      decorated,
      %decorator_lifetime,
      "decorated registrations"
    );
    decorated
  }

  /// Decorates every eligible registration of `S` with the decorator type `D`.
  ///
  /// `D` is registered as a transient service if it has no registration yet. If it has one,
  /// that registration's lifetime is the decorator's lifetime and `lifetime` is ignored.
  ///
  /// A registration is eligible if it lives at least as long as the decorator: a transient
  /// decorator wraps everything, a scoped one wraps scoped and singleton registrations, a
  /// singleton one only singletons. Ineligible registrations are left unchanged.
  pub fn add_decorator<S, D>(&mut self, lifetime: Lifetime) -> Result<&mut Self>
  where
    S: ?Sized + Any + Send + Sync,
    D: Component + Decorator<S>,
  {
    self.add_decorator_type(ServiceKey::of::<S>(), DecoratorType::for_service::<S, D>(), lifetime)
  }

  /// The erased form of [`add_decorator`](Self::add_decorator).
  ///
  /// # Errors
  ///
  /// Fails without modifying the collection if the decorator type is abstract, does not
  /// implement `service`, is `service` itself, or has no wrapped slot for `service`.
  pub fn add_decorator_type(
    &mut self,
    service: ServiceKey,
    decorator: DecoratorType,
    lifetime: Lifetime,
  ) -> Result<&mut Self> {
    let (coercion, slot) = decorator.validate(service)?;
    let decorator_key = decorator.key();

    let decorator_lifetime = match self.find(&decorator_key) {
      Some(existing) => existing.lifetime(),
      None => {
        let implementation =
          decorator
            .component
            .self_implementation()
            .ok_or(Error::AbstractType {
              type_name: decorator_key.type_name(),
            })?;
        tracing::debug!(
          decorator = decorator_key.type_name(),
          "registering decorator type as transient"
        );
        self.add(Registration::new(
          decorator_key,
          ImplementationSource::Type(implementation),
          Lifetime::Transient,
        ));
        lifetime
      }
    };

    let initializer: Initializer = Arc::new(move |resolver: &dyn Resolver, original: Instance| {
      let instance = resolver.resolve_required(&decorator_key)?;
      slot.assign(&instance, &original)?;
      coercion(&instance).map(Some)
    });
    self.decorate_registrations(service, decorator_lifetime, initializer);
    Ok(self)
  }

  /// Decorates every eligible registration of `S` with the value returned by `decorate`,
  /// which receives the original value.
  pub fn add_decorator_fn<S, F>(&mut self, lifetime: Lifetime, decorate: F) -> &mut Self
  where
    S: ?Sized + Any + Send + Sync,
    F: Fn(&dyn Resolver, Arc<S>) -> Arc<S> + Send + Sync + 'static,
  {
    let initializer: Initializer = Arc::new(move |resolver: &dyn Resolver, original: Instance| {
      let original = original.downcast_as::<S>()?;
      Ok(Some(Instance::new(decorate(resolver, original))))
    });
    self.decorate_registrations(ServiceKey::of::<S>(), lifetime, initializer);
    self
  }

  /// The erased form of [`add_decorator_fn`](Self::add_decorator_fn). `decorate` must
  /// return a value of the service type.
  pub fn add_decorator_factory<F>(&mut self, service: ServiceKey, lifetime: Lifetime, decorate: F) -> &mut Self
  where
    F: Fn(&dyn Resolver, Instance) -> Result<Instance> + Send + Sync + 'static,
  {
    let initializer: Initializer = Arc::new(move |resolver: &dyn Resolver, original: Instance| {
      decorate(resolver, original).map(Some)
    });
    self.decorate_registrations(service, lifetime, initializer);
    self
  }
}

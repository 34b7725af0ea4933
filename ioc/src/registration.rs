//! Service registrations and their implementation sources.

use crate::container::Resolver;
use crate::core::{Instance, ServiceKey};
use crate::error::Result;
use crate::lifetime::Lifetime;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A factory producing a service value. `Ok(None)` is an absent value, not an error.
pub type ServiceFactory = Arc<dyn Fn(&dyn Resolver) -> Result<Option<Instance>> + Send + Sync>;

pub(crate) type Activator = Arc<dyn Fn(&dyn Resolver) -> Result<Instance> + Send + Sync>;

// Turns an erased `Arc<Impl>` into an erased `Arc<Service>`.
pub(crate) type Coercion = Arc<dyn Fn(&Instance) -> Result<Instance> + Send + Sync>;

/// A type the container can build on its own, resolving whatever it depends on.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use veneer_ioc::{Injectable, Lifetime, Resolver, ServiceCollection};
///
/// struct Clock;
/// impl Injectable for Clock {
///   fn inject(_: &dyn Resolver) -> veneer_ioc::Result<Self> {
///     Ok(Clock)
///   }
/// }
///
/// struct Scheduler {
///   clock: Arc<Clock>,
/// }
/// impl Injectable for Scheduler {
///   fn inject(resolver: &dyn Resolver) -> veneer_ioc::Result<Self> {
///     Ok(Scheduler { clock: resolver.get_required::<Clock>()? })
///   }
/// }
///
/// let mut services = ServiceCollection::new();
/// services.add_self::<Clock>(Lifetime::Singleton);
/// services.add_self::<Scheduler>(Lifetime::Transient);
///
/// let provider = services.build();
/// let scheduler = provider.get_required::<Scheduler>().unwrap();
/// assert!(Arc::ptr_eq(&scheduler.clock, &provider.get_required::<Clock>().unwrap()));
/// ```
pub trait Injectable: Sized + Send + Sync + 'static {
  fn inject(resolver: &dyn Resolver) -> Result<Self>;
}

pub(crate) fn activator<I: Injectable>() -> Activator {
  Arc::new(|resolver: &dyn Resolver| I::inject(resolver).map(|value| Instance::new(Arc::new(value))))
}

pub(crate) fn coercion<I, S>(cast: fn(Arc<I>) -> Arc<S>) -> Coercion
where
  I: Any + Send + Sync,
  S: ?Sized + Any + Send + Sync,
{
  Arc::new(move |raw: &Instance| raw.downcast_as::<I>().map(|this| Instance::new(cast(this))))
}

pub(crate) fn identity() -> Coercion {
  Arc::new(|raw: &Instance| Ok(raw.clone()))
}

/// A concrete implementation type bound to a service.
///
/// Activation builds the implementation through its [`Injectable`] constructor and then
/// coerces it to the service type it is registered under.
#[derive(Clone)]
pub struct ImplementationType {
  key: ServiceKey,
  activator: Activator,
  coercion: Coercion,
}

impl ImplementationType {
  /// `I` implementing itself.
  pub fn of<I: Injectable>() -> Self {
    Self::from_parts(ServiceKey::of::<I>(), activator::<I>(), identity())
  }

  /// `I` implementing the service `S`. `cast` is usually `|this| this as Arc<dyn Trait>`.
  pub fn coerced<S, I>(cast: fn(Arc<I>) -> Arc<S>) -> Self
  where
    S: ?Sized + Any + Send + Sync,
    I: Injectable,
  {
    Self::from_parts(ServiceKey::of::<I>(), activator::<I>(), coercion(cast))
  }

  pub(crate) fn from_parts(key: ServiceKey, activator: Activator, coercion: Coercion) -> Self {
    Self {
      key,
      activator,
      coercion,
    }
  }

  /// The key of the implementation type itself.
  pub fn key(&self) -> ServiceKey {
    self.key
  }

  /// The same implementation, registered against itself.
  pub(crate) fn as_self(&self) -> Self {
    Self::from_parts(self.key, self.activator.clone(), identity())
  }

  /// Converts a value resolved under the implementation key into the service type.
  pub(crate) fn coerce(&self, raw: &Instance) -> Result<Instance> {
    (self.coercion)(raw)
  }

  pub(crate) fn activate(&self, resolver: &dyn Resolver) -> Result<Instance> {
    let raw = (self.activator)(resolver)?;
    self.coerce(&raw)
  }
}

impl fmt::Debug for ImplementationType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "ImplementationType({})", self.key)
  }
}

/// Where a registration gets its value from.
#[derive(Clone)]
pub enum ImplementationSource {
  /// A pre-built value.
  Instance(Instance),
  /// A factory invoked with the resolver.
  Factory(ServiceFactory),
  /// A concrete type built by the container.
  Type(ImplementationType),
}

impl fmt::Debug for ImplementationSource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ImplementationSource::Instance(instance) => write!(f, "Instance({})", instance.type_name()),
      ImplementationSource::Factory(_) => write!(f, "Factory(<factory_fn>)"),
      ImplementationSource::Type(implementation) => write!(f, "Type({})", implementation.key()),
    }
  }
}

/// One entry of a [`ServiceCollection`](crate::ServiceCollection).
#[derive(Clone, Debug)]
pub struct Registration {
  service: ServiceKey,
  source: ImplementationSource,
  lifetime: Lifetime,
}

impl Registration {
  pub fn new(service: ServiceKey, source: ImplementationSource, lifetime: Lifetime) -> Self {
    Self {
      service,
      source,
      lifetime,
    }
  }

  /// A pre-built value. Instances are always singletons.
  pub fn instance<S: ?Sized + Any + Send + Sync>(value: Arc<S>) -> Self {
    Self::new(
      ServiceKey::of::<S>(),
      ImplementationSource::Instance(Instance::new(value)),
      Lifetime::Singleton,
    )
  }

  pub fn factory<S, F>(lifetime: Lifetime, factory: F) -> Self
  where
    S: ?Sized + Any + Send + Sync,
    F: Fn(&dyn Resolver) -> Arc<S> + Send + Sync + 'static,
  {
    let factory: ServiceFactory =
      Arc::new(move |resolver: &dyn Resolver| Ok(Some(Instance::new(factory(resolver)))));
    Self::new(ServiceKey::of::<S>(), ImplementationSource::Factory(factory), lifetime)
  }

  /// A factory that may fail, or produce no value at all.
  pub fn optional_factory<S, F>(lifetime: Lifetime, factory: F) -> Self
  where
    S: ?Sized + Any + Send + Sync,
    F: Fn(&dyn Resolver) -> Result<Option<Arc<S>>> + Send + Sync + 'static,
  {
    let factory: ServiceFactory = Arc::new(move |resolver: &dyn Resolver| {
      factory(resolver).map(|value| value.map(Instance::new))
    });
    Self::new(ServiceKey::of::<S>(), ImplementationSource::Factory(factory), lifetime)
  }

  pub fn implementation<S, I>(lifetime: Lifetime, cast: fn(Arc<I>) -> Arc<S>) -> Self
  where
    S: ?Sized + Any + Send + Sync,
    I: Injectable,
  {
    Self::new(
      ServiceKey::of::<S>(),
      ImplementationSource::Type(ImplementationType::coerced(cast)),
      lifetime,
    )
  }

  /// `I` registered against itself.
  pub fn of_self<I: Injectable>(lifetime: Lifetime) -> Self {
    Self::new(
      ServiceKey::of::<I>(),
      ImplementationSource::Type(ImplementationType::of::<I>()),
      lifetime,
    )
  }

  pub fn service(&self) -> ServiceKey {
    self.service
  }

  pub fn source(&self) -> &ImplementationSource {
    &self.source
  }

  pub fn lifetime(&self) -> Lifetime {
    self.lifetime
  }

  /// The implementation key of a type-backed registration.
  pub fn implementation_key(&self) -> Option<ServiceKey> {
    match &self.source {
      ImplementationSource::Type(implementation) => Some(implementation.key()),
      _ => None,
    }
  }

  /// Produces a fresh value, ignoring the lifetime.
  pub(crate) fn produce(&self, resolver: &dyn Resolver) -> Result<Option<Instance>> {
    match &self.source {
      ImplementationSource::Instance(instance) => Ok(Some(instance.clone())),
      ImplementationSource::Factory(factory) => factory(resolver),
      ImplementationSource::Type(implementation) => implementation.activate(resolver).map(Some),
    }
  }
}

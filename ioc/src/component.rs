//! Declared interfaces of concrete types.
//!
//! Rust has no runtime reflection over the traits a type implements, so a type lists its
//! service interfaces explicitly by implementing [`Component`], usually through the
//! [`implements!`](crate::implements) macro. [`ComponentType`] is the erased form of that
//! declaration and [`TypeCatalog`] an explicit list of them.

use crate::core::ServiceKey;
use crate::registration::{activator, coercion, identity, Activator, Coercion, ImplementationType};
use crate::registration::Injectable;
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Marker for types that release resources on drop.
///
/// Bulk interface registration never registers a type against `dyn Disposable`.
pub trait Disposable: Send + Sync {}

/// One service interface implemented by `T`.
pub struct Interface<T> {
  key: ServiceKey,
  coercion: Coercion,
  _marker: PhantomData<fn() -> T>,
}

impl<T: Injectable> Interface<T> {
  /// `cast` converts `Arc<T>` into the interface, e.g. `|this| this as Arc<dyn Greeter>`.
  pub fn new<S: ?Sized + Any + Send + Sync>(cast: fn(Arc<T>) -> Arc<S>) -> Self {
    Self {
      key: ServiceKey::of::<S>(),
      coercion: coercion(cast),
      _marker: PhantomData,
    }
  }

  pub fn key(&self) -> ServiceKey {
    self.key
  }
}

/// A concrete type together with the interfaces it implements.
pub trait Component: Injectable {
  fn interfaces() -> Vec<Interface<Self>>;
}

/// An interface entry of a [`ComponentType`].
#[derive(Clone)]
pub struct InterfaceType {
  key: ServiceKey,
  coercion: Coercion,
}

impl InterfaceType {
  pub fn key(&self) -> ServiceKey {
    self.key
  }

  pub(crate) fn coercion(&self) -> Coercion {
    self.coercion.clone()
  }
}

impl fmt::Debug for InterfaceType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "InterfaceType({})", self.key)
  }
}

/// The erased description of a type: its key, how to build it, and what it implements.
///
/// A type without an activator is abstract and cannot be registered.
#[derive(Clone)]
pub struct ComponentType {
  key: ServiceKey,
  activator: Option<Activator>,
  interfaces: Vec<InterfaceType>,
}

impl ComponentType {
  pub fn of<T: Component>() -> Self {
    Self {
      key: ServiceKey::of::<T>(),
      activator: Some(activator::<T>()),
      interfaces: T::interfaces()
        .into_iter()
        .map(|interface| InterfaceType {
          key: interface.key,
          coercion: interface.coercion,
        })
        .collect(),
    }
  }

  /// A type that cannot be instantiated, such as a trait object type.
  pub fn abstract_type<T: ?Sized + Any>() -> Self {
    Self {
      key: ServiceKey::of::<T>(),
      activator: None,
      interfaces: Vec::new(),
    }
  }

  pub fn key(&self) -> ServiceKey {
    self.key
  }

  pub fn is_abstract(&self) -> bool {
    self.activator.is_none()
  }

  pub fn interfaces(&self) -> &[InterfaceType] {
    &self.interfaces
  }

  pub fn interface(&self, key: &ServiceKey) -> Option<&InterfaceType> {
    self.interfaces.iter().find(|interface| interface.key == *key)
  }

  /// True if a value of this type can be used as `service`.
  pub fn is_assignable_to(&self, service: &ServiceKey) -> bool {
    self.key == *service || self.interface(service).is_some()
  }

  /// This type registered against itself.
  pub(crate) fn self_implementation(&self) -> Option<ImplementationType> {
    let activator = self.activator.clone()?;
    Some(ImplementationType::from_parts(self.key, activator, identity()))
  }

  /// This type registered against one of its interfaces.
  pub(crate) fn implementation_for(&self, interface: &InterfaceType) -> Option<ImplementationType> {
    let activator = self.activator.clone()?;
    Some(ImplementationType::from_parts(
      self.key,
      activator,
      interface.coercion(),
    ))
  }
}

impl fmt::Debug for ComponentType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ComponentType")
      .field("key", &self.key)
      .field("is_abstract", &self.is_abstract())
      .field("interfaces", &self.interfaces)
      .finish()
  }
}

/// An explicit list of types, the unit that [`ServiceCollection::add_catalog`] registers.
///
/// [`ServiceCollection::add_catalog`]: crate::ServiceCollection::add_catalog
#[derive(Clone, Default, Debug)]
pub struct TypeCatalog {
  types: Vec<ComponentType>,
}

impl TypeCatalog {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with<T: Component>(mut self) -> Self {
    self.types.push(ComponentType::of::<T>());
    self
  }

  pub fn with_abstract<T: ?Sized + Any>(mut self) -> Self {
    self.types.push(ComponentType::abstract_type::<T>());
    self
  }

  pub fn push(&mut self, component: ComponentType) {
    self.types.push(component);
  }

  pub fn iter(&self) -> std::slice::Iter<'_, ComponentType> {
    self.types.iter()
  }

  pub fn len(&self) -> usize {
    self.types.len()
  }

  pub fn is_empty(&self) -> bool {
    self.types.is_empty()
  }
}

impl<'a> IntoIterator for &'a TypeCatalog {
  type Item = &'a ComponentType;
  type IntoIter = std::slice::Iter<'a, ComponentType>;

  fn into_iter(self) -> Self::IntoIter {
    self.types.iter()
  }
}

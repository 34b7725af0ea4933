//! Bulk registration of a type against the interfaces it implements.

use crate::collection::ServiceCollection;
use crate::component::{Component, ComponentType, Disposable};
use crate::core::ServiceKey;
use crate::error::{Error, Result};
use crate::lifetime::Lifetime;
use crate::registration::{ImplementationSource, Registration};

fn ensure_concrete(component: &ComponentType) -> Result<()> {
  if component.is_abstract() {
    return Err(Error::AbstractType {
      type_name: component.key().type_name(),
    });
  }
  Ok(())
}

/// One registration per implemented interface, skipping the disposal marker.
fn interface_registrations(component: &ComponentType, lifetime: Lifetime) -> Result<Vec<Registration>> {
  ensure_concrete(component)?;
  let disposable = ServiceKey::of::<dyn Disposable>();
  let mut registrations = Vec::with_capacity(component.interfaces().len());
  for interface in component.interfaces() {
    if interface.key() == disposable {
      continue;
    }
    let implementation = component
      .implementation_for(interface)
      .ok_or(Error::AbstractType {
        type_name: component.key().type_name(),
      })?;
    registrations.push(Registration::new(
      interface.key(),
      ImplementationSource::Type(implementation),
      lifetime,
    ));
  }
  Ok(registrations)
}

fn self_registration(component: &ComponentType, lifetime: Lifetime) -> Result<Registration> {
  let implementation = component
    .self_implementation()
    .ok_or(Error::AbstractType {
      type_name: component.key().type_name(),
    })?;
  Ok(Registration::new(
    component.key(),
    ImplementationSource::Type(implementation),
    lifetime,
  ))
}

impl ServiceCollection {
  /// Registers `T` against each interface it implements.
  pub fn add_implemented_interfaces<T: Component>(&mut self, lifetime: Lifetime) -> Result<&mut Self> {
    self.add_implemented_interfaces_of(&ComponentType::of::<T>(), lifetime)
  }

  pub fn add_implemented_interfaces_of(
    &mut self,
    component: &ComponentType,
    lifetime: Lifetime,
  ) -> Result<&mut Self> {
    let registrations = interface_registrations(component, lifetime)?;
    tracing::debug!(
      implementation = component.key().type_name(),
      count = registrations.len(),
      %lifetime,
      "registering implemented interfaces"
    );
    self.extend(registrations);
    Ok(self)
  }

  /// Like [`add_implemented_interfaces`](Self::add_implemented_interfaces), but skips every
  /// interface that already has a registration.
  pub fn try_add_implemented_interfaces<T: Component>(
    &mut self,
    lifetime: Lifetime,
  ) -> Result<&mut Self> {
    self.try_add_implemented_interfaces_of(&ComponentType::of::<T>(), lifetime)
  }

  pub fn try_add_implemented_interfaces_of(
    &mut self,
    component: &ComponentType,
    lifetime: Lifetime,
  ) -> Result<&mut Self> {
    for registration in interface_registrations(component, lifetime)? {
      let service = registration.service();
      if !self.try_add(registration) {
        tracing::trace!(
          service = service.type_name(),
          implementation = component.key().type_name(),
          "interface already registered, skipping"
        );
      }
    }
    Ok(self)
  }

  /// Registers `T` against itself and against each interface it implements.
  pub fn add_self_and_implemented_interfaces<T: Component>(
    &mut self,
    lifetime: Lifetime,
  ) -> Result<&mut Self> {
    self.add_self_and_implemented_interfaces_of(&ComponentType::of::<T>(), lifetime)
  }

  pub fn add_self_and_implemented_interfaces_of(
    &mut self,
    component: &ComponentType,
    lifetime: Lifetime,
  ) -> Result<&mut Self> {
    let registration = self_registration(component, lifetime)?;
    self.add(registration);
    self.add_implemented_interfaces_of(component, lifetime)
  }

  pub fn try_add_self_and_implemented_interfaces<T: Component>(
    &mut self,
    lifetime: Lifetime,
  ) -> Result<&mut Self> {
    self.try_add_self_and_implemented_interfaces_of(&ComponentType::of::<T>(), lifetime)
  }

  pub fn try_add_self_and_implemented_interfaces_of(
    &mut self,
    component: &ComponentType,
    lifetime: Lifetime,
  ) -> Result<&mut Self> {
    let registration = self_registration(component, lifetime)?;
    self.try_add(registration);
    self.try_add_implemented_interfaces_of(component, lifetime)
  }

  /// Registers every concrete type of `catalog` against itself and its interfaces.
  /// Abstract types are skipped.
  pub fn add_catalog(
    &mut self,
    catalog: &crate::TypeCatalog,
    lifetime: Lifetime,
  ) -> Result<&mut Self> {
    self.add_catalog_filtered(catalog, lifetime, |_| true)
  }

  /// Like [`add_catalog`](Self::add_catalog), restricted to the types matching `predicate`.
  pub fn add_catalog_filtered(
    &mut self,
    catalog: &crate::TypeCatalog,
    lifetime: Lifetime,
    predicate: impl Fn(&ComponentType) -> bool,
  ) -> Result<&mut Self> {
    for component in catalog {
      if !component.is_abstract() && predicate(component) {
        self.add_self_and_implemented_interfaces_of(component, lifetime)?;
      }
    }
    Ok(self)
  }
}

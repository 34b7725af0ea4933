use pretty_assertions::assert_eq;
use std::sync::Arc;
use veneer_ioc::{
  implements, ComponentType, Disposable, Error, Injectable, Lifetime, Resolver, ServiceCollection,
  ServiceKey, TypeCatalog,
};

// --- Test Fixtures ---

trait HelloService: Send + Sync {
  fn say_hello(&self, name: &str) -> String;
}

trait Farewell: Send + Sync {
  fn say_goodbye(&self, name: &str) -> String;
}

struct EnglishHello;
impl HelloService for EnglishHello {
  fn say_hello(&self, name: &str) -> String {
    format!("Hello {}.", name)
  }
}
impl Disposable for EnglishHello {}
impl Injectable for EnglishHello {
  fn inject(_: &dyn Resolver) -> veneer_ioc::Result<Self> {
    Ok(EnglishHello)
  }
}
implements!(EnglishHello: dyn HelloService, dyn Disposable);

struct FrenchHello;
impl HelloService for FrenchHello {
  fn say_hello(&self, name: &str) -> String {
    format!("Bonjour {}.", name)
  }
}
impl Farewell for FrenchHello {
  fn say_goodbye(&self, name: &str) -> String {
    format!("Au revoir {}.", name)
  }
}
impl Injectable for FrenchHello {
  fn inject(_: &dyn Resolver) -> veneer_ioc::Result<Self> {
    Ok(FrenchHello)
  }
}
implements!(FrenchHello: dyn HelloService, dyn Farewell);

fn has_registration<S: ?Sized + 'static, I: 'static>(services: &ServiceCollection, lifetime: Lifetime) -> bool {
  services.iter().any(|r| {
    r.service() == ServiceKey::of::<S>()
      && r.implementation_key() == Some(ServiceKey::of::<I>())
      && r.lifetime() == lifetime
  })
}

// --- Implemented Interfaces ---

#[test]
fn test_add_implemented_interfaces() {
  // Arrange
  let mut services = ServiceCollection::new();

  // Act
  services
    .add_implemented_interfaces::<EnglishHello>(Lifetime::Scoped)
    .unwrap();

  // Assert
  assert!(has_registration::<dyn HelloService, EnglishHello>(&services, Lifetime::Scoped));
  // The disposal marker is never registered as a service.
  assert!(!services.contains(&ServiceKey::of::<dyn Disposable>()));
  assert_eq!(services.len(), 1);
}

#[test]
fn test_add_implemented_interfaces_registers_every_interface() {
  // Arrange
  let mut services = ServiceCollection::new();

  // Act
  services
    .add_implemented_interfaces::<FrenchHello>(Lifetime::Singleton)
    .unwrap();

  // Assert
  assert_eq!(services.len(), 2);
  assert!(has_registration::<dyn HelloService, FrenchHello>(&services, Lifetime::Singleton));
  assert!(has_registration::<dyn Farewell, FrenchHello>(&services, Lifetime::Singleton));

  let provider = services.build();
  assert_eq!(
    provider.get_required::<dyn HelloService>().unwrap().say_hello("world"),
    "Bonjour world."
  );
  assert_eq!(
    provider.get_required::<dyn Farewell>().unwrap().say_goodbye("world"),
    "Au revoir world."
  );
}

#[test]
fn test_add_implemented_interfaces_appends_duplicates() {
  // Arrange
  let mut services = ServiceCollection::new();

  // Act
  services
    .add_implemented_interfaces::<EnglishHello>(Lifetime::Scoped)
    .unwrap()
    .add_implemented_interfaces::<EnglishHello>(Lifetime::Scoped)
    .unwrap();

  // Assert
  assert_eq!(services.len(), 2);
}

#[test]
fn test_try_add_implemented_interfaces() {
  // Arrange
  let mut services = ServiceCollection::new();

  // Act
  services
    .try_add_implemented_interfaces::<EnglishHello>(Lifetime::Scoped)
    .unwrap();
  assert!(has_registration::<dyn HelloService, EnglishHello>(&services, Lifetime::Scoped));
  services
    .try_add_implemented_interfaces::<EnglishHello>(Lifetime::Scoped)
    .unwrap();

  // Assert
  assert_eq!(services.len(), 1);
}

#[test]
fn test_try_add_skips_only_registered_interfaces() {
  // Arrange
  let mut services = ServiceCollection::new();
  services
    .add_implemented_interfaces::<EnglishHello>(Lifetime::Scoped)
    .unwrap();

  // Act
  services
    .try_add_implemented_interfaces::<FrenchHello>(Lifetime::Transient)
    .unwrap();

  // Assert
  assert_eq!(services.len(), 2);
  assert!(has_registration::<dyn HelloService, EnglishHello>(&services, Lifetime::Scoped));
  assert!(!has_registration::<dyn HelloService, FrenchHello>(&services, Lifetime::Transient));
  assert!(has_registration::<dyn Farewell, FrenchHello>(&services, Lifetime::Transient));
}

#[test]
fn test_erased_add_implemented_interfaces() {
  // Arrange
  let mut services = ServiceCollection::new();
  let component = ComponentType::of::<EnglishHello>();

  // Act
  services
    .add_implemented_interfaces_of(&component, Lifetime::Scoped)
    .unwrap();

  // Assert
  assert!(has_registration::<dyn HelloService, EnglishHello>(&services, Lifetime::Scoped));
}

#[test]
fn test_erased_try_add_implemented_interfaces() {
  // Arrange
  let mut services = ServiceCollection::new();
  let component = ComponentType::of::<EnglishHello>();

  // Act
  services
    .try_add_implemented_interfaces_of(&component, Lifetime::Scoped)
    .unwrap();
  services
    .try_add_implemented_interfaces_of(&component, Lifetime::Scoped)
    .unwrap();

  // Assert
  assert!(has_registration::<dyn HelloService, EnglishHello>(&services, Lifetime::Scoped));
  assert_eq!(services.len(), 1);
}

#[test]
fn test_erased_abstract_type_is_rejected() {
  // Arrange
  let mut services = ServiceCollection::new();
  let component = ComponentType::abstract_type::<dyn HelloService>();

  // Act
  let result = services.add_implemented_interfaces_of(&component, Lifetime::Scoped);

  // Assert
  assert!(matches!(result, Err(Error::AbstractType { .. })));
  assert!(services.is_empty());
}

// --- Self and Implemented Interfaces ---

#[test]
fn test_add_self_and_implemented_interfaces() {
  // Arrange
  let mut services = ServiceCollection::new();

  // Act
  services
    .add_self_and_implemented_interfaces::<EnglishHello>(Lifetime::Scoped)
    .unwrap();

  // Assert
  assert!(has_registration::<dyn HelloService, EnglishHello>(&services, Lifetime::Scoped));
  assert!(has_registration::<EnglishHello, EnglishHello>(&services, Lifetime::Scoped));
  assert_eq!(services.len(), 2);
}

#[test]
fn test_try_add_self_and_implemented_interfaces() {
  // Arrange
  let mut services = ServiceCollection::new();

  // Act
  services
    .try_add_self_and_implemented_interfaces::<EnglishHello>(Lifetime::Scoped)
    .unwrap();
  assert!(has_registration::<dyn HelloService, EnglishHello>(&services, Lifetime::Scoped));
  assert!(has_registration::<EnglishHello, EnglishHello>(&services, Lifetime::Scoped));
  services
    .try_add_implemented_interfaces::<EnglishHello>(Lifetime::Scoped)
    .unwrap();
  services
    .try_add_self_and_implemented_interfaces::<EnglishHello>(Lifetime::Scoped)
    .unwrap();

  // Assert
  assert_eq!(services.len(), 2);
}

#[test]
fn test_erased_add_self_and_implemented_interfaces() {
  // Arrange
  let mut services = ServiceCollection::new();
  let component = ComponentType::of::<EnglishHello>();

  // Act
  services
    .add_self_and_implemented_interfaces_of(&component, Lifetime::Scoped)
    .unwrap();

  // Assert
  assert!(has_registration::<dyn HelloService, EnglishHello>(&services, Lifetime::Scoped));
  assert!(has_registration::<EnglishHello, EnglishHello>(&services, Lifetime::Scoped));
}

#[test]
fn test_erased_try_add_self_and_implemented_interfaces() {
  // Arrange
  let mut services = ServiceCollection::new();
  let component = ComponentType::of::<EnglishHello>();

  // Act
  services
    .try_add_self_and_implemented_interfaces_of(&component, Lifetime::Scoped)
    .unwrap();
  services
    .try_add_implemented_interfaces_of(&component, Lifetime::Scoped)
    .unwrap();

  // Assert
  assert_eq!(services.len(), 2);
}

#[test]
fn test_self_and_interfaces_share_a_singleton_per_registration() {
  // Arrange
  let mut services = ServiceCollection::new();
  services
    .add_self_and_implemented_interfaces::<FrenchHello>(Lifetime::Singleton)
    .unwrap();
  let provider = services.build();

  // Act
  let concrete: Arc<FrenchHello> = provider.get_required::<FrenchHello>().unwrap();
  let again = provider.get_required::<FrenchHello>().unwrap();
  let hello = provider.get_required::<dyn HelloService>().unwrap();

  // Assert
  assert!(Arc::ptr_eq(&concrete, &again));
  assert_eq!(concrete.say_goodbye("world"), "Au revoir world.");
  assert_eq!(hello.say_hello("world"), "Bonjour world.");
}

// --- Catalogs ---

#[test]
fn test_add_catalog_with_predicate() {
  // Arrange
  let mut services = ServiceCollection::new();
  let catalog = TypeCatalog::new()
    .with::<EnglishHello>()
    .with::<FrenchHello>()
    .with_abstract::<dyn HelloService>();

  // Act
  services
    .add_catalog_filtered(&catalog, Lifetime::Scoped, |component| {
      component.key() == ServiceKey::of::<EnglishHello>()
    })
    .unwrap();

  // Assert
  assert!(has_registration::<dyn HelloService, EnglishHello>(&services, Lifetime::Scoped));
  assert!(has_registration::<EnglishHello, EnglishHello>(&services, Lifetime::Scoped));
  assert_eq!(services.len(), 2);
}

#[test]
fn test_add_catalog_skips_abstract_types() {
  // Arrange
  let mut services = ServiceCollection::new();
  let catalog = TypeCatalog::new()
    .with_abstract::<dyn HelloService>()
    .with::<EnglishHello>()
    .with::<FrenchHello>();
  assert_eq!(catalog.len(), 3);

  // Act
  services.add_catalog(&catalog, Lifetime::Transient).unwrap();

  // Assert
  // EnglishHello: self and one interface. FrenchHello: self and two interfaces.
  assert_eq!(services.len(), 5);
  let provider = services.build();
  let greetings: Vec<String> = provider
    .get_all::<dyn HelloService>()
    .unwrap()
    .iter()
    .map(|hello| hello.say_hello("world"))
    .collect();
  assert_eq!(greetings, vec!["Hello world.", "Bonjour world."]);
}

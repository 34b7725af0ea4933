use std::sync::Arc;
use veneer_ioc::{
  implements, resolve, Disposable, Injectable, Lifetime, Resolver, ServiceCollection, TypeCatalog,
};

trait Storage: Send + Sync {
  fn name(&self) -> &'static str;
}

trait Health: Send + Sync {
  fn healthy(&self) -> bool;
}

struct DiskStorage;
impl Storage for DiskStorage {
  fn name(&self) -> &'static str {
    "disk"
  }
}
impl Health for DiskStorage {
  fn healthy(&self) -> bool {
    true
  }
}
// Listed as an interface, but never registered as a service.
impl Disposable for DiskStorage {}
impl Injectable for DiskStorage {
  fn inject(_: &dyn Resolver) -> veneer_ioc::Result<Self> {
    Ok(DiskStorage)
  }
}
implements!(DiskStorage: dyn Storage, dyn Health, dyn Disposable);

struct MemoryStorage;
impl Storage for MemoryStorage {
  fn name(&self) -> &'static str {
    "memory"
  }
}
impl Injectable for MemoryStorage {
  fn inject(_: &dyn Resolver) -> veneer_ioc::Result<Self> {
    Ok(MemoryStorage)
  }
}
implements!(MemoryStorage: dyn Storage);

fn main() -> veneer_ioc::Result<()> {
  // Register one type against everything it implements.
  let mut services = ServiceCollection::new();
  services.add_implemented_interfaces::<DiskStorage>(Lifetime::Singleton)?;
  println!("DiskStorage registered {} services.", services.len());

  // Or register a whole catalog of types at once, each against itself as well.
  let catalog = TypeCatalog::new()
    .with::<MemoryStorage>()
    .with_abstract::<dyn Storage>();
  services.add_catalog(&catalog, Lifetime::Transient)?;

  let provider = services.build();
  let names: Vec<&str> = provider
    .get_all::<dyn Storage>()?
    .iter()
    .map(|storage| storage.name())
    .collect();
  println!("Storages: {:?}", names);
  assert_eq!(names, ["disk", "memory"]);

  assert!(resolve!(provider, trait Health).healthy());
  let memory: Arc<MemoryStorage> = resolve!(provider, MemoryStorage);
  println!("Resolved the concrete {} storage.", memory.name());
  Ok(())
}

use std::sync::Arc;
use veneer_ioc::{
  implements, resolve, Decorator, Injectable, Lifetime, Resolver, ServiceCollection, Wrapped,
};

// 1. Define the abstraction (the trait)
trait Logger: Send + Sync {
  fn log(&self, message: &str) -> String;
}

// 2. Define a concrete implementation
struct ConsoleLogger;
impl Logger for ConsoleLogger {
  fn log(&self, message: &str) -> String {
    let line = format!("[CONSOLE LOG]: {}", message);
    println!("{}", line);
    line
  }
}

// 3. A decorator type. The container resolves it, then fills its `Wrapped` slot with
// the logger it decorates.
#[derive(Default)]
struct CountingLogger {
  decorated: Wrapped<dyn Logger>,
  count: std::sync::atomic::AtomicUsize,
}
impl Logger for CountingLogger {
  fn log(&self, message: &str) -> String {
    let n = self.count.fetch_add(1, std::sync::atomic::Ordering::SeqCst) + 1;
    match self.decorated.get() {
      Some(inner) => inner.log(&format!("#{} {}", n, message)),
      None => String::new(),
    }
  }
}
impl Decorator<dyn Logger> for CountingLogger {
  fn decorated(&self) -> &Wrapped<dyn Logger> {
    &self.decorated
  }
}
impl Injectable for CountingLogger {
  fn inject(_: &dyn Resolver) -> veneer_ioc::Result<Self> {
    Ok(Self::default())
  }
}
implements!(CountingLogger: dyn Logger);

// 4. A decorator function, for wrappers that need no registration of their own.
struct UppercaseLogger {
  inner: Arc<dyn Logger>,
}
impl Logger for UppercaseLogger {
  fn log(&self, message: &str) -> String {
    self.inner.log(&message.to_uppercase())
  }
}

fn main() -> veneer_ioc::Result<()> {
  // --- Registration ---
  let mut services = ServiceCollection::new();
  services.add_singleton::<dyn Logger>(|_| Arc::new(ConsoleLogger));

  // The counting decorator lives as long as the logger it wraps, so its count is shared.
  services.add_decorator::<dyn Logger, CountingLogger>(Lifetime::Singleton)?;

  // Decorators stack in call order: this one wraps the counting logger.
  services.add_decorator_fn::<dyn Logger, _>(Lifetime::Transient, |_, inner| {
    Arc::new(UppercaseLogger { inner })
  });

  // --- Resolution and Usage ---
  let provider = services.build();
  let logger = resolve!(provider, trait Logger);
  assert_eq!(logger.log("starting"), "[CONSOLE LOG]: #1 STARTING");

  let again = resolve!(provider, trait Logger);
  assert_eq!(again.log("finished"), "[CONSOLE LOG]: #2 FINISHED");
  Ok(())
}

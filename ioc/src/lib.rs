//! # Veneer IoC
//!
//! Decorators and bulk interface registration for a small, thread-safe Inversion of Control
//! (IoC) container.
//!
//! A decorator wraps the existing registrations of a service and adds behavior around them,
//! such as logging or caching, without touching the original implementations. Registering a
//! decorator rewrites the registration list once, during configuration. Resolution afterwards
//! is ordinary resolution.
//!
//! ## Core Concepts
//!
//! - **ServiceCollection**: the ordered, mutable list of registrations.
//! - **ServiceProvider**: the read-only container built from a collection.
//! - **Lifetime**: `Transient < Scoped < Singleton`. A decorator only wraps registrations that
//!   live at least as long as itself.
//! - **Decorator**: a type exposing a [`Wrapped`] slot for the service it decorates, or a plain
//!   function from the original value to the decorated one.
//! - **Component**: a type that lists the interfaces it implements, declared with
//!   [`implements!`].
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use veneer_ioc::{implements, resolve, Decorator, Injectable, Lifetime, Resolver, ServiceCollection, Wrapped};
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self, name: &str) -> String;
//! }
//!
//! struct EnglishGreeter;
//! impl Greeter for EnglishGreeter {
//!     fn greet(&self, name: &str) -> String {
//!         format!("Hello {}.", name)
//!     }
//! }
//!
//! // A decorator that shouts whatever the wrapped greeter says.
//! #[derive(Default)]
//! struct LoudGreeter {
//!     decorated: Wrapped<dyn Greeter>,
//! }
//! impl Greeter for LoudGreeter {
//!     fn greet(&self, name: &str) -> String {
//!         self.decorated
//!             .get()
//!             .map(|inner| inner.greet(name).to_uppercase())
//!             .unwrap_or_default()
//!     }
//! }
//! impl Decorator<dyn Greeter> for LoudGreeter {
//!     fn decorated(&self) -> &Wrapped<dyn Greeter> {
//!         &self.decorated
//!     }
//! }
//! impl Injectable for LoudGreeter {
//!     fn inject(_: &dyn Resolver) -> veneer_ioc::Result<Self> {
//!         Ok(Self::default())
//!     }
//! }
//! implements!(LoudGreeter: dyn Greeter);
//!
//! fn main() -> veneer_ioc::Result<()> {
//!     let mut services = ServiceCollection::new();
//!     services.add_singleton::<dyn Greeter>(|_| Arc::new(EnglishGreeter));
//!     services.add_decorator::<dyn Greeter, LoudGreeter>(Lifetime::Transient)?;
//!
//!     let provider = services.build();
//!     let greeter = resolve!(provider, trait Greeter);
//!     assert_eq!(greeter.greet("world"), "HELLO WORLD.");
//!     Ok(())
//! }
//! ```

mod collection;
mod component;
mod container;
mod core;
mod decorator;
mod error;
mod interfaces;
mod lifetime;
mod macros;
mod registration;

pub use collection::ServiceCollection;
pub use component::{Component, ComponentType, Disposable, Interface, InterfaceType, TypeCatalog};
pub use container::{Resolver, ServiceProvider};
pub use crate::core::{Instance, ServiceKey};
pub use decorator::{Decorator, DecoratorType, Wrapped, WrappedSlot};
pub use error::{Error, Result};
pub use lifetime::Lifetime;
pub use registration::{ImplementationSource, ImplementationType, Injectable, Registration, ServiceFactory};

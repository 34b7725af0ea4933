//! Public macros for declaring components and resolving services.

/// Implements [`Component`](crate::Component) for a type, listing the interfaces it
/// implements.
///
/// Each interface is written as the trait object type the type can be used as.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use veneer_ioc::{implements, Injectable, Lifetime, Resolver, ServiceCollection};
///
/// trait Reader: Send + Sync {
///   fn read(&self) -> String;
/// }
/// trait Writer: Send + Sync {}
///
/// struct File;
/// impl Reader for File {
///   fn read(&self) -> String {
///     "contents".to_string()
///   }
/// }
/// impl Writer for File {}
/// impl Injectable for File {
///   fn inject(_: &dyn Resolver) -> veneer_ioc::Result<Self> {
///     Ok(File)
///   }
/// }
/// implements!(File: dyn Reader, dyn Writer);
///
/// let mut services = ServiceCollection::new();
/// services.add_implemented_interfaces::<File>(Lifetime::Singleton).unwrap();
/// assert_eq!(services.len(), 2);
///
/// let provider = services.build();
/// assert_eq!(provider.get_required::<dyn Reader>().unwrap().read(), "contents");
/// ```
#[macro_export]
macro_rules! implements {
    ($type:ty : $($interface:ty),+ $(,)?) => {
        impl $crate::Component for $type {
            fn interfaces() -> ::std::vec::Vec<$crate::Interface<Self>> {
                ::std::vec![
                    $(
                        $crate::Interface::<Self>::new::<$interface>(
                            |this| this as ::std::sync::Arc<$interface>
                        )
                    ),+
                ]
            }
        }
    };

    // A component implementing no interface.
    ($type:ty) => {
        impl $crate::Component for $type {
            fn interfaces() -> ::std::vec::Vec<$crate::Interface<Self>> {
                ::std::vec::Vec::new()
            }
        }
    };
}

/// Resolves a service from a provider or resolver.
///
/// # Panics
///
/// Panics if the service is not registered or cannot be built. For a non-panicking
/// version, use `get::<T>()` directly or [`maybe_resolve!`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use veneer_ioc::{resolve, ServiceCollection};
///
/// trait Greeter: Send + Sync {
///   fn greet(&self) -> String;
/// }
/// struct English;
/// impl Greeter for English {
///   fn greet(&self) -> String {
///     "Hello!".to_string()
///   }
/// }
///
/// let mut services = ServiceCollection::new();
/// services.add_instance(Arc::new(String::from("hello")));
/// services.add_singleton::<dyn Greeter>(|_| Arc::new(English));
/// let provider = services.build();
///
/// assert_eq!(*resolve!(provider, String), "hello");
/// assert_eq!(resolve!(provider, trait Greeter).greet(), "Hello!");
/// ```
#[macro_export]
macro_rules! resolve {
    // Arm for resolving a trait object: resolve!(provider, trait MyTrait)
    ($provider:expr, trait $trait_ident:ident) => {
        match $provider.get::<dyn $trait_ident>() {
            ::std::result::Result::Ok(::std::option::Option::Some(service)) => service,
            ::std::result::Result::Ok(::std::option::Option::None) => panic!(
                "Failed to resolve required trait service: {}",
                ::std::any::type_name::<dyn $trait_ident>()
            ),
            ::std::result::Result::Err(error) => panic!("{}", error),
        }
    };

    // Arm for resolving a concrete type: resolve!(provider, MyService)
    ($provider:expr, $type:ty) => {
        match $provider.get::<$type>() {
            ::std::result::Result::Ok(::std::option::Option::Some(service)) => service,
            ::std::result::Result::Ok(::std::option::Option::None) => panic!(
                "Failed to resolve required service: {}",
                ::std::any::type_name::<$type>()
            ),
            ::std::result::Result::Err(error) => panic!("{}", error),
        }
    };
}

/// Resolves a service, returning `None` if it is missing or cannot be built.
#[macro_export]
macro_rules! maybe_resolve {
    ($provider:expr, trait $trait_ident:ident) => {
        $provider.get::<dyn $trait_ident>().ok().flatten()
    };

    ($provider:expr, $type:ty) => {
        $provider.get::<$type>().ok().flatten()
    };
}

use thiserror::Error;

/// The error type for registration and resolution.
#[derive(Debug, Error)]
pub enum Error {
  #[error("The type '{type_name}' is abstract and cannot be instantiated.")]
  AbstractType { type_name: &'static str },

  #[error("The service type '{service}' is not assignable from the decorator type '{decorator}'.")]
  NotAssignable {
    service: &'static str,
    decorator: &'static str,
  },

  #[error("The decorator type cannot be the same as the service type '{service}'.")]
  SameType { service: &'static str },

  #[error("The decorator type '{decorator}' does not declare a decorated slot for '{service}'.")]
  MissingDecoratedSlot {
    service: &'static str,
    decorator: &'static str,
  },

  #[error("Failed to resolve required service: {service}")]
  NotRegistered { service: &'static str },

  #[error("Circular dependency detected while resolving service: {service}")]
  CircularDependency { service: &'static str },

  #[error("Expected a value of type '{expected}' but found '{found}'.")]
  TypeMismatch {
    expected: &'static str,
    found: &'static str,
  },

  #[error("Failed to activate '{type_name}': {reason}")]
  Activation {
    type_name: &'static str,
    reason: String,
  },

  #[error("Invalid service lifetime: '{0}'")]
  InvalidLifetime(String),
}

/// A specialized `Result` type for `veneer_ioc` operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

//! Service lifetimes.

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// How long a resolved value may be held.
///
/// Variants are ordered by that duration: `Transient < Scoped < Singleton`. A value may only
/// capture values whose lifetime is at least its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Lifetime {
  /// A new value on every resolution.
  #[default]
  Transient,
  /// One value per scope. The provider in this crate is a single root scope.
  Scoped,
  /// One value per provider.
  Singleton,
}

impl Lifetime {
  pub fn as_str(&self) -> &'static str {
    match self {
      Lifetime::Transient => "transient",
      Lifetime::Scoped => "scoped",
      Lifetime::Singleton => "singleton",
    }
  }

  /// True if resolved values are cached by the provider.
  pub fn is_cached(&self) -> bool {
    !matches!(self, Lifetime::Transient)
  }
}

impl fmt::Display for Lifetime {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Lifetime {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "transient" => Ok(Lifetime::Transient),
      "scoped" => Ok(Lifetime::Scoped),
      "singleton" => Ok(Lifetime::Singleton),
      _ => Err(Error::InvalidLifetime(s.to_string())),
    }
  }
}

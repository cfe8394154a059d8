//! Validated identifiers for principals and providers.
//!
//! Both identifiers are opaque, non-empty strings without whitespace. Validation runs on
//! construction and on deserialization, so a stored snapshot cannot smuggle in a padded key.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

/// Longest identifier accepted, in bytes.
pub const IDENTIFIER_MAX_LEN: usize = 128;

/// Which identifier failed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum IdentifierKind {
	/// [`PrincipalId`].
	Principal,
	/// [`ProviderId`].
	Provider,
}
impl Display for IdentifierKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			IdentifierKind::Principal => f.write_str("Principal"),
			IdentifierKind::Provider => f.write_str("Provider"),
		}
	}
}

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// Nothing to identify with.
	#[error("{0} identifier cannot be empty.")]
	Empty(IdentifierKind),
	/// Any Unicode whitespace, including padding.
	#[error("{0} identifier contains whitespace.")]
	ContainsWhitespace(IdentifierKind),
	/// Longer than [`IDENTIFIER_MAX_LEN`].
	#[error("{kind} identifier exceeds {max} bytes.")]
	TooLong {
		/// Identifier that was rejected.
		kind: IdentifierKind,
		/// Maximum permitted length.
		max: usize,
	},
}

macro_rules! identifier {
	($(#[$meta:meta])* $name:ident => $kind:ident) => {
		$(#[$meta])*
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Validates `value` and wraps it.
			pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
				let value = value.into();

				check(IdentifierKind::$kind, &value)?;

				Ok(Self(value))
			}

			/// Borrows the raw identifier.
			pub fn as_str(&self) -> &str {
				&self.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				Self::new(value)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &str {
				self.as_str()
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				self.as_str()
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				self.as_str()
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(self.as_str())
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.debug_tuple(stringify!($name)).field(&self.0).finish()
			}
		}
	};
}

identifier! {
	/// Identifier for the user or account a session belongs to.
	PrincipalId => Principal
}
identifier! {
	/// Identifier for the OAuth provider that issued a credential set.
	ProviderId => Provider
}

fn check(kind: IdentifierKind, value: &str) -> Result<(), IdentifierError> {
	match value {
		"" => Err(IdentifierError::Empty(kind)),
		v if v.chars().any(char::is_whitespace) => Err(IdentifierError::ContainsWhitespace(kind)),
		v if v.len() > IDENTIFIER_MAX_LEN =>
			Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN }),
		_ => Ok(()),
	}
}

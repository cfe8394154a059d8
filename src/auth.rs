//! Auth-domain identifiers, credential tuples, and secret wrappers.

pub mod id;
pub mod token;

pub use id::*;
pub use token::{principal::*, secret::*, tuple::*};

//! Credential models carried through session materializations.

pub mod principal;
pub mod secret;
pub mod tuple;

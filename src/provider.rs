//! Provider-facing configuration (data) and strategies (behavior).
//!
//! `descriptor` exposes the validated token endpoint plus client authentication preferences
//! and the client identity injected at construction time. `strategy` defines
//! [`ProviderStrategy`], an HTTP-client-agnostic hook used to decorate refresh requests and
//! classify provider failures for operators.

pub mod descriptor;
pub mod strategy;

pub use descriptor::*;
pub use strategy::*;

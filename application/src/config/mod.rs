//! Application-level configuration.
//!
//! - [`InvocationParams`]: retry bound and multi-call policy for the engine

pub mod invocation_params;

pub use invocation_params::InvocationParams;

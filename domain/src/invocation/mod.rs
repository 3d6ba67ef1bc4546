//! Structured invocation domain.
//!
//! - [`result::StructuredResult`]: what a successful invocation returns
//! - [`parser::ResponseParser`]: payload normalization
//! - [`attempt::InvocationAttempt`]: one ephemeral backend round trip
//! - [`policy::ExtraToolCallPolicy`]: what to do with calls after the first

pub mod attempt;
pub mod parser;
pub mod policy;
pub mod result;

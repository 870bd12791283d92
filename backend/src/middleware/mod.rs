//! Request middleware.
//!
//! Purpose: define middleware components for request lifecycle concerns such
//! as tracing and the form method-override convention.

pub mod method_override;
pub mod trace;

pub use method_override::MethodOverride;
pub use trace::Trace;

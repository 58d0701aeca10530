//! HTTP middleware stack.
//!
//! Request tracing comes from [`byby_core::middleware`]; CORS is local.

pub mod cors;

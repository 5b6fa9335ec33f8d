//! HTTP request handlers.
//!
//! Controllers authenticate the request, call into the routing engine and
//! convert domain models into DTOs.

pub mod route;

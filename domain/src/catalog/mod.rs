//! Model catalog subdomain.

pub mod snapshot;

//! Completion subdomain: the request a user submits and what comes back.

pub mod outcome;
pub mod request;

//! Application-level configuration.
//!
//! - [`GatewayParams`]: catalog TTL, refresh interval, request defaults

pub mod gateway_params;

pub use gateway_params::GatewayParams;

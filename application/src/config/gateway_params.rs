//! Gateway parameters: request and catalog policy.
//!
//! [`GatewayParams`] groups the static knobs the
//! [`SessionGateway`](crate::use_cases::session_gateway::SessionGateway)
//! applies to every request. Loaded from the `[catalog]` and `[request]`
//! sections of the config file by the infrastructure layer.

use llmgate_domain::ResponseStyle;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayParams {
    /// Maximum catalog age before a request triggers a refresh.
    pub catalog_ttl: Duration,
    /// Period of the background catalog refresher; `None` disables it.
    pub refresh_interval: Option<Duration>,
    /// Timeout applied when the caller does not give one.
    pub default_timeout: Duration,
    /// Style applied when the caller does not give one.
    pub default_style: Option<ResponseStyle>,
}

impl Default for GatewayParams {
    fn default() -> Self {
        Self {
            catalog_ttl: Duration::from_secs(30),
            refresh_interval: None,
            default_timeout: Duration::from_secs(120),
            default_style: None,
        }
    }
}

impl GatewayParams {
    // ==================== Builder Methods ====================

    pub fn with_catalog_ttl(mut self, ttl: Duration) -> Self {
        self.catalog_ttl = ttl;
        self
    }

    pub fn with_refresh_interval(mut self, interval: Option<Duration>) -> Self {
        self.refresh_interval = interval;
        self
    }

    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn with_default_style(mut self, style: Option<ResponseStyle>) -> Self {
        self.default_style = style;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = GatewayParams::default();
        assert_eq!(params.catalog_ttl, Duration::from_secs(30));
        assert!(params.refresh_interval.is_none());
        assert_eq!(params.default_timeout, Duration::from_secs(120));
        assert!(params.default_style.is_none());
    }

    #[test]
    fn test_builder() {
        let params = GatewayParams::default()
            .with_catalog_ttl(Duration::from_secs(5))
            .with_refresh_interval(Some(Duration::from_secs(60)))
            .with_default_style(Some(ResponseStyle::Detailed));

        assert_eq!(params.catalog_ttl, Duration::from_secs(5));
        assert_eq!(params.refresh_interval, Some(Duration::from_secs(60)));
        assert_eq!(params.default_style, Some(ResponseStyle::Detailed));
    }
}

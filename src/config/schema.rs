//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

/// Service name bound to request spans when none is configured.
pub const DEFAULT_SERVICE_NAME: &str = "rack";

/// Configuration for the tracing middleware.
///
/// All fields have defaults so a host application only states what it
/// changes.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Service name bound to every request span.
    pub service_name: String,

    /// When false, the middleware passes requests through untouched.
    pub enabled: bool,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            enabled: true,
        }
    }
}

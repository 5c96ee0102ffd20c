//! Configuration for install operations

use std::time::Duration;

/// Tunables for the install pipeline.
///
/// Concurrency caps bound the fan-out of the override copier and the asset
/// downloader so a large pack cannot exhaust file descriptors or hammer the
/// remote service.
#[derive(Debug, Clone)]
pub struct InstallConfig {
    /// Maximum number of asset downloads in flight at once
    pub max_concurrent_downloads: usize,
    /// Maximum number of override file copies in flight at once
    pub max_concurrent_copies: usize,
    /// Connection timeout for HTTP requests
    pub connect_timeout: Duration,
    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            max_concurrent_downloads: 8,
            max_concurrent_copies: 8,
            connect_timeout: Duration::from_secs(30),
            user_agent: "modpack/0.1.0".to_string(),
        }
    }
}

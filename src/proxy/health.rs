//! Health probing for pool proxies
//!
//! A proxy is alive if `npm ping` reaches the registry through it within a
//! short fixed timeout. Liveness is a boolean signal only; probe failures are
//! logged and never surface to the caller.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::command::{CommandRunner, RunOptions};
use crate::models::ProxyUrl;
use crate::proxy::pool::proxy_env;

/// Timeout for one liveness probe
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(15);

/// Liveness check for a single proxy
#[async_trait]
pub trait ProxyProber: Send + Sync {
    /// Whether the proxy currently forwards traffic to the registry
    async fn is_alive(&self, proxy: &ProxyUrl) -> bool;
}

/// Probes liveness by running `npm ping` through the proxy
pub struct PingProber {
    runner: CommandRunner,
    timeout: Duration,
}

impl PingProber {
    pub fn new(runner: CommandRunner) -> Self {
        Self {
            runner,
            timeout: PROBE_TIMEOUT,
        }
    }

    pub fn with_timeout(runner: CommandRunner, timeout: Duration) -> Self {
        Self { runner, timeout }
    }
}

#[async_trait]
impl ProxyProber for PingProber {
    async fn is_alive(&self, proxy: &ProxyUrl) -> bool {
        let opts = RunOptions {
            current_dir: None,
            env: Some(proxy_env(Some(proxy))),
            timeout: self.timeout,
        };

        match self.runner.run(&["ping"], opts).await {
            Ok(_) => true,
            Err(err) => {
                debug!("proxy {} failed liveness probe: {}", proxy, err);
                false
            }
        }
    }
}

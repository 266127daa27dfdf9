//! Cycle orchestration
//!
//! Drives the iteration loop: acquire a proxy (when enabled), create an
//! isolated workspace, install, uninstall, tear the workspace down, then
//! sleep a randomized delay before the next iteration. Iterations run
//! strictly one at a time; the rotation cursor and the run counters are
//! owned here and touched by nothing else.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::CycleConfig;
use crate::error::Result;
use crate::models::{IterationOutcome, ProxyUrl, RunReport};
use crate::npm::PackageClient;
use crate::proxy::health::ProxyProber;
use crate::proxy::rotation::select_working;
use crate::workspace::WorkspaceManager;

/// Draw a uniformly random delay in `[min_secs*1000, max_secs*1000]`
/// milliseconds, bounds inclusive
pub fn random_delay_ms(min_secs: u64, max_secs: u64) -> u64 {
    rand::thread_rng().gen_range(min_secs * 1000..=max_secs * 1000)
}

/// Runs the configured number of install/uninstall iterations
pub struct CycleRunner {
    config: CycleConfig,
    pool: Vec<ProxyUrl>,
    client: Arc<dyn PackageClient>,
    prober: Arc<dyn ProxyProber>,
    workspaces: WorkspaceManager,
    /// Pool index where the next proxy search starts
    cursor: usize,
}

impl CycleRunner {
    pub fn new(
        config: CycleConfig,
        pool: Vec<ProxyUrl>,
        client: Arc<dyn PackageClient>,
        prober: Arc<dyn ProxyProber>,
        workspaces: WorkspaceManager,
    ) -> Self {
        Self {
            config,
            pool,
            client,
            prober,
            workspaces,
            cursor: 0,
        }
    }

    /// Run the full cycle loop and return the aggregated report
    ///
    /// Workspace creation failures propagate; everything else is absorbed
    /// into per-iteration outcomes or, for proxy exhaustion, an early abort
    /// that preserves the counts accumulated so far.
    pub async fn run(mut self) -> Result<RunReport> {
        let mut report = RunReport::new(self.config.iterations);

        for i in 1..=self.config.iterations {
            info!("iteration {}/{}", i, self.config.iterations);

            let proxy = if self.config.use_proxies {
                match self.acquire_proxy().await {
                    Some(proxy) => Some(proxy),
                    None => {
                        warn!("no working proxy left in the pool, aborting run");
                        report.record(IterationOutcome::Aborted);
                        break;
                    }
                }
            } else {
                None
            };

            let workspace = self.workspaces.create(i)?;
            let outcome = self.run_iteration(workspace.path(), proxy.as_ref()).await;
            // Workspace removal happens here, before the delay, so at most
            // one workspace is ever live
            drop(workspace);
            report.record(outcome);

            if i < self.config.iterations {
                let delay =
                    random_delay_ms(self.config.min_delay_secs, self.config.max_delay_secs);
                debug!("waiting {}ms before next iteration", delay);
                sleep(Duration::from_millis(delay)).await;
            }
        }

        Ok(report)
    }

    /// One proxy search with a fresh failure set; advances the cursor past
    /// the chosen proxy on success
    async fn acquire_proxy(&mut self) -> Option<ProxyUrl> {
        let mut failed = HashSet::new();
        let selected =
            select_working(&self.pool, self.cursor, &mut failed, self.prober.as_ref()).await?;
        self.cursor = (selected.index + 1) % self.pool.len();
        info!("routing through {}", selected.proxy);
        Some(selected.proxy)
    }

    /// Install then uninstall; failures become the iteration's outcome and
    /// never escape
    async fn run_iteration(&self, dir: &Path, proxy: Option<&ProxyUrl>) -> IterationOutcome {
        info!("installing {}", self.config.package);
        if let Err(err) = self.client.install(&self.config.package, dir, proxy).await {
            warn!("install failed: {}", err);
            return IterationOutcome::Failed;
        }

        info!("uninstalling {}", self.config.package);
        match self.client.uninstall(&self.config.package, dir, proxy).await {
            Ok(()) => IterationOutcome::Success,
            Err(err) => {
                warn!("uninstall failed: {}", err);
                IterationOutcome::Failed
            }
        }
    }
}

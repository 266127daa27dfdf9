//! npm client
//!
//! Thin verb layer over the command runner: install, uninstall and ping,
//! each with its own timeout and an optional proxy environment overlay.
//! The trait seam keeps the cycle orchestrator drivable by scripted fakes.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::command::{CommandRunner, RunOptions};
use crate::error::Result;
use crate::models::{PackageSpec, ProxyUrl};
use crate::proxy::pool::proxy_env;

/// Install is allowed the longest window; uninstall works from a local tree
pub const INSTALL_TIMEOUT: Duration = Duration::from_secs(120);
pub const UNINSTALL_TIMEOUT: Duration = Duration::from_secs(60);

/// Package-manager verbs the cycle engine needs
#[async_trait]
pub trait PackageClient: Send + Sync {
    /// Install the package into `dir`, optionally through a proxy
    async fn install(
        &self,
        spec: &PackageSpec,
        dir: &Path,
        proxy: Option<&ProxyUrl>,
    ) -> Result<()>;

    /// Uninstall the package from `dir`, optionally through a proxy
    async fn uninstall(
        &self,
        spec: &PackageSpec,
        dir: &Path,
        proxy: Option<&ProxyUrl>,
    ) -> Result<()>;
}

/// Platform-specific npm binary name
pub fn npm_binary() -> &'static str {
    if cfg!(windows) {
        "npm.cmd"
    } else {
        "npm"
    }
}

/// `PackageClient` backed by the real npm binary
#[derive(Debug, Clone)]
pub struct NpmClient {
    runner: CommandRunner,
    install_timeout: Duration,
    uninstall_timeout: Duration,
}

impl NpmClient {
    pub fn new(runner: CommandRunner) -> Self {
        Self {
            runner,
            install_timeout: INSTALL_TIMEOUT,
            uninstall_timeout: UNINSTALL_TIMEOUT,
        }
    }

    fn options(&self, dir: &Path, proxy: Option<&ProxyUrl>, timeout: Duration) -> RunOptions {
        RunOptions {
            current_dir: Some(dir.to_path_buf()),
            env: Some(proxy_env(proxy)),
            timeout,
        }
    }
}

#[async_trait]
impl PackageClient for NpmClient {
    async fn install(
        &self,
        spec: &PackageSpec,
        dir: &Path,
        proxy: Option<&ProxyUrl>,
    ) -> Result<()> {
        self.runner
            .run(
                &["install", spec.as_str()],
                self.options(dir, proxy, self.install_timeout),
            )
            .await?;
        Ok(())
    }

    async fn uninstall(
        &self,
        spec: &PackageSpec,
        dir: &Path,
        proxy: Option<&ProxyUrl>,
    ) -> Result<()> {
        self.runner
            .run(
                &["uninstall", spec.as_str()],
                self.options(dir, proxy, self.uninstall_timeout),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_npm_binary_matches_platform() {
        if cfg!(windows) {
            assert_eq!(npm_binary(), "npm.cmd");
        } else {
            assert_eq!(npm_binary(), "npm");
        }
    }

    // The client passes the workspace as the working directory and the spec
    // as a single argv element; using `true` as the "npm" binary keeps the
    // test hermetic while exercising the full spawn path.
    #[cfg(unix)]
    #[tokio::test]
    async fn test_install_runs_in_workspace_dir() {
        let dir = tempfile::tempdir().unwrap();
        let client = NpmClient::new(CommandRunner::new("true"));
        let spec = PackageSpec::parse("lodash").unwrap();

        client.install(&spec, dir.path(), None).await.unwrap();
        client.uninstall(&spec, dir.path(), None).await.unwrap();
    }
}

//! Churn - npm install/uninstall cycle automation
//!
//! Drives repeated install/uninstall cycles of a single npm package,
//! optionally routing each cycle's traffic through a rotating pool of
//! proxies.
//!
//! ## Features
//!
//! - Automated install/uninstall cycles in isolated per-iteration workspaces
//! - HTTP, HTTPS and SOCKS4/5 proxy support with circular rotation
//! - Proxy liveness probing against the npm registry, with per-iteration
//!   failure memory
//! - Randomized, configurable delays between iterations
//! - Flexible package input parsing ("npm i lodash --save" becomes "lodash")

pub mod cli;
pub mod command;
pub mod config;
pub mod cycle;
pub mod error;
pub mod models;
pub mod npm;
pub mod proxy;
pub mod workspace;

pub use config::CycleConfig;
pub use error::{ChurnError, Result};

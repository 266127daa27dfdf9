//! Proxy pool management
//!
//! This module provides the proxy-facing half of the cycle engine:
//! - Pool loading from a line-oriented proxy list
//! - Environment-variable overlays for HTTP(S) and SOCKS proxies
//! - Liveness probing against the npm registry
//! - Circular rotation with per-iteration failure memory

pub mod health;
pub mod pool;
pub mod rotation;

pub use health::{PingProber, ProxyProber, PROBE_TIMEOUT};
pub use pool::{load_proxies, overlay_proxy_env, proxy_env};
pub use rotation::{select_working, SelectedProxy};

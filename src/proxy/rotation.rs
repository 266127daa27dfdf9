//! Circular proxy search with per-iteration failure memory
//!
//! The pool is scanned in file order starting at a rotating offset. Proxies
//! that fail their probe are remembered in a set scoped to one search call,
//! so a proxy that is down this iteration gets another chance next iteration.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::models::ProxyUrl;
use crate::proxy::health::ProxyProber;

/// A live proxy picked from the pool, with its pool index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedProxy {
    pub proxy: ProxyUrl,
    pub index: usize,
}

/// Find the first live proxy in circular order from `start_index`
///
/// Scans at most `pool.len()` candidates at `(start_index + step) % len`,
/// skipping anything already in `failed`. The first candidate whose probe
/// succeeds is returned immediately; dead candidates are added to `failed`.
/// `None` means the pool is exhausted — every proxy was either skipped or
/// probed dead within this search.
pub async fn select_working(
    pool: &[ProxyUrl],
    start_index: usize,
    failed: &mut HashSet<ProxyUrl>,
    prober: &dyn ProxyProber,
) -> Option<SelectedProxy> {
    for step in 0..pool.len() {
        let index = (start_index + step) % pool.len();
        let proxy = &pool[index];

        if failed.contains(proxy) {
            continue;
        }

        debug!("probing proxy {}", proxy);
        if prober.is_alive(proxy).await {
            info!("proxy {} is alive", proxy);
            return Some(SelectedProxy {
                proxy: proxy.clone(),
                index,
            });
        }

        warn!("proxy {} is not responding, trying next", proxy);
        failed.insert(proxy.clone());
    }

    None
}

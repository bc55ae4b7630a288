//! # Camera Inventory Service
//!
//! Implements the single use case of the tool: turn "what cameras are out
//! there?" into a list of fully described devices.
//!
//! Candidates come either from the [`Prober`] or, when an address is given
//! explicitly, from that address alone. Each candidate is then queried in
//! turn; candidates that do not answer like an ONVIF device are left out.

use std::time::Duration;

use anyhow::Context;
use camscout_common::config::{Config, Credentials};
use camscout_common::device::DiscoveredDevice;
use camscout_common::{info, success};
use tracing::debug;

use crate::client::{DeviceConnector, HttpConnector};
use crate::discovery::{MulticastProber, Prober};
use crate::query::query_device;

/// Progress notifications emitted while a run is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    Discovering,
    Discovered { candidates: usize },
    Querying { address: String, index: usize, total: usize },
}

pub type ProgressFn = Box<dyn Fn(Progress) + Send + Sync>;

/// Application service for camera inventory.
///
/// Orchestrates a run by:
/// 1. collecting candidate addresses through the [`Prober`] (or the explicit target).
/// 2. querying every candidate through the [`DeviceConnector`].
/// 3. keeping only the devices whose identity could be read.
pub struct InventoryService {
    prober: Box<dyn Prober>,
    connector: Box<dyn DeviceConnector>,
    progress: Option<ProgressFn>,
}

impl InventoryService {
    pub fn new(prober: Box<dyn Prober>, connector: Box<dyn DeviceConnector>) -> Self {
        Self {
            prober,
            connector,
            progress: None,
        }
    }

    /// The production wiring: multicast discovery and SOAP over HTTP.
    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let connector =
            HttpConnector::new(cfg.request_timeout).context("failed to build the HTTP client")?;
        Ok(Self::new(Box::new(MulticastProber::new()), Box::new(connector)))
    }

    pub fn with_progress(mut self, progress: impl Fn(Progress) + Send + Sync + 'static) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    /// Runs one inventory pass.
    ///
    /// With a `target`, discovery is skipped and only that address is queried.
    /// Fails only when discovery itself cannot run.
    pub async fn run(
        &self,
        target: Option<&str>,
        credentials: &Credentials,
        discovery_timeout: Duration,
    ) -> anyhow::Result<Vec<DiscoveredDevice>> {
        let candidates = match target {
            Some(address) => vec![address.to_string()],
            None => self.discover(discovery_timeout).await?,
        };

        let total = candidates.len();
        let mut devices = Vec::with_capacity(total);

        for (index, address) in candidates.into_iter().enumerate() {
            self.notify(Progress::Querying {
                address: address.clone(),
                index,
                total,
            });

            match query_device(self.connector.as_ref(), &address, credentials).await {
                Some(device) => {
                    success!("{address}: {} {}", device.manufacturer, device.model);
                    debug!(%address, profiles = device.profiles.len(), "device described");
                    devices.push(device);
                }
                None => info!("{address} did not answer as an ONVIF device"),
            }
        }

        Ok(devices)
    }

    async fn discover(&self, timeout: Duration) -> anyhow::Result<Vec<String>> {
        self.notify(Progress::Discovering);
        let candidates = self
            .prober
            .discover(timeout)
            .await
            .context("WS-Discovery failed")?;
        self.notify(Progress::Discovered {
            candidates: candidates.len(),
        });
        Ok(candidates)
    }

    fn notify(&self, progress: Progress) {
        if let Some(callback) = &self.progress {
            callback(progress);
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

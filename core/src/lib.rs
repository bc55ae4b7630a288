//! Camera discovery and description.
//!
//! [`discovery`] finds candidates, [`client`] talks to them, [`query`]
//! describes one device and [`inventory`] ties it all together.

pub mod client;
pub mod discovery;
pub mod inventory;
pub mod query;

pub use client::{ClientError, ConnectionParams, DeviceClient, DeviceConnector, HttpConnector};
pub use discovery::{DiscoveryError, MulticastProber, ProbeConfig, Prober};
pub use inventory::{InventoryService, Progress};
pub use query::query_device;

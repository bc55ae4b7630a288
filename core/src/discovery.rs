//! # WS-Discovery Prober
//!
//! Finds ONVIF devices by multicasting a single probe and listening for
//! probe matches until the discovery window closes.
//!
//! Multicast UDP gives no delivery guarantee, so replies that are lost,
//! truncated or simply not ONVIF are expected. They are dropped without
//! failing the discovery.

use std::collections::HashSet;
use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use camscout_common::warn;
use camscout_protocols::wsdiscovery;
use thiserror::Error;
use tokio::net::UdpSocket;
use tokio::time::Instant;
use tracing::{debug, trace};

/// Largest datagram read from the socket. Longer replies are truncated and usually fail to decode.
const RECV_BUFFER_SIZE: usize = 8192;
/// Pause after a failed receive before reading again.
const RECV_RETRY_DELAY: Duration = Duration::from_millis(10);

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("failed to bind discovery socket on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("failed to send probe to {target}: {source}")]
    Send {
        target: SocketAddr,
        #[source]
        source: io::Error,
    },
}

/// Produces the candidate device addresses for a run.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Returns unique `host[:port]` strings in the order they were first seen.
    async fn discover(&self, timeout: Duration) -> Result<Vec<String>, DiscoveryError>;
}

#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Where the probe is sent. Defaults to the WS-Discovery multicast group.
    pub target: SocketAddr,
    /// Local endpoint replies arrive on. Defaults to an ephemeral port on all interfaces.
    pub bind_addr: SocketAddr,
    pub buffer_size: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            target: wsdiscovery::multicast_group(),
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)),
            buffer_size: RECV_BUFFER_SIZE,
        }
    }
}

#[derive(Debug, Default)]
pub struct MulticastProber {
    cfg: ProbeConfig,
}

impl MulticastProber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(cfg: ProbeConfig) -> Self {
        Self { cfg }
    }
}

#[async_trait]
impl Prober for MulticastProber {
    async fn discover(&self, timeout: Duration) -> Result<Vec<String>, DiscoveryError> {
        let socket = UdpSocket::bind(self.cfg.bind_addr)
            .await
            .map_err(|source| DiscoveryError::Bind {
                addr: self.cfg.bind_addr,
                source,
            })?;

        let message_id = wsdiscovery::new_message_id();
        let probe = wsdiscovery::probe_message(&message_id);
        socket
            .send_to(probe.as_bytes(), self.cfg.target)
            .await
            .map_err(|source| DiscoveryError::Send {
                target: self.cfg.target,
                source,
            })?;
        debug!(%message_id, target = %self.cfg.target, "probe sent");

        let deadline = Instant::now() + timeout;
        let hosts = collect_replies(&socket, deadline, self.cfg.buffer_size).await;

        debug!(found = hosts.len(), "discovery window closed");
        Ok(hosts.into_vec())
    }
}

/// Where probe matches are read from.
#[async_trait]
trait Datagrams: Send + Sync {
    async fn next(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)>;
}

#[async_trait]
impl Datagrams for UdpSocket {
    async fn next(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        self.recv_from(buf).await
    }
}

/// Reads replies until `deadline`. Receive errors are logged and the window keeps running.
async fn collect_replies(source: &dyn Datagrams, deadline: Instant, buffer_size: usize) -> HostSet {
    let mut hosts = HostSet::default();
    let mut buf = vec![0u8; buffer_size];

    loop {
        match tokio::time::timeout_at(deadline, source.next(&mut buf)).await {
            Err(_elapsed) => break,
            Ok(Ok((len, from))) => {
                let added = hosts.absorb(&buf[..len]);
                trace!(%from, len, added, "discovery reply");
            }
            Ok(Err(e)) => {
                warn!("discovery receive failed: {e}");
                tokio::time::sleep_until(deadline.min(Instant::now() + RECV_RETRY_DELAY)).await;
            }
        }
    }

    hosts
}

/// Insertion-ordered set of responder addresses for one discovery session.
#[derive(Debug, Default)]
pub struct HostSet {
    seen: HashSet<String>,
    ordered: Vec<String>,
}

impl HostSet {
    /// Adds every host advertised in `datagram`, returning how many were new.
    ///
    /// Datagrams that are not probe matches add nothing.
    pub fn absorb(&mut self, datagram: &[u8]) -> usize {
        let hosts = match wsdiscovery::match_hosts(datagram) {
            Ok(hosts) => hosts,
            Err(e) => {
                trace!("ignoring datagram: {e}");
                return 0;
            }
        };

        hosts.into_iter().filter(|host| self.insert(host)).count()
    }

    pub fn insert(&mut self, host: &str) -> bool {
        if self.seen.contains(host) {
            return false;
        }
        self.seen.insert(host.to_string());
        self.ordered.push(host.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.ordered
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

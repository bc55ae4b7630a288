//! WS-Discovery probe and probe-match handling for ONVIF network video transmitters.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use url::Url;
use uuid::Uuid;

use crate::envelope::{self, DecodeError, ProbeMatches};

pub const MULTICAST_ADDR: Ipv4Addr = Ipv4Addr::new(239, 255, 255, 250);
pub const DISCOVERY_PORT: u16 = 3702;

pub const DISCOVERY_TO: &str = "urn:schemas-xmlsoap-org:ws:2005:04:discovery";
pub const PROBE_ACTION: &str = "http://schemas.xmlsoap.org/ws/2005/04/discovery/Probe";
pub const NVT_TYPE: &str = "dn:NetworkVideoTransmitter";

pub fn multicast_group() -> SocketAddr {
    SocketAddr::V4(SocketAddrV4::new(MULTICAST_ADDR, DISCOVERY_PORT))
}

/// A fresh correlation token for one probe.
pub fn new_message_id() -> String {
    Uuid::new_v4().to_string()
}

/// Builds the probe datagram. `message_id` is sent as `uuid:<message_id>`.
pub fn probe_message(message_id: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<e:Envelope xmlns:e="http://www.w3.org/2003/05/soap-envelope"
 xmlns:w="http://schemas.xmlsoap.org/ws/2004/08/addressing"
 xmlns:d="http://schemas.xmlsoap.org/ws/2005/04/discovery">
 <e:Header>
  <w:MessageID>uuid:{message_id}</w:MessageID>
  <w:To>{DISCOVERY_TO}</w:To>
  <w:Action>{PROBE_ACTION}</w:Action>
 </e:Header>
 <e:Body>
  <d:Probe>
   <d:Types>{NVT_TYPE}</d:Types>
  </d:Probe>
 </e:Body>
</e:Envelope>"#
    )
}

/// Extracts the `host[:port]` of every advertised address in a probe-match datagram.
///
/// Duplicates are kept; deduplication spans a whole discovery session and is
/// the caller's business.
pub fn match_hosts(datagram: &[u8]) -> Result<Vec<String>, DecodeError> {
    let matches: ProbeMatches = envelope::decode_bytes(datagram)?;
    let hosts = matches
        .matches
        .iter()
        .flat_map(|probe_match| probe_match.xaddrs.split_whitespace())
        .filter_map(host_of)
        .collect();
    Ok(hosts)
}

/// The authority of `xaddr` without user info, exactly as written.
///
/// Returns `None` for anything that is not an absolute URI with a host.
fn host_of(xaddr: &str) -> Option<String> {
    let url = Url::parse(xaddr).ok()?;
    if url.host_str().is_none_or(str::is_empty) {
        return None;
    }

    let (_, rest) = xaddr.split_once("://")?;
    let authority = rest.split(['/', '?', '#']).next()?;
    let host = authority
        .rsplit_once('@')
        .map_or(authority, |(_userinfo, host)| host);

    (!host.is_empty()).then(|| host.to_string())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

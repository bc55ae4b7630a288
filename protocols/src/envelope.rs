//! # SOAP Envelope Decoder
//!
//! A single envelope model shared by every response this tool reads: ONVIF
//! device and media responses as well as WS-Discovery probe matches.
//!
//! The payload is recognised by which element sits inside `Body`, never by a
//! tag. Element names are matched on their local part, so the namespace
//! prefixes chosen by a vendor (`tds:`, `trt:`, `SOAP-ENV:`, ...) do not matter.
//! Unknown elements are skipped and missing leaves fall back to their defaults.

use quick_xml::Reader;
use quick_xml::events::Event;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed envelope: {0}")]
    Malformed(String),

    #[error("SOAP fault: {0}")]
    Fault(String),

    #[error("envelope has no {0} element")]
    MissingPayload(&'static str),
}

#[derive(Debug, Default, Deserialize)]
struct Envelope {
    #[serde(rename = "Body", default)]
    body: Body,
}

/// Every payload shape the decoder knows about. At most one is expected to be set.
#[derive(Debug, Default, Deserialize)]
pub struct Body {
    #[serde(rename = "GetDeviceInformationResponse")]
    device_information: Option<DeviceInformation>,
    #[serde(rename = "GetProfilesResponse")]
    profiles: Option<ProfileList>,
    #[serde(rename = "GetStreamUriResponse")]
    stream_uri: Option<StreamUri>,
    #[serde(rename = "GetCapabilitiesResponse")]
    capabilities: Option<CapabilitiesResponse>,
    #[serde(rename = "ProbeMatches")]
    probe_matches: Option<ProbeMatches>,
    #[serde(rename = "Fault")]
    fault: Option<Fault>,
}

/// A payload that can be lifted out of a decoded [`Body`].
pub trait EnvelopePayload: Sized {
    /// Local name of the element carrying the payload.
    const ELEMENT: &'static str;

    fn take(body: &mut Body) -> Option<Self>;
}

macro_rules! envelope_payload {
    ($payload:ty, $element:literal, $slot:ident) => {
        impl EnvelopePayload for $payload {
            const ELEMENT: &'static str = $element;

            fn take(body: &mut Body) -> Option<Self> {
                body.$slot.take()
            }
        }
    };
}

envelope_payload!(DeviceInformation, "GetDeviceInformationResponse", device_information);
envelope_payload!(ProfileList, "GetProfilesResponse", profiles);
envelope_payload!(StreamUri, "GetStreamUriResponse", stream_uri);
envelope_payload!(CapabilitiesResponse, "GetCapabilitiesResponse", capabilities);
envelope_payload!(ProbeMatches, "ProbeMatches", probe_matches);

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeviceInformation {
    #[serde(rename = "Manufacturer")]
    pub manufacturer: String,
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "FirmwareVersion")]
    pub firmware_version: String,
    #[serde(rename = "SerialNumber")]
    pub serial_number: String,
    #[serde(rename = "HardwareId")]
    pub hardware_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProfileList {
    #[serde(rename = "Profiles", default)]
    pub profiles: Vec<Profile>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Profile {
    #[serde(rename = "@token", default)]
    pub token: String,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "VideoEncoderConfiguration")]
    pub video_encoder: Option<VideoEncoderConfiguration>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VideoEncoderConfiguration {
    #[serde(rename = "Resolution")]
    pub resolution: Resolution,
    #[serde(rename = "RateControl")]
    pub rate_control: RateControl,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Resolution {
    #[serde(rename = "Width")]
    pub width: u32,
    #[serde(rename = "Height")]
    pub height: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RateControl {
    #[serde(rename = "FrameRateLimit")]
    pub frame_rate_limit: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StreamUri {
    #[serde(rename = "MediaUri")]
    pub media_uri: MediaUri,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MediaUri {
    #[serde(rename = "Uri")]
    pub uri: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CapabilitiesResponse {
    #[serde(rename = "Capabilities")]
    pub capabilities: Capabilities,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Capabilities {
    #[serde(rename = "Media")]
    pub media: Option<ServiceCapability>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServiceCapability {
    #[serde(rename = "XAddr")]
    pub xaddr: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProbeMatches {
    #[serde(rename = "ProbeMatch", default)]
    pub matches: Vec<ProbeMatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProbeMatch {
    /// Whitespace separated list of transport addresses.
    #[serde(rename = "XAddrs")]
    pub xaddrs: String,
}

#[derive(Debug, Default, Deserialize)]
struct Fault {
    // SOAP 1.2
    #[serde(rename = "Reason")]
    reason: Option<FaultReason>,
    // SOAP 1.1
    #[serde(rename = "faultstring")]
    fault_string: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FaultReason {
    #[serde(rename = "Text")]
    text: Option<FaultText>,
}

#[derive(Debug, Default, Deserialize)]
struct FaultText {
    #[serde(rename = "$text", default)]
    value: String,
}

impl Fault {
    fn into_message(self) -> String {
        self.reason
            .and_then(|reason| reason.text)
            .map(|text| text.value)
            .or(self.fault_string)
            .map(|msg| msg.trim().to_string())
            .filter(|msg| !msg.is_empty())
            .unwrap_or_else(|| "unspecified fault".to_string())
    }
}

/// Decodes `xml` and extracts the payload `P`.
///
/// A SOAP fault in place of the payload is reported as [`DecodeError::Fault`].
pub fn decode<P: EnvelopePayload>(xml: &str) -> Result<P, DecodeError> {
    ensure_envelope_root(xml)?;

    let envelope: Envelope =
        quick_xml::de::from_str(xml).map_err(|e| DecodeError::Malformed(e.to_string()))?;
    let mut body = envelope.body;

    if let Some(payload) = P::take(&mut body) {
        return Ok(payload);
    }

    match body.fault {
        Some(fault) => Err(DecodeError::Fault(fault.into_message())),
        None => Err(DecodeError::MissingPayload(P::ELEMENT)),
    }
}

/// Same as [`decode`] for raw bytes, e.g. a UDP datagram.
pub fn decode_bytes<P: EnvelopePayload>(bytes: &[u8]) -> Result<P, DecodeError> {
    let xml = std::str::from_utf8(bytes).map_err(|e| DecodeError::Malformed(e.to_string()))?;
    decode(xml)
}

fn ensure_envelope_root(xml: &str) -> Result<(), DecodeError> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) | Ok(Event::Empty(start)) => {
                let name = start.name();
                return match name.local_name().as_ref() {
                    b"Envelope" => Ok(()),
                    other => Err(DecodeError::Malformed(format!(
                        "unexpected root element <{}>",
                        String::from_utf8_lossy(other)
                    ))),
                };
            }
            Ok(Event::Eof) => return Err(DecodeError::Malformed("no root element".into())),
            Ok(Event::Text(text)) if !text.iter().all(u8::is_ascii_whitespace) => {
                return Err(DecodeError::Malformed("text outside of root element".into()));
            }
            Ok(_) => continue,
            Err(e) => return Err(DecodeError::Malformed(e.to_string())),
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

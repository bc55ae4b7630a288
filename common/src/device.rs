//! # Camera Inventory Model
//!
//! The records produced by querying a single ONVIF device.
//!
//! Empty strings stand for "not reported by the device" and are left out when
//! the records are serialized.

use serde::Serialize;

/// One successfully queried device.
///
/// A device only exists once its identity has been read; anything collected
/// after that point (profiles, stream URIs) may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiscoveredDevice {
    /// The `host:port` the device was queried on.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub address: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub manufacturer: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub model: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub firmware_version: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub serial_number: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub hardware_id: String,
    /// Media profiles in the order the device listed them.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub profiles: Vec<DiscoveredProfile>,
}

/// One media configuration of a device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiscoveredProfile {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Reference token used to request the stream URI of this profile.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub token: String,
    /// `<width>x<height>` of the video encoder, empty without one.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub resolution: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub frame_rate: u32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stream_uri: String,
}

impl DiscoveredDevice {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Default::default()
        }
    }

    /// Number of profiles that ended up with a playable stream URI.
    pub fn streamable_profiles(&self) -> usize {
        self.profiles
            .iter()
            .filter(|profile| !profile.stream_uri.is_empty())
            .count()
    }
}

impl DiscoveredProfile {
    pub fn new(name: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            token: token.into(),
            ..Default::default()
        }
    }

    pub fn with_encoder(mut self, width: u32, height: u32, frame_rate: u32) -> Self {
        self.resolution = format_resolution(width, height);
        self.frame_rate = frame_rate;
        self
    }
}

fn format_resolution(width: u32, height: u32) -> String {
    format!("{width}x{height}")
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

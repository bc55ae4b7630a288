use camscout_common::device::{DiscoveredDevice, DiscoveredProfile};
use colored::*;

use crate::terminal::colors;

pub type Detail = (String, ColoredString);

/// Tree title for a device: vendor and model when known, the address otherwise.
pub fn device_title(device: &DiscoveredDevice) -> String {
    let name = [device.manufacturer.as_str(), device.model.as_str()]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<&str>>()
        .join(" ");

    if name.is_empty() { device.address.clone() } else { name }
}

pub fn device_to_details(device: &DiscoveredDevice) -> Vec<Detail> {
    let mut details: Vec<Detail> = vec![("Address".to_string(), device.address.color(colors::ADDRESS))];

    for (key, value) in [
        ("Firmware", &device.firmware_version),
        ("Serial", &device.serial_number),
        ("Hardware", &device.hardware_id),
    ] {
        if !value.is_empty() {
            details.push((key.to_string(), value.normal()));
        }
    }

    details.extend(device.profiles.iter().map(profile_to_detail));
    details
}

pub fn profile_to_detail(profile: &DiscoveredProfile) -> Detail {
    let mut parts: Vec<String> = vec![profile.name.bold().to_string()];

    if !profile.resolution.is_empty() {
        let video = match profile.frame_rate {
            0 => profile.resolution.clone(),
            fps => format!("{}@{fps}", profile.resolution),
        };
        parts.push(video.color(colors::RESOLUTION).to_string());
    }

    let stream = match profile.stream_uri.as_str() {
        "" => "no stream".color(colors::MISSING),
        uri => uri.color(colors::STREAM_URI),
    };
    parts.push(stream.to_string());

    ("Profile".to_string(), parts.join(" ").normal())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

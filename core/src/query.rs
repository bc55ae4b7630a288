//! # Device Query
//!
//! Builds a [`DiscoveredDevice`] out of three sequential ONVIF exchanges:
//!
//! 1. **Identity** (`GetDeviceInformation`): required. Without it there is no device.
//! 2. **Profiles** (`GetProfiles`): optional. A failure leaves the profile list empty.
//! 3. **Stream URIs** (`GetStreamUri` per profile): optional. A failure leaves
//!    that profile's URI empty and moves on to the next profile.
//!
//! Nothing is retried.

use anyhow::Context;
use camscout_common::config::Credentials;
use camscout_common::device::{DiscoveredDevice, DiscoveredProfile};
use camscout_protocols::envelope::{self, DeviceInformation, EnvelopePayload, Profile, ProfileList, StreamUri};
use camscout_protocols::OnvifRequest;
use tracing::debug;

use crate::client::{ConnectionParams, DeviceClient, DeviceConnector};

/// Queries the device at `address`. Returns `None` when its identity cannot be read.
pub async fn query_device(
    connector: &dyn DeviceConnector,
    address: &str,
    credentials: &Credentials,
) -> Option<DiscoveredDevice> {
    let params = ConnectionParams::new(address, credentials.clone());
    let client = match connector.connect(&params).await {
        Ok(client) => client,
        Err(e) => {
            debug!(%address, "connection failed: {e}");
            return None;
        }
    };
    let client = client.as_ref();

    let identity: DeviceInformation = match fetch(client, &OnvifRequest::GetDeviceInformation).await {
        Ok(identity) => identity,
        Err(e) => {
            debug!(%address, "{e:#}");
            return None;
        }
    };
    let mut device = identity_to_device(address, identity);

    let listing: ProfileList = match fetch(client, &OnvifRequest::GetProfiles).await {
        Ok(listing) => listing,
        Err(e) => {
            debug!(%address, "{e:#}");
            return Some(device);
        }
    };

    for profile in listing.profiles {
        let described = describe_profile(client, profile).await;
        device.profiles.push(described);
    }

    Some(device)
}

async fn describe_profile(client: &dyn DeviceClient, profile: Profile) -> DiscoveredProfile {
    let mut described = DiscoveredProfile::new(profile.name, profile.token);

    if let Some(encoder) = profile.video_encoder {
        described = described.with_encoder(
            encoder.resolution.width,
            encoder.resolution.height,
            encoder.rate_control.frame_rate_limit,
        );
    }

    let request = OnvifRequest::stream_uri(described.token.as_str());
    match fetch::<StreamUri>(client, &request).await {
        Ok(stream) => described.stream_uri = stream.media_uri.uri,
        Err(e) => debug!(token = %described.token, "{e:#}"),
    }

    described
}

fn identity_to_device(address: &str, identity: DeviceInformation) -> DiscoveredDevice {
    DiscoveredDevice {
        address: address.to_string(),
        manufacturer: identity.manufacturer,
        model: identity.model,
        firmware_version: identity.firmware_version,
        serial_number: identity.serial_number,
        hardware_id: identity.hardware_id,
        profiles: Vec::new(),
    }
}

async fn fetch<P: EnvelopePayload>(client: &dyn DeviceClient, request: &OnvifRequest) -> anyhow::Result<P> {
    let body = client
        .call(request)
        .await
        .with_context(|| format!("{} failed", request.action()))?;
    let payload = envelope::decode(&body)
        .with_context(|| format!("{} response not understood", request.action()))?;
    Ok(payload)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

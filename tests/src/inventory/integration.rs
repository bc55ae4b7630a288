#![cfg(test)]
use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use camscout_common::config::Credentials;
use camscout_common::device::DiscoveredProfile;
use camscout_core::discovery::{MulticastProber, ProbeConfig};
use camscout_core::{HttpConnector, InventoryService, query_device};

use crate::util::{
    CannedDevice, CountingProber, FakeCamera, FakeNetwork, Responder, capabilities, device_information, fault,
    probe_match, profiles, stream_uri,
};

const WINDOW: Duration = Duration::from_millis(300);

fn creds() -> Credentials {
    Credentials::new("admin", "admin")
}

fn acme_cam1() -> CannedDevice {
    CannedDevice::default()
        .answer("GetDeviceInformation", device_information("Acme", "Cam1"))
        .answer(
            "GetProfiles",
            profiles(&[("t1", "Main", 1920, 1080, 25), ("t2", "Sub", 640, 480, 10)]),
        )
        .answer("GetStreamUri/t1", stream_uri("rtsp://10.0.0.5/main"))
}

#[tokio::test]
async fn acme_camera_is_described_with_one_missing_stream() {
    let network = FakeNetwork::default().device("10.0.0.5:80", acme_cam1());

    let device = query_device(&network, "10.0.0.5:80", &creds()).await.unwrap();

    assert_eq!(device.manufacturer, "Acme");
    assert_eq!(device.model, "Cam1");
    assert_eq!(device.firmware_version, "1.0.4");
    assert_eq!(device.serial_number, "SN-0001");
    assert_eq!(device.hardware_id, "HW-7");
    assert_eq!(
        device.profiles,
        vec![
            DiscoveredProfile {
                stream_uri: "rtsp://10.0.0.5/main".into(),
                ..DiscoveredProfile::new("Main", "t1").with_encoder(1920, 1080, 25)
            },
            DiscoveredProfile::new("Sub", "t2").with_encoder(640, 480, 10),
        ]
    );
}

#[tokio::test]
async fn identity_fault_excludes_the_device() {
    let network = FakeNetwork::default()
        .device("10.0.0.5:80", acme_cam1())
        .device(
            "10.0.0.6:80",
            CannedDevice::default().answer("GetDeviceInformation", fault("Sender not Authorized")),
        );
    let prober = CountingProber::new(&["10.0.0.6:80", "10.0.0.5:80"]);

    let service = InventoryService::new(Box::new(prober), Box::new(network));
    let devices = service.run(None, &creds(), WINDOW).await.unwrap();

    let addresses: Vec<&str> = devices.iter().map(|d| d.address.as_str()).collect();
    assert_eq!(addresses, vec!["10.0.0.5:80"]);
}

#[tokio::test]
async fn failed_profile_listing_keeps_the_identity() {
    let network = FakeNetwork::default().device(
        "10.0.0.7:80",
        CannedDevice::default()
            .answer("GetDeviceInformation", device_information("Acme", "Cam2"))
            .answer("GetProfiles", fault("Action Not Supported")),
    );

    let device = query_device(&network, "10.0.0.7:80", &creds()).await.unwrap();
    assert_eq!(device.model, "Cam2");
    assert!(device.profiles.is_empty());
}

#[tokio::test]
async fn every_failing_stream_is_absorbed_per_profile() {
    let network = FakeNetwork::default().device(
        "10.0.0.8:80",
        CannedDevice::default()
            .answer("GetDeviceInformation", device_information("Acme", "Cam3"))
            .answer(
                "GetProfiles",
                profiles(&[("a", "A", 1, 1, 1), ("b", "B", 2, 2, 2), ("c", "C", 3, 3, 3)]),
            )
            .answer("GetStreamUri/a", stream_uri("rtsp://x/a"))
            .answer("GetStreamUri/b", "<Envelope>truncated".to_string())
            .answer("GetStreamUri/c", stream_uri("rtsp://x/c")),
    );

    let device = query_device(&network, "10.0.0.8:80", &creds()).await.unwrap();
    let uris: Vec<&str> = device.profiles.iter().map(|p| p.stream_uri.as_str()).collect();
    assert_eq!(uris, vec!["rtsp://x/a", "", "rtsp://x/c"]);
    assert_eq!(device.streamable_profiles(), 2);
}

#[tokio::test]
async fn explicit_address_never_invokes_discovery() {
    let prober = CountingProber::new(&["10.0.0.5:80"]);
    let calls = Arc::clone(&prober.calls);
    let network = FakeNetwork::default().device("10.0.0.9:8080", acme_cam1());
    let connects = Arc::clone(&network.connects);

    let service = InventoryService::new(Box::new(prober), Box::new(network));
    let devices = service.run(Some("10.0.0.9:8080"), &creds(), WINDOW).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(connects.lock().unwrap().as_slice(), ["10.0.0.9:8080"]);
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].address, "10.0.0.9:8080");
}

#[tokio::test]
async fn explicit_address_that_does_not_answer_yields_nothing() {
    let service = InventoryService::new(Box::new(CountingProber::new(&[])), Box::new(FakeNetwork::default()));
    let devices = service.run(Some("10.0.0.9:8080"), &creds(), WINDOW).await.unwrap();
    assert!(devices.is_empty());
}

#[tokio::test]
async fn every_candidate_is_queried_once_in_discovery_order() {
    let prober = CountingProber::new(&["10.0.0.3:80", "10.0.0.1:80", "10.0.0.2:80"]);
    let calls = Arc::clone(&prober.calls);
    let network = FakeNetwork::default()
        .device("10.0.0.1:80", acme_cam1())
        .device("10.0.0.3:80", acme_cam1());
    let connects = Arc::clone(&network.connects);

    let service = InventoryService::new(Box::new(prober), Box::new(network));
    let devices = service.run(None, &creds(), WINDOW).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(connects.lock().unwrap().as_slice(), ["10.0.0.3:80", "10.0.0.1:80", "10.0.0.2:80"]);
    let addresses: Vec<&str> = devices.iter().map(|d| d.address.as_str()).collect();
    assert_eq!(addresses, vec!["10.0.0.3:80", "10.0.0.1:80"]);
}

/// Discovery over UDP and queries over HTTP, all on loopback.
#[tokio::test]
async fn discovered_camera_is_described_end_to_end() {
    let camera = FakeCamera::start(
        [
            ("GetCapabilities", capabilities("http://192.168.100.2/onvif/media")),
            ("GetDeviceInformation", device_information("Acme", "Cam1")),
            ("GetProfiles", profiles(&[("t1", "Main", 1920, 1080, 25)])),
            ("GetStreamUri/t1", stream_uri("rtsp://127.0.0.1:554/main")),
        ]
        .into_iter()
        .map(|(key, body)| (key.to_string(), (200, body)))
        .collect::<HashMap<_, _>>(),
    )
    .await;

    let xaddr = format!("http://{}/onvif/device_service", camera.address());
    let responder = Responder::start(vec![probe_match(&xaddr), probe_match(&xaddr)]).await;

    let prober = MulticastProber::with_config(ProbeConfig {
        target: responder.addr,
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        ..Default::default()
    });
    let connector = HttpConnector::new(Duration::from_secs(2)).unwrap();
    let service = InventoryService::new(Box::new(prober), Box::new(connector));

    let devices = service.run(None, &creds(), WINDOW).await.unwrap();

    assert_eq!(devices.len(), 1);
    let device = &devices[0];
    assert_eq!(device.address, camera.address());
    assert_eq!(device.model, "Cam1");
    assert_eq!(device.profiles.len(), 1);
    assert_eq!(device.profiles[0].resolution, "1920x1080");
    assert_eq!(device.profiles[0].stream_uri, "rtsp://127.0.0.1:554/main");

    let media_paths = camera
        .recorded()
        .await
        .into_iter()
        .filter(|r| r.path == "/onvif/media")
        .count();
    assert_eq!(media_paths, 2);
}

#![cfg(test)]
use std::collections::HashMap;
use std::time::Duration;

use camscout_common::config::Credentials;
use camscout_core::client::{ClientError, ConnectionParams, DeviceConnector, HttpConnector};
use camscout_protocols::OnvifRequest;

use crate::util::{FakeCamera, capabilities, device_information, stream_uri};

fn connector() -> HttpConnector {
    HttpConnector::new(Duration::from_secs(2)).unwrap()
}

fn routes(entries: Vec<(&str, u16, String)>) -> HashMap<String, (u16, String)> {
    entries
        .into_iter()
        .map(|(key, status, body)| (key.to_string(), (status, body)))
        .collect()
}

#[tokio::test]
async fn media_calls_follow_the_advertised_path_on_the_queried_host() {
    let camera = FakeCamera::start(routes(vec![
        ("GetCapabilities", 200, capabilities("http://192.168.100.2:80/onvif/Media")),
        ("GetDeviceInformation", 200, device_information("Acme", "Cam1")),
        ("GetStreamUri/t1", 200, stream_uri("rtsp://10.0.0.5/main")),
    ]))
    .await;

    let params = ConnectionParams::new(camera.address(), Credentials::new("admin", "admin"));
    let client = connector().connect(&params).await.unwrap();

    let identity = client.call(&OnvifRequest::GetDeviceInformation).await.unwrap();
    assert!(identity.contains("Cam1"));
    let stream = client.call(&OnvifRequest::stream_uri("t1")).await.unwrap();
    assert!(stream.contains("rtsp://10.0.0.5/main"));

    let paths: Vec<String> = camera.recorded().await.into_iter().map(|r| r.path).collect();
    assert_eq!(paths, vec!["/onvif/device_service", "/onvif/device_service", "/onvif/Media"]);
}

#[tokio::test]
async fn media_calls_use_the_advertised_port() {
    let media = FakeCamera::start(routes(vec![("GetProfiles", 200, crate::util::profiles(&[]))])).await;
    let media_port = media.address().rsplit_once(':').unwrap().1.to_string();
    let camera = FakeCamera::start(routes(vec![(
        "GetCapabilities",
        200,
        capabilities(&format!("http://192.168.100.2:{media_port}/onvif/Media")),
    )]))
    .await;

    let params = ConnectionParams::new(camera.address(), Credentials::default());
    let client = connector().connect(&params).await.unwrap();
    client.call(&OnvifRequest::GetProfiles).await.unwrap();

    let paths: Vec<String> = media.recorded().await.into_iter().map(|r| r.path).collect();
    assert_eq!(paths, vec!["/onvif/Media"]);
    assert_eq!(camera.recorded().await.len(), 1);
}

#[tokio::test]
async fn unreadable_capabilities_fall_back_to_the_default_media_path() {
    let camera = FakeCamera::start(routes(vec![
        ("GetCapabilities", 200, "<html>ok</html>".to_string()),
        ("GetProfiles", 200, crate::util::profiles(&[])),
    ]))
    .await;

    let params = ConnectionParams::new(camera.address(), Credentials::default());
    let client = connector().connect(&params).await.unwrap();
    client.call(&OnvifRequest::GetProfiles).await.unwrap();

    let last = camera.recorded().await.pop().unwrap();
    assert_eq!(last.path, "/onvif/media_service");
}

#[tokio::test]
async fn rejected_capabilities_mean_no_client() {
    let camera = FakeCamera::start(HashMap::new()).await;

    let params = ConnectionParams::new(camera.address(), Credentials::new("admin", "admin"));
    let err = connector().connect(&params).await.err().unwrap();
    assert!(matches!(err, ClientError::Unavailable(_)), "got {err:?}");
}

#[tokio::test]
async fn error_status_bodies_are_handed_back_for_decoding() {
    let camera = FakeCamera::start(routes(vec![
        ("GetCapabilities", 200, capabilities("http://192.168.100.2/onvif/Media")),
        ("GetDeviceInformation", 401, crate::util::fault("Sender not Authorized")),
    ]))
    .await;

    let params = ConnectionParams::new(camera.address(), Credentials::new("admin", "wrong"));
    let client = connector().connect(&params).await.unwrap();

    let body = client.call(&OnvifRequest::GetDeviceInformation).await.unwrap();
    assert!(body.contains("Sender not Authorized"));
}

#[tokio::test]
async fn credentials_travel_as_a_password_digest() {
    let camera = FakeCamera::start(routes(vec![(
        "GetCapabilities",
        200,
        capabilities("http://192.168.100.2/onvif/Media"),
    )]))
    .await;

    let params = ConnectionParams::new(camera.address(), Credentials::new("operator", "s3cret"));
    connector().connect(&params).await.unwrap();

    let body = camera.recorded().await.remove(0).body;
    assert!(body.contains("<wsse:Username>operator</wsse:Username>"));
    assert!(body.contains("#PasswordDigest"));
    assert!(!body.contains("s3cret"));
}

#[tokio::test]
async fn empty_username_sends_no_security_header() {
    let camera = FakeCamera::start(routes(vec![(
        "GetCapabilities",
        200,
        capabilities("http://192.168.100.2/onvif/Media"),
    )]))
    .await;

    let params = ConnectionParams::new(camera.address(), Credentials::new("", ""));
    connector().connect(&params).await.unwrap();

    let body = camera.recorded().await.remove(0).body;
    assert!(!body.contains("wsse:Security"));
}

#[tokio::test]
async fn unreachable_device_is_a_transport_error() {
    // Bind and drop to get a port nobody listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();

    let params = ConnectionParams::new(addr.to_string(), Credentials::default());
    let err = connector().connect(&params).await.err().unwrap();
    assert!(matches!(err, ClientError::Transport(_)), "got {err:?}");
}

#[tokio::test]
async fn malformed_address_is_rejected_before_any_request() {
    let params = ConnectionParams::new("http://10.0.0.9/onvif", Credentials::default());
    let err = connector().connect(&params).await.err().unwrap();
    assert!(matches!(err, ClientError::InvalidAddress(_)), "got {err:?}");
}

//! SOAP over plain HTTP, the way ONVIF cameras expect it.
//!
//! Connecting asks the device for its capabilities first. A device that does
//! not answer that request with a success status is not considered ONVIF.
//! The advertised media service path is kept, but its host is replaced with
//! the address we reached the device on: cameras behind NAT or with several
//! interfaces often advertise an address we cannot reach. An explicit port in
//! the advertisement wins over the queried one.

use std::time::Duration;

use async_trait::async_trait;
use camscout_common::config::Credentials;
use camscout_protocols::envelope::{self, CapabilitiesResponse};
use camscout_protocols::soap::{self, OnvifRequest, Service, UsernameToken};
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, trace};
use url::Url;

use super::{ClientError, ConnectionParams, DeviceClient, DeviceConnector};

const DEVICE_SERVICE_PATH: &str = "/onvif/device_service";
const MEDIA_SERVICE_PATH: &str = "/onvif/media_service";
const SOAP_CONTENT_TYPE: &str = "application/soap+xml; charset=utf-8";

pub struct HttpConnector {
    http: reqwest::Client,
}

impl HttpConnector {
    /// `request_timeout` bounds every single SOAP exchange.
    pub fn new(request_timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(request_timeout).build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl DeviceConnector for HttpConnector {
    async fn connect(&self, params: &ConnectionParams) -> Result<Box<dyn DeviceClient>, ClientError> {
        let device_url = service_url(&params.address, DEVICE_SERVICE_PATH)?;
        let mut client = HttpDeviceClient {
            http: self.http.clone(),
            credentials: params.credentials.clone(),
            media_url: service_url(&params.address, MEDIA_SERVICE_PATH)?,
            device_url,
        };

        let (status, body) = client.post(&OnvifRequest::GetCapabilities).await?;
        if !status.is_success() {
            return Err(ClientError::Unavailable(format!(
                "{} answered GetCapabilities with HTTP {status}",
                params.address
            )));
        }

        match envelope::decode::<CapabilitiesResponse>(&body) {
            Ok(response) => {
                if let Some(url) = response
                    .capabilities
                    .media
                    .and_then(|media| rebase(&media.xaddr, &params.address))
                {
                    client.media_url = url;
                }
            }
            Err(e) => debug!(address = %params.address, "capabilities not understood, using default media path: {e}"),
        }

        trace!(device = %client.device_url, media = %client.media_url, "ONVIF endpoints");
        Ok(Box::new(client))
    }
}

pub struct HttpDeviceClient {
    http: reqwest::Client,
    credentials: Credentials,
    device_url: Url,
    media_url: Url,
}

impl HttpDeviceClient {
    fn endpoint(&self, service: Service) -> &Url {
        match service {
            Service::Device => &self.device_url,
            Service::Media => &self.media_url,
        }
    }

    async fn post(&self, request: &OnvifRequest) -> Result<(StatusCode, String), ClientError> {
        let token = (!self.credentials.is_anonymous())
            .then(|| UsernameToken::new(&self.credentials.username, &self.credentials.password));
        let envelope = soap::build_envelope(request, token.as_ref());
        let url = self.endpoint(request.service()).clone();

        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, SOAP_CONTENT_TYPE)
            .body(envelope)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(action = request.action(), %status, len = body.len(), "ONVIF response");

        Ok((status, body))
    }
}

#[async_trait]
impl DeviceClient for HttpDeviceClient {
    async fn call(&self, request: &OnvifRequest) -> Result<String, ClientError> {
        let (_status, body) = self.post(request).await?;
        Ok(body)
    }
}

fn service_url(address: &str, path: &str) -> Result<Url, ClientError> {
    let invalid = || ClientError::InvalidAddress(address.to_string());
    if address.is_empty() || address.contains(['/', '?', '#', '@']) {
        return Err(invalid());
    }

    let url = Url::parse(&format!("http://{address}{path}")).map_err(|_| invalid())?;
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(invalid()),
    }
}

/// The advertised service path and explicit port, on the host we queried.
fn rebase(xaddr: &str, address: &str) -> Option<Url> {
    let advertised = Url::parse(xaddr).ok()?;
    let mut url = service_url(address, advertised.path()).ok()?;
    url.set_query(advertised.query());
    if let Some(port) = advertised.port() {
        url.set_port(Some(port)).ok()?;
    }
    Some(url)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

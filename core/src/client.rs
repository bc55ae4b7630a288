//! The device protocol client capability.
//!
//! The query orchestration only needs two things from a device: a way to
//! connect and a way to issue an ONVIF operation and get the raw response body
//! back. Both sit behind traits so the orchestration can run against canned
//! responses; [`http`] provides the implementation used against real cameras.

use async_trait::async_trait;
use camscout_common::config::Credentials;
use camscout_protocols::OnvifRequest;
use thiserror::Error;

pub mod http;

pub use http::HttpConnector;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid device address '{0}'")]
    InvalidAddress(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Unavailable(String),
}

/// Endpoint and credentials for one device.
#[derive(Debug, Clone)]
pub struct ConnectionParams {
    /// `host[:port]` of the device.
    pub address: String,
    pub credentials: Credentials,
}

impl ConnectionParams {
    pub fn new(address: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            address: address.into(),
            credentials,
        }
    }
}

#[async_trait]
pub trait DeviceConnector: Send + Sync {
    /// Builds a client for one device. Fails when the address is unusable or
    /// the device does not respond like an ONVIF device.
    async fn connect(&self, params: &ConnectionParams) -> Result<Box<dyn DeviceClient>, ClientError>;
}

#[async_trait]
pub trait DeviceClient: Send + Sync {
    /// Issues `request` and returns the raw response body, SOAP faults included.
    async fn call(&self, request: &OnvifRequest) -> Result<String, ClientError>;
}

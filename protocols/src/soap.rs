//! ONVIF SOAP 1.2 request bodies and the WS-Security UsernameToken header.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use sha1::{Digest, Sha1};

const SOAP_ENV: &str = "http://www.w3.org/2003/05/soap-envelope";
const NS_DEVICE: &str = "http://www.onvif.org/ver10/device/wsdl";
const NS_MEDIA: &str = "http://www.onvif.org/ver10/media/wsdl";
const NS_SCHEMA: &str = "http://www.onvif.org/ver10/schema";
const NS_WSSE: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-secext-1.0.xsd";
const NS_WSU: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-utility-1.0.xsd";
const PASSWORD_DIGEST: &str = "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-username-token-profile-1.0#PasswordDigest";
const NONCE_ENCODING: &str = "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-soap-message-security-1.0#Base64Binary";

/// The ONVIF service an operation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Device,
    Media,
}

/// Transport descriptor for `GetStreamUri`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSetup {
    pub stream: String,
    pub protocol: String,
}

impl StreamSetup {
    /// Unicast RTP tunnelled over RTSP.
    pub fn rtsp_unicast() -> Self {
        Self {
            stream: "RTP-Unicast".to_string(),
            protocol: "RTSP".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OnvifRequest {
    GetCapabilities,
    GetDeviceInformation,
    GetProfiles,
    GetStreamUri {
        profile_token: String,
        setup: StreamSetup,
    },
}

impl OnvifRequest {
    pub fn stream_uri(profile_token: impl Into<String>) -> Self {
        OnvifRequest::GetStreamUri {
            profile_token: profile_token.into(),
            setup: StreamSetup::rtsp_unicast(),
        }
    }

    pub fn service(&self) -> Service {
        match self {
            OnvifRequest::GetCapabilities | OnvifRequest::GetDeviceInformation => Service::Device,
            OnvifRequest::GetProfiles | OnvifRequest::GetStreamUri { .. } => Service::Media,
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            OnvifRequest::GetCapabilities => "GetCapabilities",
            OnvifRequest::GetDeviceInformation => "GetDeviceInformation",
            OnvifRequest::GetProfiles => "GetProfiles",
            OnvifRequest::GetStreamUri { .. } => "GetStreamUri",
        }
    }

    fn body(&self) -> String {
        match self {
            OnvifRequest::GetCapabilities => format!(
                r#"<tds:GetCapabilities xmlns:tds="{NS_DEVICE}"><tds:Category>All</tds:Category></tds:GetCapabilities>"#
            ),
            OnvifRequest::GetDeviceInformation => {
                format!(r#"<tds:GetDeviceInformation xmlns:tds="{NS_DEVICE}"/>"#)
            }
            OnvifRequest::GetProfiles => format!(r#"<trt:GetProfiles xmlns:trt="{NS_MEDIA}"/>"#),
            OnvifRequest::GetStreamUri {
                profile_token,
                setup,
            } => format!(
                r#"<trt:GetStreamUri xmlns:trt="{NS_MEDIA}" xmlns:tt="{NS_SCHEMA}"><trt:StreamSetup><tt:Stream>{stream}</tt:Stream><tt:Transport><tt:Protocol>{protocol}</tt:Protocol></tt:Transport></trt:StreamSetup><trt:ProfileToken>{token}</trt:ProfileToken></trt:GetStreamUri>"#,
                stream = xml_escape(&setup.stream),
                protocol = xml_escape(&setup.protocol),
                token = xml_escape(profile_token),
            ),
        }
    }
}

/// WS-Security UsernameToken with a password digest.
///
/// `PasswordDigest = Base64(SHA1(nonce + created + password))`
#[derive(Debug, Clone)]
pub struct UsernameToken {
    username: String,
    digest: String,
    nonce: String,
    created: String,
}

impl UsernameToken {
    /// A token with a fresh random nonce, created now.
    pub fn new(username: &str, password: &str) -> Self {
        let nonce: [u8; 16] = rand::random();
        Self::with_nonce(username, password, &nonce, Utc::now())
    }

    pub fn with_nonce(username: &str, password: &str, nonce: &[u8], created: DateTime<Utc>) -> Self {
        let created = created.format("%Y-%m-%dT%H:%M:%SZ").to_string();

        let mut sha = Sha1::new();
        sha.update(nonce);
        sha.update(created.as_bytes());
        sha.update(password.as_bytes());

        Self {
            username: username.to_string(),
            digest: BASE64.encode(sha.finalize()),
            nonce: BASE64.encode(nonce),
            created,
        }
    }

    fn header(&self) -> String {
        format!(
            r#"<wsse:Security s:mustUnderstand="1" xmlns:wsse="{NS_WSSE}" xmlns:wsu="{NS_WSU}"><wsse:UsernameToken><wsse:Username>{user}</wsse:Username><wsse:Password Type="{PASSWORD_DIGEST}">{digest}</wsse:Password><wsse:Nonce EncodingType="{NONCE_ENCODING}">{nonce}</wsse:Nonce><wsu:Created>{created}</wsu:Created></wsse:UsernameToken></wsse:Security>"#,
            user = xml_escape(&self.username),
            digest = self.digest,
            nonce = self.nonce,
            created = self.created,
        )
    }
}

/// Wraps `request` in a SOAP 1.2 envelope, with a security header when a token is given.
pub fn build_envelope(request: &OnvifRequest, token: Option<&UsernameToken>) -> String {
    let header = token.map(UsernameToken::header).unwrap_or_default();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><s:Envelope xmlns:s="{SOAP_ENV}"><s:Header>{header}</s:Header><s:Body>{body}</s:Body></s:Envelope>"#,
        body = request.body()
    )
}

pub fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

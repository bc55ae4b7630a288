use std::fmt;
use std::time::Duration;

pub const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(2);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct Config {
    /// How long the discovery window stays open after the probe is sent.
    pub discovery_timeout: Duration,
    /// Upper bound for a single SOAP exchange with a device.
    ///
    /// This is the only thing that stops a query against an unresponsive camera.
    pub request_timeout: Duration,
    pub quiet: u8,
    pub no_banner: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            discovery_timeout: DEFAULT_DISCOVERY_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            quiet: 0,
            no_banner: false,
        }
    }
}

/// Username and password sent with every device request.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.username.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

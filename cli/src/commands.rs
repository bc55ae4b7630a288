pub mod inventory;

use std::time::Duration;

use camscout_common::config::{Config, Credentials, DEFAULT_DISCOVERY_TIMEOUT, DEFAULT_REQUEST_TIMEOUT};
use clap::{ArgAction, Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON array on stdout
    Json,
    /// Human readable report
    Text,
}

#[derive(Parser, Debug)]
#[command(name = "camscout", version)]
#[command(about = "Finds ONVIF cameras on the local network and lists their stream URIs.")]
pub struct CommandLine {
    /// Query this device directly instead of running discovery
    #[arg(short, long, value_name = "HOST:PORT")]
    pub address: Option<String>,

    /// Username for WS-Security authentication (empty disables it)
    #[arg(short, long, default_value = "admin")]
    pub username: String,

    /// Password for WS-Security authentication
    #[arg(short, long, default_value = "admin", hide_default_value = true)]
    pub password: String,

    /// How long to listen for discovery replies, in milliseconds
    #[arg(short = 't', long = "timeout", value_name = "MS", default_value_t = millis(DEFAULT_DISCOVERY_TIMEOUT))]
    pub timeout_ms: u64,

    /// Upper bound for every request sent to a device, in milliseconds
    #[arg(long = "request-timeout", value_name = "MS", default_value_t = millis(DEFAULT_REQUEST_TIMEOUT))]
    pub request_timeout_ms: u64,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub output: OutputFormat,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Less output (-q warnings only, -qq also hides device trees)
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,

    /// Do not print the banner in text mode
    #[arg(long)]
    pub no_banner: bool,
}

const fn millis(duration: Duration) -> u64 {
    duration.as_millis() as u64
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn config(&self) -> Config {
        Config {
            discovery_timeout: Duration::from_millis(self.timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            quiet: self.quiet,
            no_banner: self.no_banner,
        }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.username.as_str(), self.password.as_str())
    }

    /// The device to query directly; `None` (also for an empty `-a`) runs discovery.
    pub fn target(&self) -> Option<&str> {
        self.address.as_deref().filter(|address| !address.is_empty())
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

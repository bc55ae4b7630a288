//! Wire formats spoken by camscout.
//!
//! * [`wsdiscovery`]: multicast probe and probe-match parsing.
//! * [`soap`]: ONVIF request envelopes and WS-Security tokens.
//! * [`envelope`]: the shared response decoder.

pub mod envelope;
pub mod soap;
pub mod wsdiscovery;

pub use envelope::{DecodeError, EnvelopePayload, decode};
pub use soap::{OnvifRequest, Service, StreamSetup, UsernameToken};

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Anything the core can have a request in flight for
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Resource {
    Channels,
    DeviceInfo,
    Wifi,
    SaveWifi,
    ChannelStatus,
    SaveChannel(String),
    SwitchChannel(String),
}

impl Resource {
    /// Fetches issued by `Initialize`
    pub const INITIAL: [Resource; 3] = [Resource::Channels, Resource::DeviceInfo, Resource::Wifi];

    /// Servo status is refreshed in the background and never shows the spinner
    pub fn shows_loading(&self) -> bool {
        !matches!(self, Resource::ChannelStatus)
    }
}

/// Set of resources with a request in flight
///
/// A resource is added when its request is issued and removed when the
/// response event is handled, whatever the outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InFlight(BTreeSet<Resource>);

impl InFlight {
    /// Mark `resource` busy. Returns false if it already was.
    pub fn try_begin(&mut self, resource: Resource) -> bool {
        self.0.insert(resource)
    }

    pub fn finish(&mut self, resource: &Resource) {
        self.0.remove(resource);
    }

    pub fn is_busy(&self, resource: &Resource) -> bool {
        self.0.contains(resource)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn shows_loading(&self) -> bool {
        self.0.iter().any(Resource::shows_loading)
    }
}

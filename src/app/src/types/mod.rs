//! Domain-based type organization
//!
//! - channel: channel configuration and switch actions
//! - layout: board channel table and capabilities
//! - wifi: Wi-Fi configuration
//! - status: device status report
//! - sync: in-flight request tracking

pub mod channel;
pub mod layout;
pub mod status;
pub mod sync;
pub mod wifi;

pub use channel::*;
pub use layout::*;
pub use status::*;
pub use sync::*;
pub use wifi::*;

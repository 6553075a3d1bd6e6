pub use rusb;

use std::time::Duration;

pub mod commands;
pub mod device;
pub mod error;
pub mod labpro;
pub mod response;
pub mod session;

mod retry;

pub use crate::device::base::{BulkPipe, EndpointPair};
pub use crate::labpro::LabPro;
pub use crate::session::AcquisitionSession;

/// USB vendor ID shared by Vernier interfaces.
pub const VID_VERNIER: u16 = 0x08f7;
/// USB product ID of the LabPro.
pub const PID_LABPRO: u16 = 0x0001;

/// The LabPro's fixed USB packet size; all bulk traffic is framed to this.
pub const PACKET_SIZE: usize = 64;

/// Pause between consecutive bulk packets. The LabPro cannot keep up with
/// back-to-back transfers.
pub const INTER_PACKET_DELAY: Duration = Duration::from_millis(50);

/// Default per-transfer timeout (the value freelab uses).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Discovery never returns more than this many devices.
pub const MAX_DEVICES: usize = 5;

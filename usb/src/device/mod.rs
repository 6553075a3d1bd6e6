pub mod base;
pub mod libusb;

pub use base::{BulkPipe, EndpointInfo, EndpointPair};
pub use libusb::{list_labpros, UsbPipe};

use log::{debug, error};
use rusb::{Direction, TransferType};
use std::time::Duration;

/// Blocking bulk transport against one LabPro's endpoint pair.
///
/// This is the seam between the protocol layer and libusb: the real
/// implementation lives in [`device::libusb`](crate::device::libusb),
/// and tests drive the protocol layer through scripted pipes instead of
/// a live bus. Buffers handed to `write_bulk` are borrowed and never
/// modified.
pub trait BulkPipe {
    /// Write one packet to the bulk-out endpoint; returns bytes transferred.
    fn write_bulk(&mut self, data: &[u8], timeout: Duration) -> Result<usize, rusb::Error>;

    /// Read up to `buf.len()` bytes from the bulk-in endpoint; returns
    /// bytes transferred.
    fn read_bulk(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize, rusb::Error>;

    /// Release the claimed interface. Invoked on close and when the
    /// device vanishes.
    fn release(&mut self) -> Result<(), rusb::Error>;
}

/// The bulk endpoint pair found on interface 0, alt-setting 0.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EndpointPair {
    pub input: u8,
    pub output: u8,
}

/// One endpoint descriptor, reduced to what classification needs.
#[derive(Copy, Clone, Debug)]
pub struct EndpointInfo {
    pub address: u8,
    pub direction: Direction,
    pub transfer_type: TransferType,
}

/// Classify a candidate's endpoints. The LabPro exposes exactly one
/// bulk-in and one bulk-out endpoint; anything else disqualifies the
/// candidate.
pub(crate) fn select_endpoints(
    endpoints: impl IntoIterator<Item = EndpointInfo>,
) -> Option<EndpointPair> {
    let mut input = None;
    let mut output = None;

    for endpoint in endpoints {
        if endpoint.transfer_type != TransferType::Bulk {
            error!(
                "unexpected non-bulk endpoint {:#04x} ({:?})",
                endpoint.address, endpoint.transfer_type
            );
            return None;
        }
        let slot = match endpoint.direction {
            Direction::In => &mut input,
            Direction::Out => &mut output,
        };
        if slot.is_some() {
            error!(
                "more than one bulk {:?} endpoint, rejecting candidate",
                endpoint.direction
            );
            return None;
        }
        debug!(
            "using endpoint {:#04x} as bulk {:?} endpoint",
            endpoint.address, endpoint.direction
        );
        *slot = Some(endpoint.address);
    }

    match (input, output) {
        (Some(input), Some(output)) => Some(EndpointPair { input, output }),
        _ => {
            error!("bulk endpoint pair not found");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bulk(address: u8, direction: Direction) -> EndpointInfo {
        EndpointInfo {
            address,
            direction,
            transfer_type: TransferType::Bulk,
        }
    }

    #[test]
    fn selects_a_bulk_pair() {
        let pair = select_endpoints([bulk(0x81, Direction::In), bulk(0x02, Direction::Out)]);
        assert_eq!(
            pair,
            Some(EndpointPair {
                input: 0x81,
                output: 0x02
            })
        );
    }

    #[test]
    fn a_missing_direction_rejects() {
        assert_eq!(select_endpoints([bulk(0x81, Direction::In)]), None);
        assert_eq!(select_endpoints([bulk(0x02, Direction::Out)]), None);
        let no_endpoints: [EndpointInfo; 0] = [];
        assert_eq!(select_endpoints(no_endpoints), None);
    }

    #[test]
    fn a_non_bulk_endpoint_rejects() {
        let interrupt = EndpointInfo {
            address: 0x83,
            direction: Direction::In,
            transfer_type: TransferType::Interrupt,
        };
        assert_eq!(
            select_endpoints([interrupt, bulk(0x02, Direction::Out)]),
            None
        );
    }

    #[test]
    fn duplicate_directions_reject() {
        assert_eq!(
            select_endpoints([
                bulk(0x81, Direction::In),
                bulk(0x82, Direction::In),
                bulk(0x02, Direction::Out)
            ]),
            None
        );
    }
}

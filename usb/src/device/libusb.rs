use crate::device::base::{select_endpoints, BulkPipe, EndpointInfo, EndpointPair};
use crate::labpro::LabPro;
use crate::{MAX_DEVICES, PID_LABPRO, VID_VERNIER};
use log::{debug, error, info};
use rusb::{Device, DeviceHandle, UsbContext};
use std::time::Duration;

/// rusb-backed transport for one opened, claimed LabPro.
pub struct UsbPipe<C: UsbContext> {
    handle: DeviceHandle<C>,
    endpoints: EndpointPair,
}

impl<C: UsbContext> BulkPipe for UsbPipe<C> {
    fn write_bulk(&mut self, data: &[u8], timeout: Duration) -> Result<usize, rusb::Error> {
        self.handle.write_bulk(self.endpoints.output, data, timeout)
    }

    fn read_bulk(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize, rusb::Error> {
        self.handle.read_bulk(self.endpoints.input, buf, timeout)
    }

    fn release(&mut self) -> Result<(), rusb::Error> {
        self.handle.release_interface(0)
    }
}

/// Enumerate the bus and open every LabPro found, up to [`MAX_DEVICES`].
///
/// Each accepted device comes back opened, claimed, and ready for
/// transfers; close the ones you will not use. A candidate that cannot
/// be opened, claimed, or that exposes the wrong endpoints is skipped
/// with everything acquired for it released again. Finding nothing is
/// not an error, the result is simply empty.
///
/// The context is caller-owned; the library keeps no global state.
pub fn list_labpros<C: UsbContext>(context: &C) -> Result<Vec<LabPro<UsbPipe<C>>>, rusb::Error> {
    let mut found = Vec::new();

    for device in context.devices()?.iter() {
        if found.len() == MAX_DEVICES {
            debug!("accepted {MAX_DEVICES} devices, ignoring the rest of the bus");
            break;
        }

        let descriptor = match device.device_descriptor() {
            Ok(descriptor) => descriptor,
            Err(_) => continue,
        };
        if descriptor.vendor_id() != VID_VERNIER || descriptor.product_id() != PID_LABPRO {
            continue;
        }

        info!(
            "found LabPro at bus {:03} address {:03}",
            device.bus_number(),
            device.address()
        );
        match open_candidate(&device) {
            Ok(pipe) => found.push(LabPro::new(pipe)),
            Err(error) => error!("skipping LabPro candidate: {error}"),
        }
    }

    Ok(found)
}

/// Open, configure and claim one candidate. Every failure path releases
/// whatever was acquired for it; the handle itself closes on drop.
fn open_candidate<C: UsbContext>(device: &Device<C>) -> Result<UsbPipe<C>, rusb::Error> {
    let handle = device.open()?;

    if handle.kernel_driver_active(0).unwrap_or(false) {
        handle.detach_kernel_driver(0)?;
        info!("detached kernel driver from interface 0");
    }

    handle.set_active_configuration(1)?;
    handle.claim_interface(0)?;

    let endpoints = match bulk_endpoints(device) {
        Ok(endpoints) => endpoints,
        Err(error) => {
            let _ = handle.release_interface(0);
            return Err(error);
        }
    };

    Ok(UsbPipe { handle, endpoints })
}

/// Read the endpoint descriptors of interface 0, alt-setting 0, and
/// require the LabPro's bulk-in/bulk-out pair.
fn bulk_endpoints<C: UsbContext>(device: &Device<C>) -> Result<EndpointPair, rusb::Error> {
    let config = device.config_descriptor(0)?;
    let interface = config.interfaces().next().ok_or(rusb::Error::NotFound)?;
    let alt_setting = interface.descriptors().next().ok_or(rusb::Error::NotFound)?;

    let endpoints: Vec<EndpointInfo> = alt_setting
        .endpoint_descriptors()
        .map(|endpoint| EndpointInfo {
            address: endpoint.address(),
            direction: endpoint.direction(),
            transfer_type: endpoint.transfer_type(),
        })
        .collect();

    select_endpoints(endpoints).ok_or(rusb::Error::NotFound)
}

use crate::commands::Command;
use crate::device::base::BulkPipe;
use crate::error::{LabProError, ProtocolError, ReadError, SendError, TransferFault};
use crate::response::{parse_list, trim_response};
use crate::retry::{retry_bounded, Attempt};
use crate::{DEFAULT_TIMEOUT, INTER_PACKET_DELAY, PACKET_SIZE};
use log::{debug, warn};
use std::thread::sleep;
use std::time::{Duration, Instant};

/// Ceiling for waiting out FastMode before a status query. FastMode can
/// only run for a fraction of a second before the LabPro's RAM fills up,
/// so hitting this means the flag is stale.
pub const FASTMODE_WAIT_CEILING: Duration = Duration::from_secs(5);

/// Callback invoked after a transfer hits a vanished device, once the
/// device state has been reconciled.
pub type DisconnectHook = Box<dyn FnMut() + Send>;

/// One LabPro interface.
///
/// Produced open and claimed by discovery
/// ([`list_labpros`](crate::device::libusb::list_labpros)); [`close`](Self::close)
/// releases the USB side but keeps the record itself alive for the caller.
///
/// A `LabPro` must only ever be driven from one thread at a time. Nothing
/// in here locks: transfers block the calling thread for up to the
/// configured timeout, and interleaving two callers on the same device
/// would interleave their packets on the wire. Distinct devices are
/// fully independent.
pub struct LabPro<P: BulkPipe> {
    pipe: P,
    is_open: bool,
    is_busy: bool,
    is_collecting_data: bool,
    is_fastmode_running: bool,
    timeout: Duration,
    disconnect_hook: Option<DisconnectHook>,
    disconnecting: bool,
}

impl<P: BulkPipe> LabPro<P> {
    /// Wrap an opened, claimed transport. The device starts in the
    /// `open` state with the default 5 s transfer timeout.
    pub fn new(pipe: P) -> Self {
        Self {
            pipe,
            is_open: true,
            is_busy: false,
            is_collecting_data: false,
            is_fastmode_running: false,
            timeout: DEFAULT_TIMEOUT,
            disconnect_hook: None,
            disconnecting: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn is_busy(&self) -> bool {
        self.is_busy
    }

    pub fn set_busy(&mut self, busy: bool) {
        self.is_busy = busy;
    }

    pub fn is_collecting_data(&self) -> bool {
        self.is_collecting_data
    }

    pub fn set_collecting_data(&mut self, collecting: bool) {
        self.is_collecting_data = collecting;
    }

    pub fn is_fastmode_running(&self) -> bool {
        self.is_fastmode_running
    }

    /// Flag an exclusive high-rate sampling run. While this is set, no
    /// command may be issued: anything sent to the device would abort the
    /// in-progress acquisition. The library enforces this only in
    /// [`query_status`](Self::query_status); raw senders are trusted.
    pub fn set_fastmode_running(&mut self, running: bool) {
        self.is_fastmode_running = running;
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Register the hook invoked when the device vanishes mid-transfer.
    pub fn set_disconnect_hook(&mut self, hook: DisconnectHook) {
        self.disconnect_hook = Some(hook);
    }

    /// Send a raw text command.
    ///
    /// The caller's buffer is borrowed untouched; one carriage return is
    /// appended to form the wire command, which is then split into
    /// [`PACKET_SIZE`] packets and written in order with a 50 ms pause
    /// before each attempt (the device chokes on back-to-back packets).
    /// Transient transport errors retry the same packet up to the retry
    /// limit; a vanished device aborts immediately and fires the
    /// disconnect hook. Returns the number of bytes transferred; on
    /// failure the error carries the bytes that made it out beforehand.
    ///
    /// This does not check the busy flags. It is the raw escape hatch
    /// and sends exactly what it is given.
    pub fn send_raw(&mut self, command: &str) -> Result<usize, SendError> {
        if !self.is_open {
            return Err(SendError {
                fault: TransferFault::NotOpen,
                transferred: 0,
            });
        }

        let mut wire = Vec::with_capacity(command.len() + 1);
        wire.extend_from_slice(command.as_bytes());
        wire.push(b'\r');

        let mut transferred = 0;
        for packet in wire.chunks(PACKET_SIZE) {
            let outcome = retry_bounded("send_raw", || {
                sleep(INTER_PACKET_DELAY);
                self.pipe.write_bulk(packet, self.timeout)
            });
            match outcome {
                // Bytes are only counted on a successful attempt, so a
                // retried packet can never double-count.
                Attempt::Done(sent) => transferred += sent,
                Attempt::Gone => {
                    self.handle_disconnect();
                    return Err(SendError {
                        fault: TransferFault::Disconnected,
                        transferred,
                    });
                }
                Attempt::Failed(error) => {
                    return Err(SendError {
                        fault: TransferFault::ErrorLimit(error),
                        transferred,
                    });
                }
            }
        }

        Ok(transferred)
    }

    /// Read a raw response.
    ///
    /// The LabPro does not announce response lengths; data arrives in
    /// [`PACKET_SIZE`] frames until a short or timed-out frame marks the
    /// end. That final frame's unfilled tail stays zeroed, so the result
    /// is always a whole number of frames with a self-terminated tail.
    /// Trailing padding is *not* stripped here, see
    /// [`trim_response`](crate::response::trim_response).
    ///
    /// Transient transport errors retry the current frame up to the
    /// retry limit. A vanished device zero-fills the current frame,
    /// aborts and fires the disconnect hook. If the buffer cannot grow
    /// mid-stream the read aborts but the error still hands back
    /// everything captured, tagged [`TransferFault::NoMem`] so callers
    /// can tell truncation from a clean end of response.
    pub fn read_raw(&mut self) -> Result<Vec<u8>, ReadError> {
        if !self.is_open {
            return Err(ReadError {
                fault: TransferFault::NotOpen,
                captured: Vec::new(),
            });
        }

        let mut data: Vec<u8> = Vec::new();
        loop {
            if data.try_reserve_exact(PACKET_SIZE).is_err() {
                return Err(ReadError {
                    fault: TransferFault::NoMem,
                    captured: data,
                });
            }

            let mut frame = [0u8; PACKET_SIZE];
            let outcome = retry_bounded("read_raw", || {
                sleep(INTER_PACKET_DELAY);
                match self.pipe.read_bulk(&mut frame, self.timeout) {
                    // No more data to send us. The normal end of a response.
                    Err(rusb::Error::Timeout) => Ok(0),
                    other => other,
                }
            });
            match outcome {
                Attempt::Done(received) => {
                    data.extend_from_slice(&frame);
                    if received < PACKET_SIZE {
                        return Ok(data);
                    }
                }
                Attempt::Gone => {
                    data.extend_from_slice(&frame);
                    self.handle_disconnect();
                    return Err(ReadError {
                        fault: TransferFault::Disconnected,
                        captured: data,
                    });
                }
                Attempt::Failed(error) => {
                    data.extend_from_slice(&frame);
                    return Err(ReadError {
                        fault: TransferFault::ErrorLimit(error),
                        captured: data,
                    });
                }
            }
        }
    }

    /// Clear the LabPro's RAM: stored data, error info and channel setup.
    /// Flash is untouched. Refused while the device is busy or collecting
    /// unless `force` is set.
    pub fn reset(&mut self, force: bool) -> Result<usize, LabProError> {
        if !self.is_open {
            return Err(ProtocolError::NotOpen.into());
        }
        if self.is_busy && !force {
            return Err(ProtocolError::Busy.into());
        }
        if self.is_collecting_data && !force {
            return Err(ProtocolError::BusyCollecting.into());
        }

        Ok(self.send_raw(&Command::Reset.wire(&[]))?)
    }

    /// Issue the system-status query and return the reply's list elements.
    ///
    /// If a FastMode run is in progress the probe first waits for it to
    /// finish (polling, no command sent), since any command would abort
    /// the acquisition. The wait is bounded by [`FASTMODE_WAIT_CEILING`];
    /// exceeding it surfaces the busy-fastmode error instead of hanging.
    pub fn query_status(&mut self) -> Result<Vec<String>, LabProError> {
        self.wait_for_fastmode_clear(FASTMODE_WAIT_CEILING)?;

        self.send_raw(&Command::SystemStatus.wire(&[]))?;
        let raw = self.read_raw()?;
        let trimmed = trim_response(&raw)?;
        let text = String::from_utf8_lossy(trimmed);
        Ok(parse_list(&text)?)
    }

    /// Poll until the FastMode flag clears, sleeping with a small backoff,
    /// or fail with [`ProtocolError::BusyFastmode`] once `ceiling` has
    /// elapsed.
    pub fn wait_for_fastmode_clear(&self, ceiling: Duration) -> Result<(), ProtocolError> {
        if !self.is_fastmode_running {
            return Ok(());
        }

        debug!("waiting for FastMode to complete");
        let started = Instant::now();
        let mut pause = Duration::from_millis(1);
        while self.is_fastmode_running {
            if started.elapsed() >= ceiling {
                return Err(ProtocolError::BusyFastmode);
            }
            sleep(pause);
            pause = (pause * 2).min(Duration::from_millis(50));
        }
        Ok(())
    }

    /// Release the claimed interface and clear the `open` flag. The
    /// record stays alive; only the USB side is torn down.
    pub fn close(&mut self) {
        if let Err(error) = self.pipe.release() {
            warn!("releasing interface on close failed: {error}");
        }
        self.is_open = false;
    }

    /// Reconcile state after the device vanished: mark it closed, release
    /// whatever the transport still holds, and notify the caller's hook.
    /// Runs at most once per occurrence; once the device is closed, later
    /// transfers fail with not-open before they touch the bus.
    fn handle_disconnect(&mut self) {
        if self.disconnecting {
            return;
        }
        self.disconnecting = true;

        warn!("LabPro vanished mid-transfer, marking it closed");
        self.is_open = false;
        let _ = self.pipe.release();

        if let Some(hook) = self.disconnect_hook.as_mut() {
            hook();
        }
    }
}

use thiserror::Error;

/// Where an error originated.
///
/// Frontends use this to tell "the library itself had a problem" apart
/// from "the sensor is misconfigured" and "the interface hardware (or the
/// bus underneath it) failed".
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorDomain {
    /// Internal problems unrelated to data acquisition, e.g. allocation failure.
    Generic,
    /// Problems with a sensor or its configuration, not the interface itself.
    Sensor,
    /// Problems with the LabPro interface or its USB transport.
    Backend,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Fatal,
    Alert,
    Critical,
    Error,
    Warning,
    Notice,
    Info,
    Debug,
}

/// Protocol and device-state errors.
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("the device is not open")]
    NotOpen,
    #[error("the device is busy with a pending transfer")]
    Busy,
    #[error("the device is collecting data")]
    BusyCollecting,
    #[error("the device is sampling in FastMode")]
    BusyFastmode,
}

/// A rule broken by an [`AcquisitionSession`](crate::session::AcquisitionSession).
///
/// Findings are advisory; validation reports every applicable fault so a
/// frontend can present a complete diagnosis in one pass.
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionFault {
    #[error("the configured operation does not match the channel's class")]
    OpMismatch,
    #[error("post-processing is not available in realtime sampling mode")]
    PostprocOnRealtime,
    #[error("post-processing is not available on sonic channels")]
    PostprocOnSonic,
}

/// Errors from response trimming and list parsing.
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum ResponseError {
    /// No carriage-return terminator: the response is truncated or the
    /// device violated the protocol. Never means "empty response".
    #[error("no carriage-return terminator in the response")]
    NoTerminator,
    #[error("malformed list literal")]
    BadList,
}

/// How a raw transfer went wrong.
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum TransferFault {
    #[error("the device is not open")]
    NotOpen,
    /// The device vanished from the bus. Never retried.
    #[error("the device disconnected mid-transfer")]
    Disconnected,
    /// The bounded retry budget is spent; the last transport error is attached.
    #[error("transfer error limit reached: {0}")]
    ErrorLimit(rusb::Error),
    /// Buffer growth failed mid-transfer.
    #[error("out of memory while growing the response buffer")]
    NoMem,
}

/// A failed send. `transferred` counts the bytes that made it onto the
/// bus before the abort.
#[derive(Error, Debug)]
#[error("send aborted after {transferred} byte(s): {fault}")]
pub struct SendError {
    pub fault: TransferFault,
    pub transferred: usize,
}

/// A failed read. `captured` holds everything assembled before the abort,
/// zero-filled to the frame boundary, so partial responses are never lost.
#[derive(Error, Debug)]
#[error("read aborted after {} byte(s): {fault}", captured.len())]
pub struct ReadError {
    pub fault: TransferFault,
    pub captured: Vec<u8>,
}

/// Umbrella error for the higher-level operations that mix state checks,
/// raw transfers and response parsing.
#[derive(Error, Debug)]
pub enum LabProError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error(transparent)]
    Send(#[from] SendError),
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error(transparent)]
    Response(#[from] ResponseError),
    #[error("USB error: {0}")]
    Usb(#[from] rusb::Error),
}

/// A flattened error record for frontends that want to branch on numbers
/// rather than match on enums, or log a complete diagnosis in one line.
///
/// `code` uses the LabPro error-code space; `extra_code` carries the
/// libusb error code when a transport-layer cause exists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorReport {
    pub domain: ErrorDomain,
    pub code: i32,
    pub extra_code: Option<i32>,
    pub severity: Severity,
    pub message: String,
    pub extra_message: Option<String>,
}

pub(crate) fn usb_code(error: rusb::Error) -> i32 {
    match error {
        rusb::Error::Io => -1,
        rusb::Error::InvalidParam => -2,
        rusb::Error::Access => -3,
        rusb::Error::NoDevice => -4,
        rusb::Error::NotFound => -5,
        rusb::Error::Busy => -6,
        rusb::Error::Timeout => -7,
        rusb::Error::Overflow => -8,
        rusb::Error::Pipe => -9,
        rusb::Error::Interrupted => -10,
        rusb::Error::NoMem => -11,
        rusb::Error::NotSupported => -12,
        _ => -99,
    }
}

impl ProtocolError {
    pub(crate) fn code(self) -> i32 {
        match self {
            ProtocolError::NotOpen => 2,
            ProtocolError::Busy => 3,
            ProtocolError::BusyCollecting => 4,
            ProtocolError::BusyFastmode => 5,
        }
    }
}

impl SessionFault {
    pub(crate) fn code(self) -> i32 {
        match self {
            SessionFault::OpMismatch => 6,
            SessionFault::PostprocOnSonic => 7,
            SessionFault::PostprocOnRealtime => 8,
        }
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            domain: ErrorDomain::Sensor,
            code: self.code(),
            extra_code: None,
            severity: Severity::Warning,
            message: self.to_string(),
            extra_message: None,
        }
    }
}

impl TransferFault {
    fn report(&self, message: String) -> ErrorReport {
        match self {
            TransferFault::NotOpen => ErrorReport {
                domain: ErrorDomain::Backend,
                code: ProtocolError::NotOpen.code(),
                extra_code: None,
                severity: Severity::Error,
                message,
                extra_message: None,
            },
            TransferFault::Disconnected => ErrorReport {
                domain: ErrorDomain::Backend,
                code: 0,
                extra_code: Some(usb_code(rusb::Error::NoDevice)),
                severity: Severity::Error,
                message,
                extra_message: Some(rusb::Error::NoDevice.to_string()),
            },
            TransferFault::ErrorLimit(cause) => ErrorReport {
                domain: ErrorDomain::Backend,
                code: 0,
                extra_code: Some(usb_code(*cause)),
                severity: Severity::Error,
                message,
                extra_message: Some(cause.to_string()),
            },
            TransferFault::NoMem => ErrorReport {
                domain: ErrorDomain::Generic,
                code: 1,
                extra_code: None,
                severity: Severity::Fatal,
                message,
                extra_message: None,
            },
        }
    }
}

impl LabProError {
    pub fn report(&self) -> ErrorReport {
        match self {
            LabProError::Protocol(error) => ErrorReport {
                domain: ErrorDomain::Backend,
                code: error.code(),
                extra_code: None,
                severity: Severity::Error,
                message: error.to_string(),
                extra_message: None,
            },
            LabProError::Send(error) => error.fault.report(error.to_string()),
            LabProError::Read(error) => error.fault.report(error.to_string()),
            LabProError::Response(error) => ErrorReport {
                domain: ErrorDomain::Backend,
                code: match error {
                    ResponseError::NoTerminator => 10,
                    ResponseError::BadList => 9,
                },
                extra_code: None,
                severity: Severity::Error,
                message: error.to_string(),
                extra_message: None,
            },
            LabProError::Usb(error) => ErrorReport {
                domain: ErrorDomain::Backend,
                code: 0,
                extra_code: Some(usb_code(*error)),
                severity: Severity::Error,
                message: error.to_string(),
                extra_message: Some(error.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_reports_carry_labpro_codes() {
        let report = LabProError::Protocol(ProtocolError::BusyFastmode).report();
        assert_eq!(report.domain, ErrorDomain::Backend);
        assert_eq!(report.code, 5);
        assert_eq!(report.extra_code, None);
    }

    #[test]
    fn transport_reports_carry_libusb_codes() {
        let error = LabProError::Send(SendError {
            fault: TransferFault::ErrorLimit(rusb::Error::Pipe),
            transferred: 64,
        });
        let report = error.report();
        assert_eq!(report.domain, ErrorDomain::Backend);
        assert_eq!(report.extra_code, Some(-9));
        assert!(report.extra_message.is_some());
    }

    #[test]
    fn no_mem_is_fatal_and_generic() {
        let error = LabProError::Read(ReadError {
            fault: TransferFault::NoMem,
            captured: vec![0; 64],
        });
        let report = error.report();
        assert_eq!(report.domain, ErrorDomain::Generic);
        assert_eq!(report.code, 1);
        assert_eq!(report.severity, Severity::Fatal);
    }

    #[test]
    fn session_faults_report_in_the_sensor_domain() {
        let report = SessionFault::OpMismatch.report();
        assert_eq!(report.domain, ErrorDomain::Sensor);
        assert_eq!(report.code, 6);
    }
}

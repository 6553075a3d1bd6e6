#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter};

/// Channel ports on the LabPro interface.
///
/// The discriminants are the channel numbers the firmware expects in
/// command arguments.
#[derive(Copy, Clone, Debug, Display, EnumIter, EnumCount, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Channel {
    /// Addresses every channel at once, e.g. when resetting.
    All = 0,
    Analog1 = 1,
    Analog2 = 2,
    Analog3 = 3,
    Analog4 = 4,
    Sonic1 = 11,
    Sonic2 = 12,
    Digital1 = 21,
    Digital2 = 22,
    DigitalOut1 = 31,
    DigitalOut2 = 32,
}

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ChannelClass {
    All,
    Analog,
    Sonic,
    Digital,
    DigitalOut,
}

impl Channel {
    /// The channel number used on the wire.
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn class(self) -> ChannelClass {
        match self {
            Channel::All => ChannelClass::All,
            Channel::Analog1 | Channel::Analog2 | Channel::Analog3 | Channel::Analog4 => {
                ChannelClass::Analog
            }
            Channel::Sonic1 | Channel::Sonic2 => ChannelClass::Sonic,
            Channel::Digital1 | Channel::Digital2 => ChannelClass::Digital,
            Channel::DigitalOut1 | Channel::DigitalOut2 => ChannelClass::DigitalOut,
        }
    }

    pub fn is_analog(self) -> bool {
        self.class() == ChannelClass::Analog
    }

    pub fn is_sonic(self) -> bool {
        self.class() == ChannelClass::Sonic
    }
}

/// Operations for analog channels (channel-setup command).
///
/// `AutoId` is the right choice for most sensors; it lets the LabPro
/// identify the attached sensor and pick units itself.
#[derive(Copy, Clone, Debug, Display, EnumIter, EnumCount, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AnalogOp {
    Off = 0,
    AutoId = 1,
    Voltage10V = 2,
    Current10A = 3,
    Resistance = 4,
    /// Signal period on a ±10 V signal. Channel 1 only.
    Voltage10VPeriod = 5,
    /// Signal frequency on a ±10 V signal. Channel 1 only.
    Voltage10VFrequency = 6,
    /// Count signal transitions on a ±10 V signal. Channel 1 only.
    Voltage10VTransitionCount = 7,
    TiTemperatureC = 10,
    TiTemperatureF = 11,
    TiLight = 12,
    /// Higher-precision voltage measurement over the smaller 0-5 V range.
    Voltage0To5V = 14,
}

impl AnalogOp {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Operations for sonic channels (channel-setup command).
///
/// Prefer `DistanceDtMeters` and derive velocity and acceleration on the
/// host; making the LabPro do the arithmetic heats it up and degrades
/// measurement accuracy. With non-realtime sampling the velocity and
/// acceleration variants fall back to plain distance anyway.
#[derive(Copy, Clone, Debug, Display, EnumIter, EnumCount, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SonicOp {
    Reset = 0,
    DistanceDtMeters = 1,
    DistanceDtFeet = 3,
    DistanceVelocityDtMeters = 4,
    DistanceVelocityDtFeet = 5,
    DistanceVelocityAccelDtMeters = 6,
    DistanceVelocityAccelDtFeet = 7,
}

impl SonicOp {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Post-processing the LabPro can apply to analog data.
///
/// Only `None` is valid in realtime sampling mode, and post-processing is
/// never valid on sonic channels (their derivatives are selected through
/// the sonic operation instead).
#[derive(Copy, Clone, Debug, Display, EnumIter, EnumCount, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PostProc {
    None = 0,
    FirstDerivative = 1,
    FirstAndSecondDerivative = 2,
}

impl PostProc {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// How the host samples the LabPro.
///
/// The device always samples in real time; this selects whether the host
/// polls live values (`Realtime`) or lets the device buffer samples in RAM
/// for later bulk retrieval (`NonRealtime`).
#[derive(Copy, Clone, Debug, Display, EnumIter, EnumCount, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SamplingMode {
    NonRealtime = 0,
    Realtime = 1,
}

/// System status codes reported by the status-query command.
#[derive(Copy, Clone, Debug, Display, EnumIter, EnumCount, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SystemStatus {
    /// Waiting for a command.
    Idle = 1,
    /// Watching for a trigger condition to start collecting.
    Armed = 2,
    /// Currently collecting data.
    Busy = 3,
    /// Waiting for a "get" command to fetch collected data.
    Done = 4,
    SelfTest = 5,
    Initializing = 99,
}

impl SystemStatus {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(SystemStatus::Idle),
            2 => Some(SystemStatus::Armed),
            3 => Some(SystemStatus::Busy),
            4 => Some(SystemStatus::Done),
            5 => Some(SystemStatus::SelfTest),
            99 => Some(SystemStatus::Initializing),
            _ => None,
        }
    }
}

/// Battery levels reported by the LabPro.
#[derive(Copy, Clone, Debug, Display, EnumIter, EnumCount, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BatteryLevel {
    Ok = 0,
    LowWhileSampling = 1,
    Low = 2,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn channel_classes() {
        assert!(Channel::Analog1.is_analog());
        assert!(!Channel::Analog1.is_sonic());
        assert!(Channel::Sonic2.is_sonic());
        assert_eq!(Channel::All.class(), ChannelClass::All);
        assert_eq!(Channel::Digital1.class(), ChannelClass::Digital);
        assert_eq!(Channel::DigitalOut2.class(), ChannelClass::DigitalOut);
    }

    #[test]
    fn channel_codes_match_firmware_numbering() {
        assert_eq!(Channel::All.code(), 0);
        assert_eq!(Channel::Analog4.code(), 4);
        assert_eq!(Channel::Sonic1.code(), 11);
        assert_eq!(Channel::DigitalOut2.code(), 32);
    }

    #[test]
    fn system_status_round_trips() {
        for status in SystemStatus::iter() {
            assert_eq!(SystemStatus::from_code(status as u8), Some(status));
        }
        assert_eq!(SystemStatus::from_code(0), None);
        assert_eq!(SystemStatus::from_code(6), None);
    }
}

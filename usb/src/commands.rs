// The LabPro's command language is plain ASCII: `s{<code>}` or
// `s{<code>,<arg>,...}`, terminated by a carriage return on the wire.
// This module only knows the command codes and how to render them; the
// framing and the trailing CR are handled by the transfer layer.

/// Commands understood by the LabPro firmware.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Clear RAM and reset the LabPro.
    Reset,
    /// Select channels and units for data collection.
    ChannelSetup,
    /// Set data collection rate, time, triggering, etc.
    DataCollectSetup,
    /// Set up a manual conversion equation rather than one obtained by Auto-ID.
    ConversionEquationSetup,
    /// Set parameters for what data points will be returned.
    DataControl,
    SystemSetup,
    SystemStatus,
    /// Get a data point during non-realtime collection.
    ChannelStatus,
    /// Get a single point of data outside of active data collection.
    RequestChannelData,
    AdvancedDataReduction,
    DigitalDataCapture,
    /// Return sensor IDs for each channel.
    QueryChannels,
    PortPowerControl,
    RequestSetupInfo,
    RequestLongSensorName,
    RequestShortSensorName,
    Archive,
    AnalogOutSetup,
    LedControl,
    SoundControl,
    DigitalOutControl,
}

impl Command {
    pub fn command_id(&self) -> u16 {
        match self {
            Command::Reset => 0,
            Command::ChannelSetup => 1,
            Command::DataCollectSetup => 3,
            Command::ConversionEquationSetup => 4,
            Command::DataControl => 5,
            Command::SystemSetup => 6,
            Command::SystemStatus => 7,
            Command::ChannelStatus => 8,
            Command::RequestChannelData => 9,
            Command::AdvancedDataReduction => 10,
            Command::DigitalDataCapture => 12,
            Command::QueryChannels => 80,
            Command::PortPowerControl => 102,
            Command::RequestSetupInfo => 115,
            Command::RequestLongSensorName => 116,
            Command::RequestShortSensorName => 117,
            Command::Archive => 201,
            Command::AnalogOutSetup => 401,
            Command::LedControl => 1998,
            Command::SoundControl => 1999,
            Command::DigitalOutControl => 2001,
        }
    }

    /// Render the command in wire syntax, without the trailing CR.
    pub fn wire(&self, args: &[&str]) -> String {
        let mut out = format!("s{{{}", self.command_id());
        for arg in args {
            out.push(',');
            out.push_str(arg);
        }
        out.push('}');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_without_args() {
        assert_eq!(Command::Reset.wire(&[]), "s{0}");
        assert_eq!(Command::SystemStatus.wire(&[]), "s{7}");
    }

    #[test]
    fn wire_with_args() {
        assert_eq!(Command::ChannelSetup.wire(&["1", "1"]), "s{1,1,1}");
        assert_eq!(Command::LedControl.wire(&["1", "0"]), "s{1998,1,0}");
    }
}
